use std::{mem, vec::IntoIter};

use crate::{error::ProxyError, guest::GuestKey};

/// Why a guest connection went away
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The embedding application called `disconnect_guest`
    Requested,
    /// The guest closed its end of the connection
    ConnectionClosed,
    /// The guest was terminated for the contained error
    Error(ProxyError),
}

pub struct ProxyEvents {
    connections: Vec<GuestKey>,
    disconnections: Vec<(GuestKey, DisconnectReason)>,
    empty: bool,
}

impl ProxyEvents {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: ProxyEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ProxyEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, guest_key: &GuestKey) {
        self.connections.push(*guest_key);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, guest_key: &GuestKey, reason: DisconnectReason) {
        self.disconnections.push((*guest_key, reason));
        self.empty = false;
    }

    pub(crate) fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }
}

// Event Trait
pub trait ProxyEvent {
    type Iter;

    fn iter(events: &mut ProxyEvents) -> Self::Iter;

    fn has(events: &ProxyEvents) -> bool;
}

// ConnectEvent
pub struct ConnectEvent;
impl ProxyEvent for ConnectEvent {
    type Iter = IntoIter<GuestKey>;

    fn iter(events: &mut ProxyEvents) -> Self::Iter {
        let list = mem::take(&mut events.connections);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ProxyEvents) -> bool {
        !events.connections.is_empty()
    }
}

// DisconnectEvent
pub struct DisconnectEvent;
impl ProxyEvent for DisconnectEvent {
    type Iter = IntoIter<(GuestKey, DisconnectReason)>;

    fn iter(events: &mut ProxyEvents) -> Self::Iter {
        let list = mem::take(&mut events.disconnections);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ProxyEvents) -> bool {
        !events.disconnections.is_empty()
    }
}
