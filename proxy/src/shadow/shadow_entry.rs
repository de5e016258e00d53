use sluice_shared::{InterfaceKind, ObjectId};

use crate::{guest::GuestKey, output::OutputMetrics, shadow::HostHandle};

/// Identifies a guest object: guest ids are only unique per connection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShadowKey {
    pub guest: GuestKey,
    pub guest_id: ObjectId,
}

impl ShadowKey {
    pub fn new(guest: GuestKey, guest_id: ObjectId) -> Self {
        Self { guest, guest_id }
    }
}

/// Interface-specific state carried by a shadow entry
pub enum ExtensionState {
    Output(OutputMetrics),
}

/// One guest object and the host object(s) that back it
pub struct ShadowEntry {
    guest_id: ObjectId,
    /// Version the guest bound or inherited
    version: u32,
    host: HostHandle,
    /// Host-only objects that live and die with this entry
    companions: Vec<HostHandle>,
    extension: Option<ExtensionState>,
}

impl ShadowEntry {
    pub fn new(guest_id: ObjectId, version: u32, host: HostHandle) -> Self {
        Self {
            guest_id,
            version,
            host,
            companions: Vec::new(),
            extension: None,
        }
    }

    pub fn with_extension(mut self, extension: ExtensionState) -> Self {
        self.extension = Some(extension);
        self
    }

    pub fn guest_id(&self) -> ObjectId {
        self.guest_id
    }

    pub fn interface(&self) -> InterfaceKind {
        self.host.interface()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn host(&self) -> &HostHandle {
        &self.host
    }

    pub fn companions(&self) -> &[HostHandle] {
        &self.companions
    }

    pub fn has_companion(&self, interface: InterfaceKind) -> bool {
        self.companions
            .iter()
            .any(|companion| companion.interface() == interface)
    }

    /// The handle, primary or companion, with the given host id
    pub fn handle_for(&self, host_id: ObjectId) -> Option<&HostHandle> {
        if self.host.id() == host_id {
            return Some(&self.host);
        }
        self.companions
            .iter()
            .find(|companion| companion.id() == host_id)
    }

    pub fn output_metrics(&self) -> Option<&OutputMetrics> {
        match &self.extension {
            Some(ExtensionState::Output(metrics)) => Some(metrics),
            None => None,
        }
    }

    pub fn output_metrics_mut(&mut self) -> Option<&mut OutputMetrics> {
        match &mut self.extension {
            Some(ExtensionState::Output(metrics)) => Some(metrics),
            None => None,
        }
    }

    pub(crate) fn push_companion(&mut self, companion: HostHandle) {
        self.companions.push(companion);
    }

    /// Consumes the entry, yielding the primary handle and its companions
    pub fn into_handles(self) -> (HostHandle, Vec<HostHandle>) {
        (self.host, self.companions)
    }
}
