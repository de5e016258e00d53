use std::collections::BTreeMap;

use log::{debug, info, warn};

use sluice_shared::{
    wire::wl_display, Argument, FrameDecoder, FrameEncoder, IdGenerator, IdRange, Message,
    ObjectId, DISPLAY_OBJECT_ID,
};

use crate::{
    config::ProxyConfig,
    context::TeardownOrigin,
    error::ProxyError,
    events::{DisconnectReason, ProxyEvents},
    guest::{GuestClient, GuestKey},
    output::OutputMetrics,
    registry::RegistryBridge,
    shadow::{HostHandle, ShadowKey, ShadowTable},
    transport::{Channel, ChannelError, GuestConnection},
};

/// Proxy state for one host connection and every guest attached to it.
///
/// All mutation happens on the caller's thread, one complete message at a
/// time, so no handler ever observes another handler's half-finished update.
pub struct Context {
    pub(crate) config: ProxyConfig,
    channel: Box<dyn Channel>,
    /// Ids the proxy allocates as a client of the host
    pub(crate) host_ids: IdGenerator,
    pub(crate) host_registry_id: ObjectId,
    pub(super) host_decoder: FrameDecoder,
    host_encoder: FrameEncoder,
    pub(crate) registry: RegistryBridge,
    pub(crate) shadows: ShadowTable,
    pub(crate) guests: BTreeMap<GuestKey, GuestClient>,
    next_guest_key: u64,
    pub(crate) aura_shell: Option<HostHandle>,
    events: ProxyEvents,
}

impl Context {
    /// Connects to the host and requests its registry.
    ///
    /// Any channel failure here is fatal: the proxy cannot run without a host.
    pub fn new(config: ProxyConfig, mut channel: Box<dyn Channel>) -> Result<Self, ProxyError> {
        channel.init()?;
        channel.create_context()?;

        let mut host_ids = IdGenerator::starting_at(IdRange::Client, DISPLAY_OBJECT_ID + 1)?;
        let host_registry_id = host_ids.generate()?;
        let registry = RegistryBridge::new(&config);

        let mut context = Self {
            config,
            channel,
            host_ids,
            host_registry_id,
            host_decoder: FrameDecoder::new(),
            host_encoder: FrameEncoder::new(),
            registry,
            shadows: ShadowTable::new(),
            guests: BTreeMap::new(),
            next_guest_key: 0,
            aura_shell: None,
            events: ProxyEvents::new(),
        };

        context.queue_host(&Message::new(
            DISPLAY_OBJECT_ID,
            wl_display::GET_REGISTRY,
            vec![Argument::NewId(host_registry_id)],
        ))?;
        context.flush_host()?;

        info!("Proxy context ready, host registry is object {}", host_registry_id);
        Ok(context)
    }

    // Guests

    pub fn connect_guest(&mut self, connection: Box<dyn GuestConnection>) -> GuestKey {
        let key = GuestKey::new(self.next_guest_key);
        self.next_guest_key += 1;
        self.guests.insert(key, GuestClient::new(key, connection));
        self.events.push_connection(&key);
        info!("Guest {} connected", key.to_u64());
        key
    }

    /// Drops the guest and every object it owns. Host releases are sent on
    /// the next flush.
    pub fn disconnect_guest(&mut self, key: &GuestKey) -> bool {
        self.remove_guest(key, DisconnectReason::Requested)
    }

    pub fn guest_keys(&self) -> Vec<GuestKey> {
        self.guests.keys().copied().collect()
    }

    // Event loop

    /// Processes everything pending from the host and every guest, flushes,
    /// and returns what happened. Errors are only returned when fatal.
    pub fn receive(&mut self) -> Result<ProxyEvents, ProxyError> {
        while let Some(bytes) = self.channel.receive()? {
            self.process_host_bytes(&bytes)?;
        }

        for key in self.guest_keys() {
            let Some(guest) = self.guests.get_mut(&key) else {
                continue;
            };
            let closed = guest.receive();
            self.process_guest_frames(&key)?;
            if closed {
                self.remove_guest(&key, DisconnectReason::ConnectionClosed);
            }
        }

        self.flush()?;
        Ok(self.events.take())
    }

    /// Sends everything queued for the host and every guest
    pub fn flush(&mut self) -> Result<(), ProxyError> {
        self.flush_host()?;

        let mut failed = Vec::new();
        for (key, guest) in self.guests.iter_mut() {
            if let Err(error) = guest.flush() {
                warn!("Failed to send to guest {}: {}", key.to_u64(), error);
                failed.push(*key);
            }
        }
        for key in failed {
            self.remove_guest(&key, DisconnectReason::ConnectionClosed);
        }
        Ok(())
    }

    // Inspection

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn registry(&self) -> &RegistryBridge {
        &self.registry
    }

    pub fn shadows(&self) -> &ShadowTable {
        &self.shadows
    }

    pub fn output_metrics(&self, key: &ShadowKey) -> Option<&OutputMetrics> {
        self.shadows.get(key)?.output_metrics()
    }

    /// Host object id of the proxy's own registry
    pub fn host_registry_id(&self) -> ObjectId {
        self.host_registry_id
    }

    // Crate-public

    pub(crate) fn queue_host(&mut self, message: &Message) -> Result<(), ProxyError> {
        let frame = message
            .encode()
            .map_err(|error| ProxyError::violation(message.object_id, error))?;
        self.host_encoder.push(frame);
        Ok(())
    }

    pub(crate) fn queue_guest(&mut self, key: &GuestKey, message: &Message) -> Result<(), ProxyError> {
        match self.guests.get_mut(key) {
            Some(guest) => guest.queue(message),
            None => Ok(()),
        }
    }

    /// Reports `error` to the guest on `object_id` and disconnects it
    pub(crate) fn terminate_guest(&mut self, key: &GuestKey, object_id: ObjectId, error: ProxyError) {
        warn!("Terminating guest {}: {}", key.to_u64(), error);
        if let Some(guest) = self.guests.get_mut(key) {
            let report = Message::new(
                DISPLAY_OBJECT_ID,
                wl_display::ERROR,
                vec![
                    Argument::Object(object_id),
                    Argument::Uint(error.display_error_code()),
                    Argument::string(&error.to_string()),
                ],
            );
            if let Err(queue_error) = guest.queue(&report) {
                debug!("Could not queue error report: {}", queue_error);
            }
            if let Err(send_error) = guest.flush() {
                debug!("Could not deliver error report: {}", send_error);
            }
        }
        self.remove_guest(key, DisconnectReason::Error(error));
    }

    pub(crate) fn remove_guest(&mut self, key: &GuestKey, reason: DisconnectReason) -> bool {
        let Some(mut guest) = self.guests.remove(key) else {
            return false;
        };

        for guest_id in self.shadows.guest_ids(key) {
            let shadow_key = ShadowKey::new(*key, guest_id);
            if let Err(error) = self.teardown(&shadow_key, TeardownOrigin::GuestDisconnected) {
                warn!("Teardown of guest object {} failed: {}", guest_id, error);
            }
        }
        guest.disconnect();

        info!("Guest {} disconnected ({:?})", key.to_u64(), reason);
        self.events.push_disconnection(key, reason);
        true
    }

    fn flush_host(&mut self) -> Result<(), ProxyError> {
        if self.host_encoder.is_empty() {
            return Ok(());
        }
        let max_send_size = self.channel.max_send_size();
        let chunks = self
            .host_encoder
            .drain_chunks(max_send_size)
            .map_err(|error| ChannelError::SendFailed {
                payload_size: max_send_size,
                reason: error.to_string(),
            })?;
        for chunk in chunks {
            self.channel.send(&chunk)?;
        }
        Ok(())
    }
}
