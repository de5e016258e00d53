use std::collections::HashMap;

use log::{trace, warn};

use sluice_shared::{
    FrameDecoder, FrameEncoder, InterfaceKind, Message, ObjectId, DISPLAY_OBJECT_ID,
};

use crate::{
    error::ProxyError,
    guest::GuestKey,
    transport::{ChannelError, GuestConnection},
};

/// Guest objects the proxy answers itself instead of shadowing on the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalObject {
    Display,
    Registry,
}

/// Per-guest connection state: byte stream buffers and proxy-local objects
pub struct GuestClient {
    key: GuestKey,
    connection: Box<dyn GuestConnection>,
    decoder: FrameDecoder,
    encoder: FrameEncoder,
    local_objects: HashMap<ObjectId, LocalObject>,
    registries: Vec<ObjectId>,
    /// Objects the host destroyed whose destructor the guest may still send
    retired: HashMap<ObjectId, InterfaceKind>,
}

impl GuestClient {
    pub fn new(key: GuestKey, connection: Box<dyn GuestConnection>) -> Self {
        let mut local_objects = HashMap::new();
        local_objects.insert(DISPLAY_OBJECT_ID, LocalObject::Display);

        Self {
            key,
            connection,
            decoder: FrameDecoder::new(),
            encoder: FrameEncoder::new(),
            local_objects,
            registries: Vec::new(),
            retired: HashMap::new(),
        }
    }

    pub fn local_object(&self, id: ObjectId) -> Option<LocalObject> {
        self.local_objects.get(&id).copied()
    }

    /// Registers a guest registry object; events for new globals fan out to it
    pub fn add_registry(&mut self, id: ObjectId) {
        self.local_objects.insert(id, LocalObject::Registry);
        self.registries.push(id);
    }

    pub fn registries(&self) -> &[ObjectId] {
        &self.registries
    }

    /// Remembers an object the host destroyed until the guest destroys it
    /// too or reuses its id
    pub fn retire(&mut self, id: ObjectId, interface: InterfaceKind) {
        self.retired.insert(id, interface);
    }

    pub fn retired(&self, id: ObjectId) -> Option<InterfaceKind> {
        self.retired.get(&id).copied()
    }

    pub fn forget_retired(&mut self, id: ObjectId) {
        self.retired.remove(&id);
    }

    /// Encodes `message` and queues it until the next flush
    pub fn queue(&mut self, message: &Message) -> Result<(), ProxyError> {
        let frame = message
            .encode()
            .map_err(|error| ProxyError::host_violation(message.object_id, error))?;
        trace!(
            "guest {:?} <- object {} opcode {}",
            self.key,
            message.object_id,
            message.opcode
        );
        self.encoder.push(frame);
        Ok(())
    }

    /// Drains the connection into the frame buffer. Returns `true` once the
    /// guest has gone away.
    pub fn receive(&mut self) -> bool {
        loop {
            match self.connection.receive() {
                Ok(Some(bytes)) => self.decoder.push(&bytes),
                Ok(None) => return false,
                Err(ChannelError::Disconnected) => return true,
                Err(error) => {
                    warn!("guest {:?} receive failed: {}", self.key, error);
                    return true;
                }
            }
        }
    }

    /// Buffers bytes that arrived outside of `receive`
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.decoder.push(bytes);
    }

    /// Every complete frame buffered so far, in arrival order
    pub fn take_frames(&mut self) -> Result<Vec<Vec<u8>>, ProxyError> {
        let mut frames = Vec::new();
        while let Some(frame) = self
            .decoder
            .next_frame()
            .map_err(|error| ProxyError::violation(DISPLAY_OBJECT_ID, error))?
        {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Sends every queued message, never splitting one across sends
    pub fn flush(&mut self) -> Result<(), ChannelError> {
        if self.encoder.is_empty() {
            return Ok(());
        }
        let max_send_size = self.connection.max_send_size();
        let chunks = self
            .encoder
            .drain_chunks(max_send_size)
            .map_err(|error| ChannelError::SendFailed {
                payload_size: max_send_size,
                reason: error.to_string(),
            })?;
        for chunk in chunks {
            self.connection.send(&chunk)?;
        }
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.encoder.clear();
        self.decoder.clear();
        self.connection.disconnect();
    }
}
