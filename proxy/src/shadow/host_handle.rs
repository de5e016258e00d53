use sluice_shared::{InterfaceKind, Message, ObjectId};

/// Owned reference to an object the proxy created on the host.
///
/// Not `Clone`: exactly one shadow entry owns each host object.
#[derive(Debug, PartialEq, Eq)]
pub struct HostHandle {
    id: ObjectId,
    interface: InterfaceKind,
    version: u32,
}

impl HostHandle {
    pub fn new(id: ObjectId, interface: InterfaceKind, version: u32) -> Self {
        Self {
            id,
            interface,
            version,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn interface(&self) -> InterfaceKind {
        self.interface
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// The destructor request that releases this object on the host, if the
    /// interface has one at the bound version
    pub fn release_message(&self) -> Option<Message> {
        let (opcode, signature) = self.interface.destructor_request()?;
        if self.version < signature.since {
            return None;
        }
        Some(Message::new(self.id, opcode, Vec::new()))
    }
}
