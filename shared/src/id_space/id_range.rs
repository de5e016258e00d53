use std::fmt;

use crate::{id_space::IdSpaceError, ObjectId, NULL_OBJECT_ID};

/// First identifier a client (guest) may allocate
pub const CLIENT_ID_MIN: ObjectId = 0x0000_0001;
/// Last identifier a client (guest) may allocate
pub const CLIENT_ID_MAX: ObjectId = 0xfeff_ffff;
/// First identifier reserved for server-side allocation
pub const SERVER_ID_MIN: ObjectId = 0xff00_0000;
/// Last identifier reserved for server-side allocation
pub const SERVER_ID_MAX: ObjectId = 0xffff_ffff;

/// The two disjoint allocation authorities of a connection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdRange {
    /// Allocated by the connecting client, growing upward from 1
    Client,
    /// Allocated by the serving side, the top 16M values of the id space
    Server,
}

impl IdRange {
    pub fn min(self) -> ObjectId {
        match self {
            IdRange::Client => CLIENT_ID_MIN,
            IdRange::Server => SERVER_ID_MIN,
        }
    }

    pub fn max(self) -> ObjectId {
        match self {
            IdRange::Client => CLIENT_ID_MAX,
            IdRange::Server => SERVER_ID_MAX,
        }
    }

    pub fn contains(self, id: ObjectId) -> bool {
        id >= self.min() && id <= self.max()
    }

    /// Rejects `id` unless it belongs to this range
    pub fn validate(self, id: ObjectId) -> Result<ObjectId, IdSpaceError> {
        if id == NULL_OBJECT_ID {
            return Err(IdSpaceError::NullId { expected: self });
        }
        if !self.contains(id) {
            return Err(IdSpaceError::OutOfRange { id, expected: self });
        }
        Ok(id)
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdRange::Client => write!(f, "client [{:#010x}, {:#010x}]", CLIENT_ID_MIN, CLIENT_ID_MAX),
            IdRange::Server => write!(f, "server [{:#010x}, {:#010x}]", SERVER_ID_MIN, SERVER_ID_MAX),
        }
    }
}

pub fn is_server_range(id: ObjectId) -> bool {
    IdRange::Server.contains(id)
}

pub fn is_guest_range(id: ObjectId) -> bool {
    IdRange::Client.contains(id)
}
