use thiserror::Error;

use sluice_shared::{
    wire::wl_display, GlobalName, IdRange, IdSpaceError, ObjectId, NULL_OBJECT_ID,
};

use crate::{registry::RegistryError, shadow::ShadowError, transport::ChannelError};

/// Errors surfaced by the proxy engine
///
/// Guest-caused errors terminate only the offending guest connection; fatal
/// errors (see [`ProxyError::is_fatal`]) mean the proxy can no longer reach the
/// host compositor and must shut down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// A guest bound a global name that is not (or no longer) advertised
    #[error("Unknown global name {name:#010x}")]
    UnknownGlobal { name: GlobalName },

    /// A guest requested a version the proxy cannot serve for this global
    #[error("Version mismatch for {interface} global {name:#010x}: requested {requested}, available {available}")]
    VersionMismatch {
        name: GlobalName,
        interface: String,
        requested: u32,
        available: u32,
    },

    /// A guest reused an object id that is still bound
    #[error("Object id {id} is already bound")]
    DuplicateId { id: ObjectId },

    /// The object is unknown or was already destroyed
    #[error("Object {id} not found")]
    NotFound { id: ObjectId },

    /// No identifiers are left in a range the proxy allocates from
    #[error("Identifier range {range} is exhausted")]
    IdSpaceExhausted { range: IdRange },

    /// A guest broke the protocol: bad framing, bad opcode, or an id used
    /// outside the range its owner allocates from
    #[error("Protocol violation on object {object_id}: {reason}")]
    ProtocolViolation { object_id: ObjectId, reason: String },

    /// The host compositor sent traffic the proxy cannot interpret
    #[error("Host protocol violation on object {object_id}: {reason}")]
    HostProtocolViolation { object_id: ObjectId, reason: String },

    /// The host compositor reported a fatal protocol error
    #[error("Host compositor error {code} on object {object_id}: {message}")]
    HostError {
        object_id: ObjectId,
        code: u32,
        message: String,
    },

    /// The channel to the host compositor failed
    #[error("Channel transport error: {0}")]
    Transport(#[from] ChannelError),
}

impl ProxyError {
    /// Whether the error makes the whole proxy process unusable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProxyError::IdSpaceExhausted { .. }
                | ProxyError::HostProtocolViolation { .. }
                | ProxyError::HostError { .. }
                | ProxyError::Transport(_)
        )
    }

    /// Whether the error is an expected outcome that should be swallowed
    pub fn is_benign(&self) -> bool {
        matches!(self, ProxyError::NotFound { .. })
    }

    pub(crate) fn violation(object_id: ObjectId, reason: impl ToString) -> Self {
        ProxyError::ProtocolViolation {
            object_id,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn host_violation(object_id: ObjectId, reason: impl ToString) -> Self {
        ProxyError::HostProtocolViolation {
            object_id,
            reason: reason.to_string(),
        }
    }

    /// The `wl_display.error` code reported to a guest terminated by this error
    pub fn display_error_code(&self) -> u32 {
        match self {
            ProxyError::UnknownGlobal { .. }
            | ProxyError::VersionMismatch { .. }
            | ProxyError::DuplicateId { .. }
            | ProxyError::NotFound { .. } => wl_display::ERROR_INVALID_OBJECT,
            ProxyError::ProtocolViolation { .. } => wl_display::ERROR_INVALID_METHOD,
            ProxyError::IdSpaceExhausted { .. } => wl_display::ERROR_NO_MEMORY,
            ProxyError::HostProtocolViolation { .. }
            | ProxyError::HostError { .. }
            | ProxyError::Transport(_) => wl_display::ERROR_IMPLEMENTATION,
        }
    }
}

impl From<ShadowError> for ProxyError {
    fn from(error: ShadowError) -> Self {
        match error {
            ShadowError::DuplicateId { id } => ProxyError::DuplicateId { id },
            ShadowError::NotFound { id } => ProxyError::NotFound { id },
            ShadowError::HostIdInUse { host_id } => {
                ProxyError::host_violation(host_id, "host object id is already shadowed")
            }
        }
    }
}

impl ProxyError {
    /// Converts a failed bind on the guest registry object `registry_id`
    pub(crate) fn from_bind(error: RegistryError, registry_id: ObjectId) -> Self {
        match error {
            RegistryError::UnknownGlobal { name } => ProxyError::UnknownGlobal { name },
            RegistryError::VersionMismatch {
                name,
                interface,
                requested,
                available,
            } => ProxyError::VersionMismatch {
                name,
                interface,
                requested,
                available,
            },
            RegistryError::InterfaceMismatch {
                name,
                advertised,
                requested,
            } => ProxyError::violation(
                registry_id,
                format!("bind of global {name:#010x} as {requested}, advertised as {advertised}"),
            ),
            RegistryError::IdSpace(error) => error.into(),
        }
    }
}

impl From<IdSpaceError> for ProxyError {
    fn from(error: IdSpaceError) -> Self {
        match error {
            IdSpaceError::Exhausted { range } => ProxyError::IdSpaceExhausted { range },
            IdSpaceError::OutOfRange { id, .. } => ProxyError::violation(id, error),
            IdSpaceError::NullId { .. } => ProxyError::violation(NULL_OBJECT_ID, error),
        }
    }
}
