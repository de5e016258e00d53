use thiserror::Error;

use sluice_shared::{GlobalName, IdSpaceError};

/// Errors from resolving guest binds against the mirrored registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No advertised global has this server name
    #[error("Unknown global name {name:#010x}")]
    UnknownGlobal { name: GlobalName },

    /// The requested version is zero, above the advertised one, or the host
    /// offers less than the proxy can translate
    #[error("Version mismatch for {interface} global {name:#010x}: requested {requested}, available {available}")]
    VersionMismatch {
        name: GlobalName,
        interface: String,
        requested: u32,
        available: u32,
    },

    /// The guest named a different interface than the one advertised
    #[error("Global {name:#010x} is {advertised}, not {requested}")]
    InterfaceMismatch {
        name: GlobalName,
        advertised: String,
        requested: String,
    },

    /// No server-range names are left
    #[error(transparent)]
    IdSpace(#[from] IdSpaceError),
}
