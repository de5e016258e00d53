use thiserror::Error;

use sluice_shared::ObjectId;

/// Errors from the object shadow table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShadowError {
    /// The guest id is already bound to a live shadow entry
    #[error("Guest object id {id} is already shadowed")]
    DuplicateId { id: ObjectId },

    /// No live shadow entry exists for the id
    #[error("No shadow entry for object {id}")]
    NotFound { id: ObjectId },

    /// The host id already belongs to another shadow entry
    #[error("Host object id {host_id} is already shadowed")]
    HostIdInUse { host_id: ObjectId },
}
