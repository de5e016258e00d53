use thiserror::Error;

use crate::{id_space::IdRange, ObjectId};

/// Errors that can occur while allocating or validating object identifiers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdSpaceError {
    /// Every identifier in the range has been handed out
    #[error("Identifier range {range} is exhausted")]
    Exhausted { range: IdRange },

    /// An identifier was used outside of the range owned by its allocator
    #[error("Object id {id:#010x} is outside the {expected} range")]
    OutOfRange { id: ObjectId, expected: IdRange },

    /// The null identifier was used where a live object was required
    #[error("Null object id used where a {expected} id was required")]
    NullId { expected: IdRange },
}
