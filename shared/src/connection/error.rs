use thiserror::Error;

use crate::ObjectId;

/// Errors that can occur while splitting or packing message frames
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    /// Header declares a size that is not a whole number of words or is
    /// shorter than the header itself (SECURITY: potentially malicious peer)
    #[error("Malformed header for object {object_id}: declared size {size} is invalid")]
    MalformedHeader { object_id: ObjectId, size: usize },

    /// A single message exceeds the largest size that may be sent or received
    #[error("Message of {size} bytes exceeds the {max} byte limit")]
    MessageTooLarge { size: usize, max: usize },

    /// Not enough bytes were available to hold a complete frame
    #[error("Frame truncated: only {available} bytes available")]
    Truncated { available: usize },

    /// The transport reported a send size too small to carry any message
    #[error("Transport send size {max} cannot carry a message header")]
    InvalidSendSize { max: usize },
}
