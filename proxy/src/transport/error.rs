use thiserror::Error;

/// Errors reported by a host channel or guest connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The channel could not be initialized
    #[error("Channel initialization failed: {reason}")]
    InitFailed { reason: String },

    /// The host-side context could not be created
    #[error("Channel context creation failed: {reason}")]
    ContextCreationFailed { reason: String },

    /// A payload could not be sent
    #[error("Failed to send {payload_size} bytes: {reason}")]
    SendFailed { payload_size: usize, reason: String },

    /// Incoming bytes could not be read
    #[error("Failed to receive: {reason}")]
    ReceiveFailed { reason: String },

    /// The peer closed the connection
    #[error("Peer closed the connection")]
    Disconnected,
}
