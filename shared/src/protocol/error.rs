use sluice_serde::SerdeErr;
use thiserror::Error;

use crate::{connection::FramingError, Opcode};

/// Errors that can occur while decoding or encoding protocol messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The opcode does not exist on the target interface
    #[error("Interface {interface} has no message with opcode {opcode}")]
    UnknownOpcode {
        interface: &'static str,
        opcode: Opcode,
    },

    /// A null value was sent for an argument that does not accept one
    #[error("Argument {index} of {message} must not be null")]
    NullArgument { message: &'static str, index: usize },

    /// The message body is longer than its signature describes
    #[error("Message {message} has {remaining} unexpected trailing bytes")]
    TrailingBytes {
        message: &'static str,
        remaining: usize,
    },

    /// An argument value does not match the kind its signature declares
    #[error("Argument {index} of {message} does not match its declared type")]
    ArgumentMismatch { message: &'static str, index: usize },

    /// Argument payload could not be decoded
    #[error("Malformed argument payload: {0}")]
    Serde(#[from] SerdeErr),

    /// Message framing is invalid
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),
}
