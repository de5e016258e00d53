use thiserror::Error;

/// Errors that can occur while reading wire-encoded values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The buffer ended before the value was complete
    #[error("Unexpected end of buffer: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A string payload was not terminated by a NUL byte
    #[error("String payload of {length} bytes is missing its NUL terminator")]
    MissingNulTerminator { length: usize },

    /// A string payload contained bytes that are not valid UTF-8
    #[error("String payload of {length} bytes is not valid UTF-8")]
    InvalidUtf8 { length: usize },
}
