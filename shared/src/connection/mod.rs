pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;

pub use decoder::FrameDecoder;
pub use encoder::FrameEncoder;
pub use error::FramingError;
pub use header::{MessageHeader, HEADER_SIZE, MAX_MESSAGE_SIZE};
