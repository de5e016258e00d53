mod argument;
mod error;
mod interface;
mod message;
mod signature;
pub mod wire;

pub use argument::Argument;
pub use error::ProtocolError;
pub use interface::{InterfaceKind, InterfaceSpec};
pub use message::Message;
pub use signature::{ArgKind, MessageSignature};
