//! # Sluice Shared
//! Object identifiers, interface tables and message framing shared between
//! the sluice proxy crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use sluice_serde::{padded_len, Fixed, Serde, SerdeErr, WireReader, WireWriter, WORD_SIZE};

mod connection;
mod id_space;
mod protocol;
mod types;

pub use connection::{
    FrameDecoder, FrameEncoder, FramingError, MessageHeader, HEADER_SIZE, MAX_MESSAGE_SIZE,
};
pub use id_space::{
    is_guest_range, is_server_range, IdGenerator, IdRange, IdSpaceError, CLIENT_ID_MAX,
    CLIENT_ID_MIN, SERVER_ID_MAX, SERVER_ID_MIN,
};
pub use protocol::{
    wire, ArgKind, Argument, InterfaceKind, InterfaceSpec, Message, MessageSignature,
    ProtocolError,
};
pub use types::{GlobalName, ObjectId, Opcode, PeerSide, DISPLAY_OBJECT_ID, NULL_OBJECT_ID};
