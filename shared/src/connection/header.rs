use sluice_serde::WireWriter;

use crate::{connection::FramingError, ObjectId, Opcode};

/// Size of the fixed two-word message header
pub const HEADER_SIZE: usize = 8;
/// Largest message either peer may send, header included
pub const MAX_MESSAGE_SIZE: usize = 4096;

/// Fixed header preceding every message: sender id, then `size << 16 | opcode`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageHeader {
    pub object_id: ObjectId,
    pub opcode: Opcode,
    /// Total message size in bytes, header included
    pub size: usize,
}

impl MessageHeader {
    /// Parses the header at the start of `bytes`, or `None` if fewer than
    /// [`HEADER_SIZE`] bytes are available
    pub fn parse(bytes: &[u8]) -> Result<Option<Self>, FramingError> {
        if bytes.len() < HEADER_SIZE {
            return Ok(None);
        }
        let object_id = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let word = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let size = (word >> 16) as usize;
        let opcode = (word & 0xffff) as Opcode;

        if size < HEADER_SIZE || size % 4 != 0 {
            return Err(FramingError::MalformedHeader { object_id, size });
        }

        Ok(Some(Self {
            object_id,
            opcode,
            size,
        }))
    }

    pub fn write(&self, writer: &mut WireWriter) {
        writer.write_u32(self.object_id);
        writer.write_u32(((self.size as u32) << 16) | u32::from(self.opcode));
    }
}
