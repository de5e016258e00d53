use crate::{error::SerdeErr, padded_len, wire_reader::WireReader, wire_writer::WireWriter};

/// A value with a fixed word-aligned wire representation
pub trait Serde: Sized {
    fn ser(&self, writer: &mut WireWriter);

    fn de(reader: &mut WireReader) -> Result<Self, SerdeErr>;

    /// Number of bytes `ser` will append, padding included
    fn wire_size(&self) -> usize;
}

impl Serde for u32 {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_u32(*self);
    }

    fn de(reader: &mut WireReader) -> Result<Self, SerdeErr> {
        reader.read_u32()
    }

    fn wire_size(&self) -> usize {
        4
    }
}

impl Serde for i32 {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_i32(*self);
    }

    fn de(reader: &mut WireReader) -> Result<Self, SerdeErr> {
        reader.read_i32()
    }

    fn wire_size(&self) -> usize {
        4
    }
}

// Strings carry their NUL terminator in the length prefix; a zero length is null.
impl Serde for Option<String> {
    fn ser(&self, writer: &mut WireWriter) {
        match self {
            None => writer.write_u32(0),
            Some(value) => {
                let mut payload = Vec::with_capacity(value.len() + 1);
                payload.extend_from_slice(value.as_bytes());
                payload.push(0);
                writer.write_u32(payload.len() as u32);
                writer.write_padded(&payload);
            }
        }
    }

    fn de(reader: &mut WireReader) -> Result<Self, SerdeErr> {
        let length = reader.read_u32()? as usize;
        if length == 0 {
            return Ok(None);
        }
        let payload = reader.read_padded(length)?;
        let Some((&0, text)) = payload.split_last() else {
            return Err(SerdeErr::MissingNulTerminator { length });
        };
        let text = std::str::from_utf8(text).map_err(|_| SerdeErr::InvalidUtf8 { length })?;
        Ok(Some(text.to_string()))
    }

    fn wire_size(&self) -> usize {
        match self {
            None => 4,
            Some(value) => 4 + padded_len(value.len() + 1),
        }
    }
}

impl Serde for Vec<u8> {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_u32(self.len() as u32);
        writer.write_padded(self);
    }

    fn de(reader: &mut WireReader) -> Result<Self, SerdeErr> {
        let length = reader.read_u32()? as usize;
        Ok(reader.read_padded(length)?.to_vec())
    }

    fn wire_size(&self) -> usize {
        4 + padded_len(self.len())
    }
}
