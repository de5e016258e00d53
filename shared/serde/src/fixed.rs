use crate::{error::SerdeErr, serde::Serde, wire_reader::WireReader, wire_writer::WireWriter};

/// Signed 24.8 fixed-point number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fixed(i32);

impl Fixed {
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub fn from_int(value: i32) -> Self {
        Self(value.saturating_mul(256))
    }

    pub fn from_f64(value: f64) -> Self {
        Self((value * 256.0).round() as i32)
    }

    pub fn raw(&self) -> i32 {
        self.0
    }

    pub fn to_f64(&self) -> f64 {
        f64::from(self.0) / 256.0
    }
}

impl Serde for Fixed {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_i32(self.0);
    }

    fn de(reader: &mut WireReader) -> Result<Self, SerdeErr> {
        Ok(Self(reader.read_i32()?))
    }

    fn wire_size(&self) -> usize {
        4
    }
}
