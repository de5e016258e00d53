use crate::{error::SerdeErr, padded_len, WORD_SIZE};

/// Reads little-endian protocol words from a borrowed buffer
pub struct WireReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> WireReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn read_u32(&mut self) -> Result<u32, SerdeErr> {
        let bytes = self.take(WORD_SIZE)?;
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(bytes);
        Ok(u32::from_le_bytes(word))
    }

    pub fn read_i32(&mut self) -> Result<i32, SerdeErr> {
        let bytes = self.take(WORD_SIZE)?;
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(bytes);
        Ok(i32::from_le_bytes(word))
    }

    /// Reads `length` payload bytes and skips the padding that follows them
    pub fn read_padded(&mut self, length: usize) -> Result<&'b [u8], SerdeErr> {
        let bytes = self.take(padded_len(length))?;
        Ok(&bytes[..length])
    }

    fn take(&mut self, count: usize) -> Result<&'b [u8], SerdeErr> {
        if self.remaining() < count {
            return Err(SerdeErr::UnexpectedEnd {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let start = self.cursor;
        self.cursor += count;
        Ok(&self.buffer[start..self.cursor])
    }
}
