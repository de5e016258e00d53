use crate::connection::{FramingError, MessageHeader, MAX_MESSAGE_SIZE};

/// Reassembles complete message frames from an arbitrarily chunked byte stream
pub struct FrameDecoder {
    pending: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Number of buffered bytes not yet returned as a frame
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Pops the next complete frame, or `None` if more bytes are needed
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, FramingError> {
        let Some(header) = MessageHeader::parse(&self.pending)? else {
            return Ok(None);
        };
        if header.size > MAX_MESSAGE_SIZE {
            return Err(FramingError::MessageTooLarge {
                size: header.size,
                max: MAX_MESSAGE_SIZE,
            });
        }
        if self.pending.len() < header.size {
            return Ok(None);
        }
        Ok(Some(self.pending.drain(..header.size).collect()))
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}
