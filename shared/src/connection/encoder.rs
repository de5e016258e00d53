use std::collections::VecDeque;

use crate::connection::{FramingError, HEADER_SIZE};

/// Queues encoded messages and packs them into transport-sized chunks.
///
/// A message is never split between chunks and chunks preserve queue order,
/// so a burst queued together reaches the peer in order and intact.
pub struct FrameEncoder {
    frames: VecDeque<Vec<u8>>,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
        }
    }

    pub fn push(&mut self, frame: Vec<u8>) {
        self.frames.push_back(frame);
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Drains every queued frame into chunks of at most `max_send_size` bytes
    pub fn drain_chunks(&mut self, max_send_size: usize) -> Result<Vec<Vec<u8>>, FramingError> {
        if max_send_size < HEADER_SIZE {
            return Err(FramingError::InvalidSendSize { max: max_send_size });
        }
        if let Some(frame) = self.frames.iter().find(|frame| frame.len() > max_send_size) {
            return Err(FramingError::MessageTooLarge {
                size: frame.len(),
                max: max_send_size,
            });
        }

        let mut chunks = Vec::new();
        let mut current: Vec<u8> = Vec::new();
        while let Some(frame) = self.frames.pop_front() {
            if !current.is_empty() && current.len() + frame.len() > max_send_size {
                chunks.push(std::mem::take(&mut current));
            }
            current.extend_from_slice(&frame);
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        Ok(chunks)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}
