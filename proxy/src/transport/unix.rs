use std::{
    collections::VecDeque,
    io::{ErrorKind, Read, Write},
    os::unix::net::UnixStream,
    path::PathBuf,
};

use log::{info, trace};

use sluice_shared::MAX_MESSAGE_SIZE;

use super::{Channel, ChannelError};

const RECEIVE_BUFFER_SIZE: usize = 4 * MAX_MESSAGE_SIZE;
/// Unsent bytes the channel holds for a slow host before giving up on it
const MAX_PENDING_SEND: usize = 256 * MAX_MESSAGE_SIZE;

/// Host channel over a non-blocking Unix domain socket.
///
/// Bytes the socket does not accept right away stay queued, in order, and
/// are written ahead of anything sent later and on every `receive`.
pub struct UnixChannel {
    path: PathBuf,
    stream: Option<UnixStream>,
    receive_buffer: Box<[u8]>,
    pending_send: VecDeque<u8>,
}

impl UnixChannel {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            stream: None,
            receive_buffer: vec![0u8; RECEIVE_BUFFER_SIZE].into_boxed_slice(),
            pending_send: VecDeque::new(),
        }
    }

    /// Bytes accepted by `send` that the socket has not taken yet
    pub fn pending_send_len(&self) -> usize {
        self.pending_send.len()
    }

    fn stream(&mut self) -> Result<&mut UnixStream, ChannelError> {
        self.stream.as_mut().ok_or(ChannelError::Disconnected)
    }

    /// Writes as much of the queue as the socket accepts without blocking
    fn write_pending(&mut self) -> Result<(), ChannelError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(ChannelError::Disconnected);
        };
        while !self.pending_send.is_empty() {
            let (front, _) = self.pending_send.as_slices();
            match stream.write(front) {
                Ok(0) => {
                    self.stream = None;
                    return Err(ChannelError::Disconnected);
                }
                Ok(count) => {
                    self.pending_send.drain(..count);
                }
                Err(error) if error.kind() == ErrorKind::WouldBlock => {
                    trace!("Host socket full, {} bytes queued", self.pending_send.len());
                    break;
                }
                Err(error) if error.kind() == ErrorKind::Interrupted => {}
                Err(error) => {
                    return Err(ChannelError::SendFailed {
                        payload_size: self.pending_send.len(),
                        reason: error.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Channel for UnixChannel {
    fn init(&mut self) -> Result<(), ChannelError> {
        let stream = UnixStream::connect(&self.path).map_err(|error| ChannelError::InitFailed {
            reason: format!("{}: {}", self.path.display(), error),
        })?;
        stream
            .set_nonblocking(true)
            .map_err(|error| ChannelError::InitFailed {
                reason: error.to_string(),
            })?;
        info!("Connected to host compositor at {}", self.path.display());
        self.stream = Some(stream);
        Ok(())
    }

    fn create_context(&mut self) -> Result<(), ChannelError> {
        // A plain socket needs no context beyond the connection itself.
        self.stream()
            .map(|_| ())
            .map_err(|_| ChannelError::ContextCreationFailed {
                reason: "channel is not initialized".to_string(),
            })
    }

    fn max_send_size(&self) -> usize {
        MAX_MESSAGE_SIZE
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), ChannelError> {
        self.stream()?;
        if self.pending_send.len() + payload.len() > MAX_PENDING_SEND {
            return Err(ChannelError::SendFailed {
                payload_size: payload.len(),
                reason: format!(
                    "host has not read {} queued bytes",
                    self.pending_send.len()
                ),
            });
        }
        self.pending_send.extend(payload);
        self.write_pending()
    }

    fn receive(&mut self) -> Result<Option<Vec<u8>>, ChannelError> {
        self.write_pending()?;
        let Some(stream) = self.stream.as_mut() else {
            return Err(ChannelError::Disconnected);
        };
        match stream.read(&mut self.receive_buffer) {
            Ok(0) => {
                self.stream = None;
                Err(ChannelError::Disconnected)
            }
            Ok(count) => Ok(Some(self.receive_buffer[..count].to_vec())),
            Err(error) if error.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(error) => Err(ChannelError::ReceiveFailed {
                reason: error.to_string(),
            }),
        }
    }
}
