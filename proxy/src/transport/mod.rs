mod error;

pub use error::ChannelError;

cfg_if! {
    if #[cfg(all(unix, feature = "transport_unix"))] {
        mod unix;
        pub use unix::UnixChannel;
    }
}

/// Byte-oriented channel to the host compositor
pub trait Channel {
    /// Establishes the underlying connection
    fn init(&mut self) -> Result<(), ChannelError>;
    /// Prepares the host-side context the proxy's objects will live in
    fn create_context(&mut self) -> Result<(), ChannelError>;
    /// Largest payload a single `send` call may carry
    fn max_send_size(&self) -> usize;
    fn send(&mut self, payload: &[u8]) -> Result<(), ChannelError>;
    /// Returns the next received chunk, or `None` when nothing is pending
    fn receive(&mut self) -> Result<Option<Vec<u8>>, ChannelError>;
}

/// Byte-oriented connection to one guest client
pub trait GuestConnection {
    /// Largest payload a single `send` call may carry
    fn max_send_size(&self) -> usize;
    fn send(&mut self, payload: &[u8]) -> Result<(), ChannelError>;
    /// Returns the next received chunk, or `None` when nothing is pending
    fn receive(&mut self) -> Result<Option<Vec<u8>>, ChannelError>;
    /// Closes the connection; no further calls are made afterwards
    fn disconnect(&mut self);
}
