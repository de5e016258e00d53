mod guest_client;
mod guest_key;

pub use guest_client::{GuestClient, LocalObject};
pub use guest_key::GuestKey;
