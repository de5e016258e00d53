mod error;
mod global;
mod registry_bridge;

pub use error::RegistryError;
pub use global::{AnnounceOutcome, BindTarget, GlobalAdvertisement, GlobalDescriptor};
pub use registry_bridge::RegistryBridge;
