//! # Sluice Proxy
//! Sits between sandboxed guest clients and a host compositor. Every guest
//! object is shadowed by a host object the proxy owns, the host registry is
//! re-advertised under proxy-assigned names, and per-output metadata from the
//! core and extension event streams is merged into ordered bursts.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

mod config;
mod context;
mod error;
mod events;
mod guest;
mod output;
mod registry;
mod shadow;
mod transport;

pub use config::{GlobalPolicy, ProxyConfig, SupportedGlobal};
pub use context::Context;
pub use error::ProxyError;
pub use events::{ConnectEvent, DisconnectEvent, DisconnectReason, ProxyEvent, ProxyEvents};
pub use guest::GuestKey;
pub use output::{OutputEvent, OutputGeometry, OutputMetrics, OutputMode, OutputPhase, OutputSnapshot};
pub use registry::{
    AnnounceOutcome, BindTarget, GlobalAdvertisement, GlobalDescriptor, RegistryBridge,
    RegistryError,
};
pub use shadow::{ExtensionState, HostHandle, ShadowEntry, ShadowError, ShadowKey, ShadowTable};
pub use transport::{Channel, ChannelError, GuestConnection};

cfg_if! {
    if #[cfg(all(unix, feature = "transport_unix"))] {
        pub use transport::UnixChannel;
    }
}
