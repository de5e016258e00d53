use sluice_shared::{GlobalName, InterfaceKind};

use crate::config::GlobalPolicy;

/// A host global as recorded by the registry bridge
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalDescriptor {
    /// Name the host announced the global under
    pub host_name: GlobalName,
    pub interface: String,
    /// `None` for interfaces the proxy does not carry
    pub kind: Option<InterfaceKind>,
    pub host_version: u32,
    /// How the proxy treats it; `None` when unsupported
    pub policy: Option<GlobalPolicy>,
    /// Server-range name guests see; only forwarded globals have one
    pub server_name: Option<GlobalName>,
    /// Version offered to guests, capped to what the proxy implements
    pub advertised_version: u32,
    /// Lowest host version the proxy can translate
    pub min_version: u32,
}

impl GlobalDescriptor {
    pub fn advertisement(&self) -> Option<GlobalAdvertisement> {
        self.server_name.map(|name| GlobalAdvertisement {
            name,
            interface: self.interface.clone(),
            version: self.advertised_version,
        })
    }
}

/// A `wl_registry.global` event as a guest receives it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalAdvertisement {
    pub name: GlobalName,
    pub interface: String,
    pub version: u32,
}

/// What the caller must do after a host global was announced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnounceOutcome {
    /// Send the advertisement to every guest registry
    Forward(GlobalAdvertisement),
    /// Bind the global for the proxy's own use
    HostOnly {
        host_name: GlobalName,
        interface: InterfaceKind,
        version: u32,
    },
    /// Recorded only; nothing to send
    Recorded,
}

/// A resolved guest bind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindTarget {
    pub host_name: GlobalName,
    pub interface: InterfaceKind,
    pub advertised_version: u32,
    pub requested_version: u32,
}
