use std::default::Default;

use sluice_shared::InterfaceKind;

/// How the proxy treats a host global of a supported interface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobalPolicy {
    /// Re-advertised to guests under a proxy-assigned name
    Forward,
    /// Bound by the proxy itself and never shown to guests
    HostOnly,
}

/// A host global interface the proxy knows how to translate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupportedGlobal {
    pub interface: InterfaceKind,
    /// Lowest host version the translator can work with
    pub min_version: u32,
    /// Highest version the proxy implements; advertisements are capped to it
    pub max_version: u32,
    pub policy: GlobalPolicy,
}

impl SupportedGlobal {
    pub const fn forward(interface: InterfaceKind, min_version: u32, max_version: u32) -> Self {
        Self {
            interface,
            min_version,
            max_version,
            policy: GlobalPolicy::Forward,
        }
    }

    pub const fn host_only(interface: InterfaceKind, min_version: u32, max_version: u32) -> Self {
        Self {
            interface,
            min_version,
            max_version,
            policy: GlobalPolicy::HostOnly,
        }
    }
}

/// Contains Config properties which will be used by the proxy Context
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    /// Host globals the proxy bridges; anything else is recorded but never
    /// shown to guests
    pub supported_globals: Vec<SupportedGlobal>,
    /// Merge the host's extension scale stream into output events. When
    /// disabled, guests see the core scale factor only and the extension
    /// shell is never bound.
    pub use_extension_scale: bool,
}

impl ProxyConfig {
    pub fn supported(&self, interface: InterfaceKind) -> Option<&SupportedGlobal> {
        self.supported_globals
            .iter()
            .find(|supported| supported.interface == interface)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            supported_globals: vec![
                SupportedGlobal::forward(InterfaceKind::Compositor, 1, 4),
                SupportedGlobal::forward(InterfaceKind::Output, 2, 4),
                SupportedGlobal::host_only(InterfaceKind::AuraShell, 2, 38),
            ],
            use_extension_scale: true,
        }
    }
}
