use log::{info, warn};

use sluice_shared::{GlobalName, IdGenerator, IdRange, InterfaceKind};

use crate::{
    config::{GlobalPolicy, ProxyConfig},
    registry::{AnnounceOutcome, BindTarget, GlobalAdvertisement, GlobalDescriptor, RegistryError},
};

/// Mirrors the host registry into the guests' view under server-range names
pub struct RegistryBridge {
    config: ProxyConfig,
    server_names: IdGenerator,
    globals: Vec<GlobalDescriptor>,
}

impl RegistryBridge {
    pub fn new(config: &ProxyConfig) -> Self {
        Self {
            config: config.clone(),
            server_names: IdGenerator::new(IdRange::Server),
            globals: Vec::new(),
        }
    }

    pub fn on_host_global_announced(
        &mut self,
        host_name: GlobalName,
        interface: &str,
        version: u32,
    ) -> Result<AnnounceOutcome, RegistryError> {
        if self.global(host_name).is_some() {
            warn!("Host announced global {} twice; keeping the first", host_name);
            return Ok(AnnounceOutcome::Recorded);
        }

        let kind = InterfaceKind::from_name(interface);
        let supported = kind.and_then(|kind| self.config.supported(kind).copied());

        let mut descriptor = GlobalDescriptor {
            host_name,
            interface: interface.to_string(),
            kind,
            host_version: version,
            policy: supported.map(|supported| supported.policy),
            server_name: None,
            advertised_version: version,
            min_version: 1,
        };

        let outcome = match (kind, supported) {
            (Some(kind), Some(supported)) => {
                descriptor.advertised_version = version.min(supported.max_version);
                descriptor.min_version = supported.min_version;
                match supported.policy {
                    GlobalPolicy::Forward => {
                        let server_name = self.server_names.generate()?;
                        descriptor.server_name = Some(server_name);
                        info!(
                            "Forwarding host global {} ({} v{}) as {:#010x} v{}",
                            host_name,
                            interface,
                            version,
                            server_name,
                            descriptor.advertised_version
                        );
                        AnnounceOutcome::Forward(GlobalAdvertisement {
                            name: server_name,
                            interface: interface.to_string(),
                            version: descriptor.advertised_version,
                        })
                    }
                    GlobalPolicy::HostOnly if version >= supported.min_version => {
                        AnnounceOutcome::HostOnly {
                            host_name,
                            interface: kind,
                            version: descriptor.advertised_version,
                        }
                    }
                    GlobalPolicy::HostOnly => {
                        warn!(
                            "Host global {} v{} is below the supported v{}; not binding",
                            interface, version, supported.min_version
                        );
                        AnnounceOutcome::Recorded
                    }
                }
            }
            _ => AnnounceOutcome::Recorded,
        };

        self.globals.push(descriptor);
        Ok(outcome)
    }

    /// Forgets the global. Objects already bound from it stay alive.
    pub fn on_host_global_removed(&mut self, host_name: GlobalName) -> Option<GlobalDescriptor> {
        let index = self
            .globals
            .iter()
            .position(|global| global.host_name == host_name)?;
        let descriptor = self.globals.remove(index);
        if let Some(server_name) = descriptor.server_name {
            info!(
                "Host removed global {} ({}), retracting {:#010x}",
                host_name, descriptor.interface, server_name
            );
        }
        Some(descriptor)
    }

    /// Resolves a guest bind of `server_name` to the host global behind it
    pub fn on_guest_bind(
        &self,
        server_name: GlobalName,
        interface: &str,
        requested_version: u32,
    ) -> Result<BindTarget, RegistryError> {
        let (descriptor, kind) = self
            .globals
            .iter()
            .find(|global| global.server_name == Some(server_name))
            .and_then(|global| global.kind.map(|kind| (global, kind)))
            .ok_or(RegistryError::UnknownGlobal { name: server_name })?;

        if descriptor.interface != interface {
            return Err(RegistryError::InterfaceMismatch {
                name: server_name,
                advertised: descriptor.interface.clone(),
                requested: interface.to_string(),
            });
        }
        if requested_version == 0 || requested_version > descriptor.advertised_version {
            return Err(RegistryError::VersionMismatch {
                name: server_name,
                interface: descriptor.interface.clone(),
                requested: requested_version,
                available: descriptor.advertised_version,
            });
        }
        if descriptor.host_version < descriptor.min_version {
            return Err(RegistryError::VersionMismatch {
                name: server_name,
                interface: descriptor.interface.clone(),
                requested: requested_version,
                available: descriptor.host_version,
            });
        }

        Ok(BindTarget {
            host_name: descriptor.host_name,
            interface: kind,
            advertised_version: descriptor.advertised_version,
            requested_version,
        })
    }

    /// Every forwarded global, in the order the host announced them
    pub fn advertisements(&self) -> Vec<GlobalAdvertisement> {
        self.globals
            .iter()
            .filter_map(GlobalDescriptor::advertisement)
            .collect()
    }

    pub fn global(&self, host_name: GlobalName) -> Option<&GlobalDescriptor> {
        self.globals
            .iter()
            .find(|global| global.host_name == host_name)
    }

    pub fn globals(&self) -> &[GlobalDescriptor] {
        &self.globals
    }
}
