use log::{debug, info, trace, warn};

use sluice_shared::{
    wire::{wl_display, wl_output, wl_registry, zaura_output, zaura_shell},
    Argument, InterfaceKind, Message, MessageHeader, MessageSignature, ObjectId,
    DISPLAY_OBJECT_ID, NULL_OBJECT_ID,
};

use crate::{
    context::{Context, TeardownOrigin},
    error::ProxyError,
    output::{OutputGeometry, OutputMode},
    registry::AnnounceOutcome,
    shadow::{HostHandle, ShadowKey},
};

/// Who a host object id belongs to
#[derive(Clone, Copy)]
enum HostTarget {
    Display,
    Registry,
    AuraShell,
    Shadow(ShadowKey, InterfaceKind),
}

impl Context {
    /// Feeds bytes received from the host and dispatches every complete event
    pub fn process_host_bytes(&mut self, bytes: &[u8]) -> Result<(), ProxyError> {
        self.host_decoder.push(bytes);
        while let Some(frame) = self
            .host_decoder
            .next_frame()
            .map_err(|error| ProxyError::host_violation(NULL_OBJECT_ID, error))?
        {
            self.dispatch_host_frame(&frame)?;
        }
        Ok(())
    }

    fn dispatch_host_frame(&mut self, frame: &[u8]) -> Result<(), ProxyError> {
        let header = MessageHeader::parse(frame)
            .map_err(|error| ProxyError::host_violation(NULL_OBJECT_ID, error))?
            .ok_or_else(|| ProxyError::host_violation(NULL_OBJECT_ID, "empty frame"))?;

        let Some(target) = self.host_target(header.object_id) else {
            trace!(
                "Dropping event {} for released host object {}",
                header.opcode,
                header.object_id
            );
            return Ok(());
        };
        let interface = match target {
            HostTarget::Display => InterfaceKind::Display,
            HostTarget::Registry => InterfaceKind::Registry,
            HostTarget::AuraShell => InterfaceKind::AuraShell,
            HostTarget::Shadow(_, interface) => interface,
        };
        let Some(signature) = interface.event(header.opcode) else {
            debug!("Skipping unknown {} event {}", interface, header.opcode);
            return Ok(());
        };
        let message = Message::decode(frame, signature)
            .map_err(|error| ProxyError::host_violation(header.object_id, error))?;

        match target {
            HostTarget::Display => self.on_host_display_event(message),
            HostTarget::Registry => self.on_host_registry_event(message),
            HostTarget::AuraShell => Ok(()),
            HostTarget::Shadow(key, InterfaceKind::Output) => self.on_host_output_event(key, message),
            HostTarget::Shadow(key, InterfaceKind::AuraOutput) => {
                self.on_host_aura_output_event(key, message)
            }
            HostTarget::Shadow(key, _) => self.forward_host_event(key, signature, message),
        }
    }

    fn host_target(&self, host_id: ObjectId) -> Option<HostTarget> {
        if host_id == DISPLAY_OBJECT_ID {
            return Some(HostTarget::Display);
        }
        if host_id == self.host_registry_id {
            return Some(HostTarget::Registry);
        }
        if self.aura_shell.as_ref().map(HostHandle::id) == Some(host_id) {
            return Some(HostTarget::AuraShell);
        }
        let key = self.shadows.reverse_lookup(host_id).ok()?;
        let handle = self.shadows.get(&key)?.handle_for(host_id)?;
        Some(HostTarget::Shadow(key, handle.interface()))
    }

    // Display

    fn on_host_display_event(&mut self, message: Message) -> Result<(), ProxyError> {
        match message.opcode {
            wl_display::ERROR => Err(ProxyError::HostError {
                object_id: object_arg(&message, 0)?,
                code: uint_arg(&message, 1)?,
                message: string_arg(&message, 2)?,
            }),
            wl_display::DELETE_ID => {
                let host_id = uint_arg(&message, 0)?;
                self.on_host_delete_id(host_id)
            }
            _ => Ok(()),
        }
    }

    fn on_host_delete_id(&mut self, host_id: ObjectId) -> Result<(), ProxyError> {
        let key = match self.shadows.reverse_lookup(host_id) {
            Ok(key) => key,
            Err(error) => {
                trace!("delete_id for {}: {}", host_id, error);
                return Ok(());
            }
        };
        let is_primary = self
            .shadows
            .get(&key)
            .map(|entry| entry.host().id() == host_id)
            .unwrap_or(false);
        if !is_primary {
            return Ok(());
        }
        self.teardown(&key, TeardownOrigin::HostDestroyed)
    }

    // Registry

    fn on_host_registry_event(&mut self, message: Message) -> Result<(), ProxyError> {
        match message.opcode {
            wl_registry::GLOBAL => {
                let name = uint_arg(&message, 0)?;
                let interface = string_arg(&message, 1)?;
                let version = uint_arg(&message, 2)?;
                self.on_host_global(name, &interface, version)
            }
            wl_registry::GLOBAL_REMOVE => {
                let name = uint_arg(&message, 0)?;
                self.on_host_global_remove(name)
            }
            _ => Ok(()),
        }
    }

    fn on_host_global(&mut self, name: u32, interface: &str, version: u32) -> Result<(), ProxyError> {
        let outcome = self
            .registry
            .on_host_global_announced(name, interface, version)
            .map_err(|error| ProxyError::from_bind(error, self.host_registry_id))?;

        match outcome {
            AnnounceOutcome::Forward(advertisement) => self.broadcast_registry_event(
                wl_registry::GLOBAL,
                vec![
                    Argument::Uint(advertisement.name),
                    Argument::string(&advertisement.interface),
                    Argument::Uint(advertisement.version),
                ],
            ),
            AnnounceOutcome::HostOnly {
                host_name,
                interface: InterfaceKind::AuraShell,
                version,
            } => self.bind_aura_shell(host_name, version),
            AnnounceOutcome::HostOnly { interface, .. } => {
                debug!("No host-only handling for {}", interface);
                Ok(())
            }
            AnnounceOutcome::Recorded => Ok(()),
        }
    }

    fn on_host_global_remove(&mut self, name: u32) -> Result<(), ProxyError> {
        let Some(descriptor) = self.registry.on_host_global_removed(name) else {
            debug!("Host removed unknown global {}", name);
            return Ok(());
        };
        match descriptor.server_name {
            Some(server_name) => self.broadcast_registry_event(
                wl_registry::GLOBAL_REMOVE,
                vec![Argument::Uint(server_name)],
            ),
            None => Ok(()),
        }
    }

    /// Sends one registry event to every registry object of every guest
    fn broadcast_registry_event(
        &mut self,
        opcode: u16,
        args: Vec<Argument>,
    ) -> Result<(), ProxyError> {
        for guest in self.guests.values_mut() {
            let registries = guest.registries().to_vec();
            for registry_id in registries {
                guest.queue(&Message::new(registry_id, opcode, args.clone()))?;
            }
        }
        Ok(())
    }

    fn bind_aura_shell(&mut self, host_name: u32, version: u32) -> Result<(), ProxyError> {
        if !self.config.use_extension_scale {
            debug!("Extension scale disabled, not binding zaura_shell");
            return Ok(());
        }
        if self.aura_shell.is_some() {
            warn!("Host announced a second zaura_shell; ignoring it");
            return Ok(());
        }

        let shell_id = self.host_ids.generate()?;
        self.queue_host(&Message::new(
            self.host_registry_id,
            wl_registry::BIND,
            vec![
                Argument::Uint(host_name),
                Argument::UntypedNewId {
                    interface: InterfaceKind::AuraShell.name().to_string(),
                    version,
                    id: shell_id,
                },
            ],
        ))?;
        self.aura_shell = Some(HostHandle::new(shell_id, InterfaceKind::AuraShell, version));
        info!("Bound host zaura_shell v{} as {}", version, shell_id);

        // Outputs bound earlier still need their scale stream.
        let mut outputs: Vec<ShadowKey> = self
            .shadows
            .iter()
            .filter(|(_, entry)| {
                entry.interface() == InterfaceKind::Output
                    && !entry.has_companion(InterfaceKind::AuraOutput)
            })
            .map(|(key, _)| *key)
            .collect();
        outputs.sort();
        for key in outputs {
            self.attach_aura_output(&key)?;
        }
        Ok(())
    }

    /// Requests the extension scale stream for an output shadow
    pub(crate) fn attach_aura_output(&mut self, key: &ShadowKey) -> Result<(), ProxyError> {
        let Some((shell_id, shell_version)) = self
            .aura_shell
            .as_ref()
            .map(|shell| (shell.id(), shell.version()))
        else {
            return Ok(());
        };
        if shell_version < zaura_shell::GET_AURA_OUTPUT_SINCE_VERSION {
            return Ok(());
        }
        let output_id = self.shadows.lookup(key)?;

        let aura_output_id = self.host_ids.generate()?;
        self.queue_host(&Message::new(
            shell_id,
            zaura_shell::GET_AURA_OUTPUT,
            vec![Argument::NewId(aura_output_id), Argument::Object(output_id)],
        ))?;
        self.shadows.attach_companion(
            key,
            HostHandle::new(aura_output_id, InterfaceKind::AuraOutput, shell_version),
        )?;
        Ok(())
    }

    // Outputs

    fn on_host_output_event(&mut self, key: ShadowKey, message: Message) -> Result<(), ProxyError> {
        let Some(entry) = self.shadows.get_mut(&key) else {
            return Ok(());
        };
        let guest_version = entry.version();
        let Some(metrics) = entry.output_metrics_mut() else {
            return Ok(());
        };

        match message.opcode {
            wl_output::GEOMETRY => metrics.on_core_geometry(OutputGeometry {
                x: int_arg(&message, 0)?,
                y: int_arg(&message, 1)?,
                physical_width: int_arg(&message, 2)?,
                physical_height: int_arg(&message, 3)?,
                subpixel: int_arg(&message, 4)?,
                make: string_arg(&message, 5)?,
                model: string_arg(&message, 6)?,
                transform: int_arg(&message, 7)?,
            }),
            wl_output::MODE => metrics.on_core_mode(OutputMode {
                flags: uint_arg(&message, 0)?,
                width: int_arg(&message, 1)?,
                height: int_arg(&message, 2)?,
                refresh: int_arg(&message, 3)?,
            }),
            wl_output::SCALE => metrics.on_core_scale_factor(int_arg(&message, 0)?),
            wl_output::NAME => metrics.on_core_name(string_arg(&message, 0)?),
            wl_output::DESCRIPTION => metrics.on_core_description(string_arg(&message, 0)?),
            wl_output::DONE => {
                let burst = metrics.on_core_done();
                for event in burst.iter().filter(|event| event.since() <= guest_version) {
                    self.queue_guest(&key.guest, &event.to_message(key.guest_id))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn on_host_aura_output_event(
        &mut self,
        key: ShadowKey,
        message: Message,
    ) -> Result<(), ProxyError> {
        if message.opcode != zaura_output::SCALE {
            trace!("Ignoring zaura_output event {}", message.opcode);
            return Ok(());
        }
        let flags = uint_arg(&message, 0)?;
        let value = uint_arg(&message, 1)?;
        if let Some(metrics) = self
            .shadows
            .get_mut(&key)
            .and_then(|entry| entry.output_metrics_mut())
        {
            metrics.on_extension_scale(flags, value);
        }
        Ok(())
    }

    // Generic objects

    /// Relays an event to the guest that owns `key`, mapping object arguments
    /// back into that guest's id space
    fn forward_host_event(
        &mut self,
        key: ShadowKey,
        signature: &'static MessageSignature,
        message: Message,
    ) -> Result<(), ProxyError> {
        let guest_version = match self.shadows.get(&key) {
            Some(entry) => entry.version(),
            None => return Ok(()),
        };
        if signature.since > guest_version {
            trace!("Dropping {} for guest object at v{}", signature.name, guest_version);
            return Ok(());
        }

        let mut args = Vec::with_capacity(message.args.len());
        for argument in message.args {
            match argument {
                Argument::Object(host_id) if host_id != NULL_OBJECT_ID => {
                    match self.shadows.reverse_lookup(host_id) {
                        Ok(referenced) if referenced.guest == key.guest => {
                            args.push(Argument::Object(referenced.guest_id))
                        }
                        _ => {
                            trace!(
                                "Dropping {}: object {} is not visible to this guest",
                                signature.name,
                                host_id
                            );
                            return Ok(());
                        }
                    }
                }
                other => args.push(other),
            }
        }

        self.queue_guest(&key.guest, &Message::new(key.guest_id, message.opcode, args))?;
        if signature.destructor {
            self.teardown(&key, TeardownOrigin::HostDestroyed)?;
        }
        Ok(())
    }
}

fn argument(message: &Message, index: usize) -> Result<&Argument, ProxyError> {
    message.args.get(index).ok_or_else(|| {
        ProxyError::host_violation(message.object_id, format!("missing argument {}", index))
    })
}

fn mismatch(message: &Message, index: usize) -> ProxyError {
    ProxyError::host_violation(message.object_id, format!("unexpected type for argument {}", index))
}

fn int_arg(message: &Message, index: usize) -> Result<i32, ProxyError> {
    argument(message, index)?
        .as_int()
        .ok_or_else(|| mismatch(message, index))
}

fn uint_arg(message: &Message, index: usize) -> Result<u32, ProxyError> {
    argument(message, index)?
        .as_uint()
        .ok_or_else(|| mismatch(message, index))
}

fn object_arg(message: &Message, index: usize) -> Result<ObjectId, ProxyError> {
    argument(message, index)?
        .as_object()
        .ok_or_else(|| mismatch(message, index))
}

fn string_arg(message: &Message, index: usize) -> Result<String, ProxyError> {
    argument(message, index)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(message, index))
}
