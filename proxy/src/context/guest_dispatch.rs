use log::{debug, info, trace};

use sluice_shared::{
    wire::{wl_display, wl_registry},
    ArgKind, Argument, IdRange, InterfaceKind, Message, MessageHeader, MessageSignature,
    ObjectId, DISPLAY_OBJECT_ID, NULL_OBJECT_ID,
};

use crate::{
    context::{Context, TeardownOrigin},
    error::ProxyError,
    guest::{GuestKey, LocalObject},
    output::OutputMetrics,
    shadow::{ExtensionState, HostHandle, ShadowEntry, ShadowKey},
};

/// What a guest object id resolves to
#[derive(Clone, Copy)]
enum GuestTarget {
    Local(LocalObject),
    Shadow {
        host_id: ObjectId,
        interface: InterfaceKind,
        version: u32,
    },
}

impl Context {
    /// Feeds bytes received from a guest and dispatches every complete request.
    ///
    /// Guest errors terminate that guest only; `Err` is returned only when fatal.
    pub fn process_guest_bytes(&mut self, key: &GuestKey, bytes: &[u8]) -> Result<(), ProxyError> {
        let Some(guest) = self.guests.get_mut(key) else {
            return Ok(());
        };
        guest.push_bytes(bytes);
        self.process_guest_frames(key)
    }

    pub(crate) fn process_guest_frames(&mut self, key: &GuestKey) -> Result<(), ProxyError> {
        let Some(guest) = self.guests.get_mut(key) else {
            return Ok(());
        };
        let frames = match guest.take_frames() {
            Ok(frames) => frames,
            Err(error) => {
                self.terminate_guest(key, DISPLAY_OBJECT_ID, error);
                return Ok(());
            }
        };

        for frame in frames {
            let object_id = MessageHeader::parse(&frame)
                .ok()
                .flatten()
                .map(|header| header.object_id)
                .unwrap_or(DISPLAY_OBJECT_ID);
            if let Err(error) = self.dispatch_guest_frame(key, &frame) {
                if error.is_fatal() {
                    return Err(error);
                }
                self.terminate_guest(key, object_id, error);
                break;
            }
        }
        Ok(())
    }

    fn dispatch_guest_frame(&mut self, key: &GuestKey, frame: &[u8]) -> Result<(), ProxyError> {
        let header = MessageHeader::parse(frame)
            .map_err(|error| ProxyError::violation(DISPLAY_OBJECT_ID, error))?
            .ok_or_else(|| ProxyError::violation(DISPLAY_OBJECT_ID, "empty frame"))?;
        let object_id = header.object_id;

        let target = match self.guest_target(key, object_id) {
            Err(error) if error.is_benign() && self.discard_retired_request(key, &header) => {
                return Ok(());
            }
            result => result?,
        };
        let (interface, version) = match target {
            GuestTarget::Local(LocalObject::Display) => (InterfaceKind::Display, 1),
            GuestTarget::Local(LocalObject::Registry) => (InterfaceKind::Registry, 1),
            GuestTarget::Shadow {
                interface, version, ..
            } => (interface, version),
        };
        let signature = interface.request(header.opcode).ok_or_else(|| {
            ProxyError::violation(
                object_id,
                format!("invalid opcode {} on {}", header.opcode, interface),
            )
        })?;
        if signature.since > version {
            return Err(ProxyError::violation(
                object_id,
                format!(
                    "{}.{} needs version {}, object is version {}",
                    interface, signature.name, signature.since, version
                ),
            ));
        }
        let message = Message::decode(frame, signature)
            .map_err(|error| ProxyError::violation(object_id, error))?;

        match target {
            GuestTarget::Local(LocalObject::Display) => match message.opcode {
                wl_display::SYNC => {
                    let callback_id = single_new_id(&message)?;
                    self.on_guest_sync(key, callback_id)
                }
                wl_display::GET_REGISTRY => {
                    let registry_id = single_new_id(&message)?;
                    self.on_guest_get_registry(key, registry_id)
                }
                _ => Ok(()),
            },
            GuestTarget::Local(LocalObject::Registry) => match message.opcode {
                wl_registry::BIND => self.on_guest_bind(key, message),
                _ => Ok(()),
            },
            GuestTarget::Shadow {
                host_id, version, ..
            } => self.forward_guest_request(key, host_id, version, signature, message),
        }
    }

    fn guest_target(&self, key: &GuestKey, object_id: ObjectId) -> Result<GuestTarget, ProxyError> {
        if let Some(local) = self
            .guests
            .get(key)
            .and_then(|guest| guest.local_object(object_id))
        {
            return Ok(GuestTarget::Local(local));
        }
        let entry = self
            .shadows
            .get(&ShadowKey::new(*key, object_id))
            .ok_or(ProxyError::NotFound { id: object_id })?;
        Ok(GuestTarget::Shadow {
            host_id: entry.host().id(),
            interface: entry.interface(),
            version: entry.version(),
        })
    }

    /// Drops a request the guest sent on an object the host already
    /// destroyed. Returns `false` if the object was never retired.
    fn discard_retired_request(&mut self, key: &GuestKey, header: &MessageHeader) -> bool {
        let Some(guest) = self.guests.get_mut(key) else {
            return false;
        };
        let Some(interface) = guest.retired(header.object_id) else {
            return false;
        };
        let destructor = interface
            .request(header.opcode)
            .map(|signature| signature.destructor)
            .unwrap_or(false);
        if destructor {
            guest.forget_retired(header.object_id);
        }
        trace!(
            "Dropping request {} on {} {}, already destroyed by the host",
            header.opcode,
            interface,
            header.object_id
        );
        true
    }

    /// A guest-created id must come from the client range and be unused
    fn validate_new_guest_id(&mut self, key: &GuestKey, id: ObjectId) -> Result<(), ProxyError> {
        IdRange::Client.validate(id)?;
        let Some(guest) = self.guests.get_mut(key) else {
            return Ok(());
        };
        if guest.local_object(id).is_some() || self.shadows.contains(&ShadowKey::new(*key, id)) {
            return Err(ProxyError::DuplicateId { id });
        }
        guest.forget_retired(id);
        Ok(())
    }

    // Display

    fn on_guest_sync(&mut self, key: &GuestKey, callback_id: ObjectId) -> Result<(), ProxyError> {
        self.validate_new_guest_id(key, callback_id)?;
        let host_id = self.host_ids.generate()?;
        self.queue_host(&Message::new(
            DISPLAY_OBJECT_ID,
            wl_display::SYNC,
            vec![Argument::NewId(host_id)],
        ))?;
        self.shadows.insert(
            *key,
            ShadowEntry::new(callback_id, 1, HostHandle::new(host_id, InterfaceKind::Callback, 1)),
        )?;
        Ok(())
    }

    /// Creates a proxy-local registry and replays every live global to it
    fn on_guest_get_registry(&mut self, key: &GuestKey, registry_id: ObjectId) -> Result<(), ProxyError> {
        self.validate_new_guest_id(key, registry_id)?;
        let advertisements = self.registry.advertisements();
        let Some(guest) = self.guests.get_mut(key) else {
            return Ok(());
        };
        guest.add_registry(registry_id);
        for advertisement in advertisements {
            guest.queue(&Message::new(
                registry_id,
                wl_registry::GLOBAL,
                vec![
                    Argument::Uint(advertisement.name),
                    Argument::string(&advertisement.interface),
                    Argument::Uint(advertisement.version),
                ],
            ))?;
        }
        Ok(())
    }

    // Registry

    fn on_guest_bind(&mut self, key: &GuestKey, message: Message) -> Result<(), ProxyError> {
        let registry_id = message.object_id;
        let [Argument::Uint(name), Argument::UntypedNewId {
            interface,
            version,
            id,
        }] = message.args.as_slice()
        else {
            return Err(ProxyError::violation(registry_id, "malformed bind"));
        };
        let (name, version, id) = (*name, *version, *id);

        self.validate_new_guest_id(key, id)?;
        let target = self
            .registry
            .on_guest_bind(name, interface, version)
            .map_err(|error| ProxyError::from_bind(error, registry_id))?;

        // Outputs are bound at the advertised version so the host always
        // delivers `done`; the guest still only sees what its version allows.
        let host_version = match target.interface {
            InterfaceKind::Output => target.advertised_version,
            _ => target.requested_version,
        };
        let host_id = self.host_ids.generate()?;
        self.queue_host(&Message::new(
            self.host_registry_id,
            wl_registry::BIND,
            vec![
                Argument::Uint(target.host_name),
                Argument::UntypedNewId {
                    interface: target.interface.name().to_string(),
                    version: host_version,
                    id: host_id,
                },
            ],
        ))?;

        let mut entry = ShadowEntry::new(
            id,
            version,
            HostHandle::new(host_id, target.interface, host_version),
        );
        if target.interface == InterfaceKind::Output {
            entry = entry.with_extension(ExtensionState::Output(OutputMetrics::new(
                self.config.use_extension_scale,
            )));
        }
        let shadow_key = self.shadows.insert(*key, entry)?;
        if target.interface == InterfaceKind::Output {
            self.attach_aura_output(&shadow_key)?;
        }

        info!(
            "Guest {} bound {} v{} as {} (host {})",
            key.to_u64(),
            target.interface,
            version,
            id,
            host_id
        );
        Ok(())
    }

    // Generic objects

    /// Relays a request to the host, mapping object arguments into host ids
    /// and shadowing any objects it creates
    fn forward_guest_request(
        &mut self,
        key: &GuestKey,
        host_id: ObjectId,
        version: u32,
        signature: &'static MessageSignature,
        message: Message,
    ) -> Result<(), ProxyError> {
        let object_id = message.object_id;
        let opcode = message.opcode;
        let mut children: Vec<(ObjectId, InterfaceKind, u32, ObjectId)> = Vec::new();
        let mut args = Vec::with_capacity(message.args.len());

        for (argument, kind) in message.args.into_iter().zip(signature.args) {
            let mapped = match (kind, argument) {
                (ArgKind::Object { interface, .. }, Argument::Object(id)) if id != NULL_OBJECT_ID => {
                    let Some(referenced) = self.shadows.get(&ShadowKey::new(*key, id)) else {
                        if self.guests.get(key).and_then(|guest| guest.retired(id)).is_some() {
                            trace!(
                                "Dropping {}: argument {} was destroyed by the host",
                                signature.name,
                                id
                            );
                            return Ok(());
                        }
                        return Err(ProxyError::NotFound { id });
                    };
                    if let Some(expected) = interface {
                        if referenced.interface() != *expected {
                            return Err(ProxyError::violation(
                                object_id,
                                format!(
                                    "object {} is {}, {} expects {}",
                                    id,
                                    referenced.interface(),
                                    signature.name,
                                    expected
                                ),
                            ));
                        }
                    }
                    Argument::Object(referenced.host().id())
                }
                (
                    ArgKind::NewId {
                        interface: Some(child),
                    },
                    Argument::NewId(id),
                ) => {
                    self.validate_new_guest_id(key, id)?;
                    if children.iter().any(|(child_id, ..)| *child_id == id) {
                        return Err(ProxyError::DuplicateId { id });
                    }
                    let child_version = match child {
                        InterfaceKind::Callback => 1,
                        _ => version,
                    };
                    let child_host_id = self.host_ids.generate()?;
                    children.push((id, *child, child_version, child_host_id));
                    Argument::NewId(child_host_id)
                }
                (ArgKind::NewId { .. } | ArgKind::UntypedNewId, _) => {
                    return Err(ProxyError::violation(
                        object_id,
                        format!("{} creates an object the proxy does not carry", signature.name),
                    ));
                }
                (_, argument) => argument,
            };
            args.push(mapped);
        }

        self.queue_host(&Message::new(host_id, opcode, args))?;
        for (guest_id, interface, child_version, child_host_id) in children {
            self.shadows.insert(
                *key,
                ShadowEntry::new(
                    guest_id,
                    child_version,
                    HostHandle::new(child_host_id, interface, child_version),
                ),
            )?;
        }

        if signature.destructor {
            debug!("Guest {} destroyed object {}", key.to_u64(), object_id);
            self.teardown(&ShadowKey::new(*key, object_id), TeardownOrigin::GuestRequest)?;
        }
        Ok(())
    }
}

fn single_new_id(message: &Message) -> Result<ObjectId, ProxyError> {
    match message.args.as_slice() {
        [Argument::NewId(id)] => Ok(*id),
        _ => Err(ProxyError::violation(message.object_id, "expected a single new id")),
    }
}
