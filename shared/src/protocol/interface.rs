use std::fmt;

use crate::{
    protocol::{
        signature::{ArgKind, MessageSignature},
        wire::zaura_output,
    },
    Opcode,
};

/// The closed set of protocol interfaces the proxy can carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InterfaceKind {
    Display,
    Registry,
    Callback,
    Compositor,
    Surface,
    Region,
    Output,
    AuraShell,
    AuraOutput,
}

/// Per-interface dispatch table entry
pub struct InterfaceSpec {
    pub kind: InterfaceKind,
    pub name: &'static str,
    pub requests: &'static [MessageSignature],
    pub events: &'static [MessageSignature],
}

impl InterfaceKind {
    pub const ALL: [InterfaceKind; 9] = [
        InterfaceKind::Display,
        InterfaceKind::Registry,
        InterfaceKind::Callback,
        InterfaceKind::Compositor,
        InterfaceKind::Surface,
        InterfaceKind::Region,
        InterfaceKind::Output,
        InterfaceKind::AuraShell,
        InterfaceKind::AuraOutput,
    ];

    pub fn spec(self) -> &'static InterfaceSpec {
        &INTERFACES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        INTERFACES
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.kind)
    }

    pub fn request(self, opcode: Opcode) -> Option<&'static MessageSignature> {
        self.spec().requests.get(usize::from(opcode))
    }

    pub fn event(self, opcode: Opcode) -> Option<&'static MessageSignature> {
        self.spec().events.get(usize::from(opcode))
    }

    /// The request that destroys an object of this interface, if there is one
    pub fn destructor_request(self) -> Option<(Opcode, &'static MessageSignature)> {
        self.spec()
            .requests
            .iter()
            .enumerate()
            .find(|(_, signature)| signature.destructor)
            .map(|(opcode, signature)| (opcode as Opcode, signature))
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use ArgKind::{Int, Uint};
use InterfaceKind as K;

const STRING: ArgKind = ArgKind::string();
const ANY_OBJECT: ArgKind = ArgKind::Object {
    interface: None,
    nullable: false,
};
const FOREIGN_NEW_ID: ArgKind = ArgKind::NewId { interface: None };
const NULLABLE_ANY_OBJECT: ArgKind = ArgKind::Object {
    interface: None,
    nullable: true,
};

static DISPLAY_REQUESTS: [MessageSignature; 2] = [
    MessageSignature::new("sync", &[ArgKind::new_id(K::Callback)]),
    MessageSignature::new("get_registry", &[ArgKind::new_id(K::Registry)]),
];
static DISPLAY_EVENTS: [MessageSignature; 2] = [
    MessageSignature::new("error", &[ANY_OBJECT, Uint, STRING]),
    MessageSignature::new("delete_id", &[Uint]),
];

static REGISTRY_REQUESTS: [MessageSignature; 1] =
    [MessageSignature::new("bind", &[Uint, ArgKind::UntypedNewId])];
static REGISTRY_EVENTS: [MessageSignature; 2] = [
    MessageSignature::new("global", &[Uint, STRING, Uint]),
    MessageSignature::new("global_remove", &[Uint]),
];

static CALLBACK_EVENTS: [MessageSignature; 1] =
    [MessageSignature::new("done", &[Uint]).destructor()];

static COMPOSITOR_REQUESTS: [MessageSignature; 2] = [
    MessageSignature::new("create_surface", &[ArgKind::new_id(K::Surface)]),
    MessageSignature::new("create_region", &[ArgKind::new_id(K::Region)]),
];

static SURFACE_REQUESTS: [MessageSignature; 11] = [
    MessageSignature::new("destroy", &[]).destructor(),
    MessageSignature::new("attach", &[NULLABLE_ANY_OBJECT, Int, Int]),
    MessageSignature::new("damage", &[Int, Int, Int, Int]),
    MessageSignature::new("frame", &[ArgKind::new_id(K::Callback)]),
    MessageSignature::new("set_opaque_region", &[ArgKind::nullable_object(K::Region)]),
    MessageSignature::new("set_input_region", &[ArgKind::nullable_object(K::Region)]),
    MessageSignature::new("commit", &[]),
    MessageSignature::new("set_buffer_transform", &[Int]).since(2),
    MessageSignature::new("set_buffer_scale", &[Int]).since(3),
    MessageSignature::new("damage_buffer", &[Int, Int, Int, Int]).since(4),
    MessageSignature::new("offset", &[Int, Int]).since(5),
];
static SURFACE_EVENTS: [MessageSignature; 4] = [
    MessageSignature::new("enter", &[ArgKind::object(K::Output)]),
    MessageSignature::new("leave", &[ArgKind::object(K::Output)]),
    MessageSignature::new("preferred_buffer_scale", &[Int]).since(6),
    MessageSignature::new("preferred_buffer_transform", &[Uint]).since(6),
];

static REGION_REQUESTS: [MessageSignature; 3] = [
    MessageSignature::new("destroy", &[]).destructor(),
    MessageSignature::new("add", &[Int, Int, Int, Int]),
    MessageSignature::new("subtract", &[Int, Int, Int, Int]),
];

static OUTPUT_REQUESTS: [MessageSignature; 1] =
    [MessageSignature::new("release", &[]).destructor().since(3)];
static OUTPUT_EVENTS: [MessageSignature; 6] = [
    MessageSignature::new("geometry", &[Int, Int, Int, Int, Int, STRING, STRING, Int]),
    MessageSignature::new("mode", &[Uint, Int, Int, Int]),
    MessageSignature::new("done", &[]).since(2),
    MessageSignature::new("scale", &[Int]).since(2),
    MessageSignature::new("name", &[STRING]).since(4),
    MessageSignature::new("description", &[STRING]).since(4),
];

static AURA_SHELL_REQUESTS: [MessageSignature; 2] = [
    MessageSignature::new("get_aura_surface", &[FOREIGN_NEW_ID, ArgKind::object(K::Surface)]),
    MessageSignature::new("get_aura_output", &[ArgKind::new_id(K::AuraOutput), ArgKind::object(K::Output)]).since(2),
];

static AURA_OUTPUT_REQUESTS: [MessageSignature; 1] =
    [MessageSignature::new("release", &[]).destructor().since(zaura_output::RELEASE_SINCE_VERSION)];
static AURA_OUTPUT_EVENTS: [MessageSignature; 3] = [
    MessageSignature::new("scale", &[Uint, Uint]),
    MessageSignature::new("connection", &[Uint]),
    MessageSignature::new("device_scale_factor", &[Uint]),
];

static INTERFACES: [InterfaceSpec; 9] = [
    InterfaceSpec {
        kind: K::Display,
        name: "wl_display",
        requests: &DISPLAY_REQUESTS,
        events: &DISPLAY_EVENTS,
    },
    InterfaceSpec {
        kind: K::Registry,
        name: "wl_registry",
        requests: &REGISTRY_REQUESTS,
        events: &REGISTRY_EVENTS,
    },
    InterfaceSpec {
        kind: K::Callback,
        name: "wl_callback",
        requests: &[],
        events: &CALLBACK_EVENTS,
    },
    InterfaceSpec {
        kind: K::Compositor,
        name: "wl_compositor",
        requests: &COMPOSITOR_REQUESTS,
        events: &[],
    },
    InterfaceSpec {
        kind: K::Surface,
        name: "wl_surface",
        requests: &SURFACE_REQUESTS,
        events: &SURFACE_EVENTS,
    },
    InterfaceSpec {
        kind: K::Region,
        name: "wl_region",
        requests: &REGION_REQUESTS,
        events: &[],
    },
    InterfaceSpec {
        kind: K::Output,
        name: "wl_output",
        requests: &OUTPUT_REQUESTS,
        events: &OUTPUT_EVENTS,
    },
    InterfaceSpec {
        kind: K::AuraShell,
        name: "zaura_shell",
        requests: &AURA_SHELL_REQUESTS,
        events: &[],
    },
    InterfaceSpec {
        kind: K::AuraOutput,
        name: "zaura_output",
        requests: &AURA_OUTPUT_REQUESTS,
        events: &AURA_OUTPUT_EVENTS,
    },
];
