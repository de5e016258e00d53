use crate::protocol::InterfaceKind;

/// Wire type of a single message argument
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgKind {
    Int,
    Uint,
    Fixed,
    String {
        nullable: bool,
    },
    /// Reference to an existing object; `None` accepts any interface
    Object {
        interface: Option<InterfaceKind>,
        nullable: bool,
    },
    /// Creates an object; `None` is an interface outside the carried set
    NewId {
        interface: Option<InterfaceKind>,
    },
    /// Creates an object whose interface and version travel with the id
    UntypedNewId,
    Array,
}

impl ArgKind {
    pub const fn object(interface: InterfaceKind) -> Self {
        ArgKind::Object {
            interface: Some(interface),
            nullable: false,
        }
    }

    pub const fn nullable_object(interface: InterfaceKind) -> Self {
        ArgKind::Object {
            interface: Some(interface),
            nullable: true,
        }
    }

    pub const fn new_id(interface: InterfaceKind) -> Self {
        ArgKind::NewId {
            interface: Some(interface),
        }
    }

    pub const fn string() -> Self {
        ArgKind::String { nullable: false }
    }
}

/// Static description of one request or event
#[derive(Debug, PartialEq, Eq)]
pub struct MessageSignature {
    pub name: &'static str,
    /// Interface version that introduced the message
    pub since: u32,
    pub args: &'static [ArgKind],
    /// Whether sending the message destroys the object it targets
    pub destructor: bool,
}

impl MessageSignature {
    pub const fn new(name: &'static str, args: &'static [ArgKind]) -> Self {
        Self {
            name,
            since: 1,
            args,
            destructor: false,
        }
    }

    pub const fn since(mut self, version: u32) -> Self {
        self.since = version;
        self
    }

    pub const fn destructor(mut self) -> Self {
        self.destructor = true;
        self
    }

    pub fn creates_objects(&self) -> bool {
        self.args
            .iter()
            .any(|arg| matches!(arg, ArgKind::NewId { .. } | ArgKind::UntypedNewId))
    }
}
