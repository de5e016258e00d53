use sluice_serde::Fixed;

use crate::{ObjectId, NULL_OBJECT_ID};

/// A decoded message argument
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Argument {
    Int(i32),
    Uint(u32),
    Fixed(Fixed),
    String(Option<String>),
    Object(ObjectId),
    NewId(ObjectId),
    UntypedNewId {
        interface: String,
        version: u32,
        id: ObjectId,
    },
    Array(Vec<u8>),
}

impl Argument {
    pub fn string(value: &str) -> Self {
        Argument::String(Some(value.to_string()))
    }

    pub fn null_object() -> Self {
        Argument::Object(NULL_OBJECT_ID)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Argument::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Argument::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::String(Some(value)) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Argument::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Identifier of the object this argument creates, if any
    pub fn new_object_id(&self) -> Option<ObjectId> {
        match self {
            Argument::NewId(id) | Argument::UntypedNewId { id, .. } => Some(*id),
            _ => None,
        }
    }
}
