/// Protocol object identifier, unique within one allocation authority
pub type ObjectId = u32;
/// Registry name of an advertised global
pub type GlobalName = u32;
pub type Opcode = u16;

/// The null object reference
pub const NULL_OBJECT_ID: ObjectId = 0;
/// Every connection's display singleton
pub const DISPLAY_OBJECT_ID: ObjectId = 1;

/// Which peer of the proxy a message travels to or from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeerSide {
    Guest,
    Host,
}

impl PeerSide {
    pub fn invert(self) -> Self {
        match self {
            PeerSide::Guest => PeerSide::Host,
            PeerSide::Host => PeerSide::Guest,
        }
    }
}
