//! Opcodes and enumerated values of the carried interfaces.

pub mod wl_display {
    use crate::Opcode;

    pub const SYNC: Opcode = 0;
    pub const GET_REGISTRY: Opcode = 1;

    pub const ERROR: Opcode = 0;
    pub const DELETE_ID: Opcode = 1;

    pub const ERROR_INVALID_OBJECT: u32 = 0;
    pub const ERROR_INVALID_METHOD: u32 = 1;
    pub const ERROR_NO_MEMORY: u32 = 2;
    pub const ERROR_IMPLEMENTATION: u32 = 3;
}

pub mod wl_registry {
    use crate::Opcode;

    pub const BIND: Opcode = 0;

    pub const GLOBAL: Opcode = 0;
    pub const GLOBAL_REMOVE: Opcode = 1;
}

pub mod wl_callback {
    use crate::Opcode;

    pub const DONE: Opcode = 0;
}

pub mod wl_compositor {
    use crate::Opcode;

    pub const CREATE_SURFACE: Opcode = 0;
    pub const CREATE_REGION: Opcode = 1;
}

pub mod wl_surface {
    use crate::Opcode;

    pub const DESTROY: Opcode = 0;
    pub const FRAME: Opcode = 3;
    pub const SET_OPAQUE_REGION: Opcode = 4;
    pub const COMMIT: Opcode = 6;

    pub const ENTER: Opcode = 0;
    pub const LEAVE: Opcode = 1;
}

pub mod wl_region {
    use crate::Opcode;

    pub const DESTROY: Opcode = 0;
    pub const ADD: Opcode = 1;
}

pub mod wl_output {
    use crate::Opcode;

    pub const RELEASE: Opcode = 0;

    pub const GEOMETRY: Opcode = 0;
    pub const MODE: Opcode = 1;
    pub const DONE: Opcode = 2;
    pub const SCALE: Opcode = 3;
    pub const NAME: Opcode = 4;
    pub const DESCRIPTION: Opcode = 5;

    pub const SUBPIXEL_UNKNOWN: i32 = 0;
    pub const SUBPIXEL_NONE: i32 = 1;

    pub const TRANSFORM_NORMAL: i32 = 0;
    pub const TRANSFORM_90: i32 = 1;

    pub const MODE_CURRENT: u32 = 0x1;
    pub const MODE_PREFERRED: u32 = 0x2;

    pub const DONE_SINCE_VERSION: u32 = 2;
    pub const RELEASE_SINCE_VERSION: u32 = 3;
    pub const NAME_SINCE_VERSION: u32 = 4;
}

pub mod zaura_shell {
    use crate::Opcode;

    pub const GET_AURA_OUTPUT: Opcode = 1;

    pub const GET_AURA_OUTPUT_SINCE_VERSION: u32 = 2;
}

pub mod zaura_output {
    use crate::Opcode;

    pub const RELEASE: Opcode = 0;
    pub const RELEASE_SINCE_VERSION: u32 = 34;

    pub const SCALE: Opcode = 0;

    pub const SCALE_PROPERTY_CURRENT: u32 = 0x1;
    pub const SCALE_PROPERTY_PREFERRED: u32 = 0x2;

    /// Extension scale values are expressed in thousandths
    pub const SCALE_FACTOR_UNIT: u32 = 1000;
}
