use sluice_shared::wire::zaura_output;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputGeometry {
    pub x: i32,
    pub y: i32,
    /// Physical width in millimeters
    pub physical_width: i32,
    /// Physical height in millimeters
    pub physical_height: i32,
    pub subpixel: i32,
    pub make: String,
    pub model: String,
    pub transform: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputMode {
    pub flags: u32,
    pub width: i32,
    pub height: i32,
    /// Refresh rate in mHz
    pub refresh: i32,
}

/// Accumulated description of one monitor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputSnapshot {
    pub geometry: Option<OutputGeometry>,
    pub mode: Option<OutputMode>,
    /// Core integer scale factor
    pub scale_factor: i32,
    /// Current extension scale, in thousandths
    pub extension_scale: Option<u32>,
    /// Preferred extension scale, in thousandths
    pub preferred_extension_scale: Option<u32>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl OutputSnapshot {
    /// Integer scale the guest is told about
    pub fn guest_scale(&self, use_extension_scale: bool) -> i32 {
        match self.extension_scale {
            Some(value) if use_extension_scale => {
                let unit = zaura_output::SCALE_FACTOR_UNIT;
                let scale = value.div_ceil(unit).max(1);
                i32::try_from(scale).unwrap_or(i32::MAX)
            }
            _ => self.scale_factor,
        }
    }
}

impl Default for OutputSnapshot {
    fn default() -> Self {
        Self {
            geometry: None,
            mode: None,
            scale_factor: 1,
            extension_scale: None,
            preferred_extension_scale: None,
            name: None,
            description: None,
        }
    }
}
