use sluice_shared::{wire::wl_output, Argument, InterfaceKind, Message, ObjectId, Opcode};

use crate::output::{OutputGeometry, OutputMode};

/// One guest-facing `wl_output` event of a committed burst
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputEvent {
    Geometry(OutputGeometry),
    Mode(OutputMode),
    Scale(i32),
    Name(String),
    Description(String),
    Done,
}

impl OutputEvent {
    pub fn opcode(&self) -> Opcode {
        match self {
            OutputEvent::Geometry(_) => wl_output::GEOMETRY,
            OutputEvent::Mode(_) => wl_output::MODE,
            OutputEvent::Scale(_) => wl_output::SCALE,
            OutputEvent::Name(_) => wl_output::NAME,
            OutputEvent::Description(_) => wl_output::DESCRIPTION,
            OutputEvent::Done => wl_output::DONE,
        }
    }

    /// Lowest bound output version that receives this event
    pub fn since(&self) -> u32 {
        InterfaceKind::Output
            .event(self.opcode())
            .map(|signature| signature.since)
            .unwrap_or(1)
    }

    pub fn to_message(&self, output_id: ObjectId) -> Message {
        let args = match self {
            OutputEvent::Geometry(geometry) => vec![
                Argument::Int(geometry.x),
                Argument::Int(geometry.y),
                Argument::Int(geometry.physical_width),
                Argument::Int(geometry.physical_height),
                Argument::Int(geometry.subpixel),
                Argument::string(&geometry.make),
                Argument::string(&geometry.model),
                Argument::Int(geometry.transform),
            ],
            OutputEvent::Mode(mode) => vec![
                Argument::Uint(mode.flags),
                Argument::Int(mode.width),
                Argument::Int(mode.height),
                Argument::Int(mode.refresh),
            ],
            OutputEvent::Scale(factor) => vec![Argument::Int(*factor)],
            OutputEvent::Name(name) => vec![Argument::string(name)],
            OutputEvent::Description(description) => vec![Argument::string(description)],
            OutputEvent::Done => Vec::new(),
        };
        Message::new(output_id, self.opcode(), args)
    }
}
