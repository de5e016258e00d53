use sluice_serde::{Fixed, Serde, WireReader, WireWriter};

use crate::{
    connection::{MessageHeader, HEADER_SIZE, MAX_MESSAGE_SIZE},
    connection::FramingError,
    protocol::{
        argument::Argument,
        error::ProtocolError,
        signature::{ArgKind, MessageSignature},
    },
    ObjectId, Opcode, NULL_OBJECT_ID,
};

/// A single protocol request or event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub object_id: ObjectId,
    pub opcode: Opcode,
    pub args: Vec<Argument>,
}

impl Message {
    pub fn new(object_id: ObjectId, opcode: Opcode, args: Vec<Argument>) -> Self {
        Self {
            object_id,
            opcode,
            args,
        }
    }

    /// Decodes one complete frame against the signature of its opcode
    pub fn decode(frame: &[u8], signature: &MessageSignature) -> Result<Self, ProtocolError> {
        let header = MessageHeader::parse(frame)?.ok_or(FramingError::Truncated {
            available: frame.len(),
        })?;
        if frame.len() < header.size {
            return Err(FramingError::Truncated {
                available: frame.len(),
            }
            .into());
        }

        let mut reader = WireReader::new(&frame[HEADER_SIZE..header.size]);
        let mut args = Vec::with_capacity(signature.args.len());
        for (index, kind) in signature.args.iter().enumerate() {
            let argument = match kind {
                ArgKind::Int => Argument::Int(i32::de(&mut reader)?),
                ArgKind::Uint => Argument::Uint(u32::de(&mut reader)?),
                ArgKind::Fixed => Argument::Fixed(Fixed::de(&mut reader)?),
                ArgKind::String { nullable } => {
                    let value = Option::<String>::de(&mut reader)?;
                    if value.is_none() && !nullable {
                        return Err(ProtocolError::NullArgument {
                            message: signature.name,
                            index,
                        });
                    }
                    Argument::String(value)
                }
                ArgKind::Object { nullable, .. } => {
                    let id = u32::de(&mut reader)?;
                    if id == NULL_OBJECT_ID && !nullable {
                        return Err(ProtocolError::NullArgument {
                            message: signature.name,
                            index,
                        });
                    }
                    Argument::Object(id)
                }
                ArgKind::NewId { .. } => Argument::NewId(u32::de(&mut reader)?),
                ArgKind::UntypedNewId => {
                    let interface = Option::<String>::de(&mut reader)?.ok_or(
                        ProtocolError::NullArgument {
                            message: signature.name,
                            index,
                        },
                    )?;
                    let version = u32::de(&mut reader)?;
                    let id = u32::de(&mut reader)?;
                    Argument::UntypedNewId {
                        interface,
                        version,
                        id,
                    }
                }
                ArgKind::Array => Argument::Array(Vec::<u8>::de(&mut reader)?),
            };
            args.push(argument);
        }

        if !reader.is_empty() {
            return Err(ProtocolError::TrailingBytes {
                message: signature.name,
                remaining: reader.remaining(),
            });
        }

        Ok(Self {
            object_id: header.object_id,
            opcode: header.opcode,
            args,
        })
    }

    /// Encodes the message into a single frame
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let size = self.encoded_len();
        if size > MAX_MESSAGE_SIZE {
            return Err(FramingError::MessageTooLarge {
                size,
                max: MAX_MESSAGE_SIZE,
            }
            .into());
        }

        let mut writer = WireWriter::with_capacity(size);
        MessageHeader {
            object_id: self.object_id,
            opcode: self.opcode,
            size,
        }
        .write(&mut writer);
        for argument in &self.args {
            match argument {
                Argument::Int(value) => value.ser(&mut writer),
                Argument::Uint(value) => value.ser(&mut writer),
                Argument::Fixed(value) => value.ser(&mut writer),
                Argument::String(value) => value.ser(&mut writer),
                Argument::Object(id) | Argument::NewId(id) => id.ser(&mut writer),
                Argument::UntypedNewId {
                    interface,
                    version,
                    id,
                } => {
                    Some(interface.clone()).ser(&mut writer);
                    version.ser(&mut writer);
                    id.ser(&mut writer);
                }
                Argument::Array(bytes) => bytes.ser(&mut writer),
            }
        }
        Ok(writer.to_bytes())
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE
            + self
                .args
                .iter()
                .map(|argument| match argument {
                    Argument::Int(_)
                    | Argument::Uint(_)
                    | Argument::Fixed(_)
                    | Argument::Object(_)
                    | Argument::NewId(_) => 4,
                    Argument::String(value) => value.wire_size(),
                    Argument::UntypedNewId { interface, .. } => {
                        Some(interface.clone()).wire_size() + 8
                    }
                    Argument::Array(bytes) => bytes.wire_size(),
                })
                .sum::<usize>()
    }

    /// Checks that every argument has the kind its signature declares
    pub fn conforms_to(&self, signature: &MessageSignature) -> Result<(), ProtocolError> {
        if self.args.len() != signature.args.len() {
            return Err(ProtocolError::ArgumentMismatch {
                message: signature.name,
                index: self.args.len().min(signature.args.len()),
            });
        }
        for (index, (argument, kind)) in self.args.iter().zip(signature.args).enumerate() {
            let matches = matches!(
                (argument, kind),
                (Argument::Int(_), ArgKind::Int)
                    | (Argument::Uint(_), ArgKind::Uint)
                    | (Argument::Fixed(_), ArgKind::Fixed)
                    | (Argument::String(_), ArgKind::String { .. })
                    | (Argument::Object(_), ArgKind::Object { .. })
                    | (Argument::NewId(_), ArgKind::NewId { .. })
                    | (Argument::UntypedNewId { .. }, ArgKind::UntypedNewId)
                    | (Argument::Array(_), ArgKind::Array)
            );
            if !matches {
                return Err(ProtocolError::ArgumentMismatch {
                    message: signature.name,
                    index,
                });
            }
        }
        Ok(())
    }
}
