use thiserror::Error;

/// A MIDI channel, numbered 1 to 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel(u8);

impl Channel {
    pub fn new(number: u8) -> Result<Self, MessageError> {
        if (1..=16).contains(&number) {
            Ok(Self(number))
        } else {
            Err(MessageError::InvalidChannel(number))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    fn from_status(status: u8) -> Self {
        Self((status & 0x0F) + 1)
    }

    fn status_bits(self) -> u8 {
        self.0 - 1
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    #[error("MIDI channel {0} is outside 1..=16")]
    InvalidChannel(u8),
    #[error("cannot decode an empty MIDI message")]
    Empty,
}

pub const ALL_SOUND_OFF: u8 = 120;
pub const ALL_NOTES_OFF: u8 = 123;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn {
        channel: Channel,
        note: u8,
        velocity: u8,
    },
    NoteOff {
        channel: Channel,
        note: u8,
        velocity: u8,
    },
    ControllerChange {
        channel: Channel,
        controller: u8,
        value: u8,
    },
    ProgramChange {
        channel: Channel,
        program: u8,
    },
    /// 14-bit value, 8192 is centre.
    PitchWheel {
        channel: Channel,
        value: u16,
    },
    Aftertouch {
        channel: Channel,
        note: u8,
        pressure: u8,
    },
    ChannelPressure {
        channel: Channel,
        pressure: u8,
    },
    AllNotesOff {
        channel: Channel,
    },
    AllSoundOff {
        channel: Channel,
    },
    Meta {
        kind: u8,
        data: Vec<u8>,
    },
    Raw(Vec<u8>),
}

impl MidiMessage {
    /// The note-off that ends this note-on, or `None` for any other kind.
    pub fn matching_note_off(&self) -> Option<MidiMessage> {
        match self {
            MidiMessage::NoteOn { channel, note, .. } => Some(MidiMessage::NoteOff {
                channel: *channel,
                note: *note,
                velocity: 0,
            }),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => vec![0x90 | channel.status_bits(), note & 0x7F, velocity & 0x7F],
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => vec![0x80 | channel.status_bits(), note & 0x7F, velocity & 0x7F],
            MidiMessage::Aftertouch {
                channel,
                note,
                pressure,
            } => vec![0xA0 | channel.status_bits(), note & 0x7F, pressure & 0x7F],
            MidiMessage::ControllerChange {
                channel,
                controller,
                value,
            } => vec![0xB0 | channel.status_bits(), controller & 0x7F, value & 0x7F],
            MidiMessage::AllSoundOff { channel } => {
                vec![0xB0 | channel.status_bits(), ALL_SOUND_OFF, 0]
            }
            MidiMessage::AllNotesOff { channel } => {
                vec![0xB0 | channel.status_bits(), ALL_NOTES_OFF, 0]
            }
            MidiMessage::ProgramChange { channel, program } => {
                vec![0xC0 | channel.status_bits(), program & 0x7F]
            }
            MidiMessage::ChannelPressure { channel, pressure } => {
                vec![0xD0 | channel.status_bits(), pressure & 0x7F]
            }
            MidiMessage::PitchWheel { channel, value } => {
                let value = (*value).min(0x3FFF);
                vec![
                    0xE0 | channel.status_bits(),
                    (value & 0x7F) as u8,
                    (value >> 7) as u8,
                ]
            }
            MidiMessage::Meta { kind, data } => {
                let mut bytes = Vec::with_capacity(data.len() + 3);
                bytes.push(0xFF);
                bytes.push(*kind);
                bytes.push(data.len().min(0x7F) as u8);
                bytes.extend(data.iter().take(0x7F));
                bytes
            }
            MidiMessage::Raw(bytes) => bytes.clone(),
        }
    }

    /// Decodes a single message. Anything that isn't a complete channel-voice
    /// or meta message comes back as `Raw`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        let Some(&status) = bytes.first() else {
            return Err(MessageError::Empty);
        };

        if status == 0xFF {
            if let (Some(&kind), Some(&len)) = (bytes.get(1), bytes.get(2)) {
                if let Some(data) = bytes.get(3..3 + len as usize) {
                    return Ok(MidiMessage::Meta {
                        kind,
                        data: data.to_vec(),
                    });
                }
            }
            return Ok(MidiMessage::Raw(bytes.to_vec()));
        }

        let channel = Channel::from_status(status);
        let data1 = bytes.get(1).copied().filter(|b| *b < 0x80);
        let data2 = bytes.get(2).copied().filter(|b| *b < 0x80);

        let message = match (status & 0xF0, data1, data2) {
            (0x90, Some(note), Some(0)) => MidiMessage::NoteOff {
                channel,
                note,
                velocity: 0,
            },
            (0x90, Some(note), Some(velocity)) => MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            },
            (0x80, Some(note), Some(velocity)) => MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            },
            (0xA0, Some(note), Some(pressure)) => MidiMessage::Aftertouch {
                channel,
                note,
                pressure,
            },
            (0xB0, Some(ALL_SOUND_OFF), Some(_)) => MidiMessage::AllSoundOff { channel },
            (0xB0, Some(ALL_NOTES_OFF), Some(_)) => MidiMessage::AllNotesOff { channel },
            (0xB0, Some(controller), Some(value)) => MidiMessage::ControllerChange {
                channel,
                controller,
                value,
            },
            (0xC0, Some(program), _) => MidiMessage::ProgramChange { channel, program },
            (0xD0, Some(pressure), _) => MidiMessage::ChannelPressure { channel, pressure },
            (0xE0, Some(lsb), Some(msb)) => MidiMessage::PitchWheel {
                channel,
                value: ((msb as u16) << 7) | lsb as u16,
            },
            _ => MidiMessage::Raw(bytes.to_vec()),
        };

        Ok(message)
    }
}

/// A message stamped with seconds since the session started.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedMessage {
    pub message: MidiMessage,
    pub timestamp: f64,
}

impl TimedMessage {
    pub fn new(message: MidiMessage, timestamp: f64) -> Self {
        Self { message, timestamp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(n: u8) -> Channel {
        Channel::new(n).unwrap()
    }

    #[test]
    fn rejects_out_of_range_channels() {
        assert_eq!(Channel::new(0), Err(MessageError::InvalidChannel(0)));
        assert_eq!(Channel::new(17), Err(MessageError::InvalidChannel(17)));
        assert_eq!(Channel::new(16).unwrap().number(), 16);
    }

    #[test]
    fn encodes_note_on_for_channel_ten() {
        let message = MidiMessage::NoteOn {
            channel: ch(10),
            note: 38,
            velocity: 100,
        };
        assert_eq!(message.to_bytes(), vec![0x99, 38, 100]);
    }

    #[test]
    fn note_on_with_zero_velocity_decodes_as_note_off() {
        let message = MidiMessage::from_bytes(&[0x93, 60, 0]).unwrap();
        assert_eq!(
            message,
            MidiMessage::NoteOff {
                channel: ch(4),
                note: 60,
                velocity: 0,
            }
        );
    }

    #[test]
    fn channel_mode_controllers_decode_to_their_own_kinds() {
        assert_eq!(
            MidiMessage::from_bytes(&[0xB0, 123, 0]).unwrap(),
            MidiMessage::AllNotesOff { channel: ch(1) }
        );
        assert_eq!(
            MidiMessage::from_bytes(&[0xB1, 120, 0]).unwrap(),
            MidiMessage::AllSoundOff { channel: ch(2) }
        );
    }

    #[test]
    fn decodes_pitch_wheel_as_fourteen_bits() {
        let message = MidiMessage::from_bytes(&[0xE0, 0x00, 0x40]).unwrap();
        assert_eq!(
            message,
            MidiMessage::PitchWheel {
                channel: ch(1),
                value: 8192,
            }
        );
        assert_eq!(message.to_bytes(), vec![0xE0, 0x00, 0x40]);
    }

    #[test]
    fn truncated_and_system_messages_fall_back_to_raw() {
        assert_eq!(
            MidiMessage::from_bytes(&[0x90, 60]).unwrap(),
            MidiMessage::Raw(vec![0x90, 60])
        );
        assert_eq!(
            MidiMessage::from_bytes(&[0xF8]).unwrap(),
            MidiMessage::Raw(vec![0xF8])
        );
        assert_eq!(MidiMessage::from_bytes(&[]), Err(MessageError::Empty));
    }

    #[test]
    fn decodes_meta_events() {
        let message = MidiMessage::from_bytes(&[0xFF, 0x51, 3, 0x07, 0xA1, 0x20]).unwrap();
        assert_eq!(
            message,
            MidiMessage::Meta {
                kind: 0x51,
                data: vec![0x07, 0xA1, 0x20],
            }
        );
    }

    #[test]
    fn note_off_keeps_channel_and_note() {
        let on = MidiMessage::NoteOn {
            channel: ch(10),
            note: 42,
            velocity: 100,
        };
        assert_eq!(
            on.matching_note_off(),
            Some(MidiMessage::NoteOff {
                channel: ch(10),
                note: 42,
                velocity: 0,
            })
        );
        assert_eq!(MidiMessage::Raw(vec![0xF8]).matching_note_off(), None);
    }
}
