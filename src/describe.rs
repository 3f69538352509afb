use crate::events::MidiMessage;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Octave number given to MIDI note 60.
const MIDDLE_C_OCTAVE: i32 = 3;

/// Note name with sharps and octave, e.g. `D1` for note 38.
pub fn note_name(note: u8) -> String {
    let octave = (note / 12) as i32 + MIDDLE_C_OCTAVE - 5;
    format!("{}{}", NOTE_NAMES[(note % 12) as usize], octave)
}

pub fn controller_name(controller: u8) -> Option<&'static str> {
    let name = match controller {
        0 => "Bank Select",
        1 => "Modulation Wheel",
        2 => "Breath Controller",
        4 => "Foot Pedal",
        5 => "Portamento Time",
        6 => "Data Entry",
        7 => "Volume",
        8 => "Balance",
        10 => "Pan Position",
        11 => "Expression",
        12 => "Effect Control 1",
        13 => "Effect Control 2",
        16 => "General Purpose Slider 1",
        17 => "General Purpose Slider 2",
        18 => "General Purpose Slider 3",
        19 => "General Purpose Slider 4",
        32 => "Bank Select (fine)",
        33 => "Modulation Wheel (fine)",
        34 => "Breath Controller (fine)",
        36 => "Foot Pedal (fine)",
        37 => "Portamento Time (fine)",
        38 => "Data Entry (fine)",
        39 => "Volume (fine)",
        40 => "Balance (fine)",
        42 => "Pan Position (fine)",
        43 => "Expression (fine)",
        44 => "Effect Control 1 (fine)",
        45 => "Effect Control 2 (fine)",
        64 => "Hold Pedal (on/off)",
        65 => "Portamento (on/off)",
        66 => "Sostenuto Pedal (on/off)",
        67 => "Soft Pedal (on/off)",
        68 => "Legato Pedal (on/off)",
        69 => "Hold 2 Pedal (on/off)",
        70 => "Sound Variation",
        71 => "Sound Timbre",
        72 => "Sound Release Time",
        73 => "Sound Attack Time",
        74 => "Sound Brightness",
        75 => "Sound Control 6",
        76 => "Sound Control 7",
        77 => "Sound Control 8",
        78 => "Sound Control 9",
        79 => "Sound Control 10",
        80 => "General Purpose Button 1 (on/off)",
        81 => "General Purpose Button 2 (on/off)",
        82 => "General Purpose Button 3 (on/off)",
        83 => "General Purpose Button 4 (on/off)",
        91 => "Reverb Level",
        92 => "Tremolo Level",
        93 => "Chorus Level",
        94 => "Celeste Level",
        95 => "Phaser Level",
        96 => "Data Button Increment",
        97 => "Data Button Decrement",
        98 => "Non-registered Parameter (fine)",
        99 => "Non-registered Parameter (coarse)",
        100 => "Registered Parameter (fine)",
        101 => "Registered Parameter (coarse)",
        120 => "All Sound Off",
        121 => "All Controllers Off",
        122 => "Local Keyboard (on/off)",
        123 => "All Notes Off",
        124 => "Omni Mode Off",
        125 => "Omni Mode On",
        126 => "Mono Operation",
        127 => "Poly Operation",
        _ => return None,
    };
    Some(name)
}

pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn describe(message: &MidiMessage) -> String {
    match message {
        MidiMessage::NoteOn { note, velocity, .. } => {
            format!("Note on {} Velocity {}", note_name(*note), velocity)
        }
        MidiMessage::NoteOff { note, .. } => format!("Note off {}", note_name(*note)),
        MidiMessage::ProgramChange { program, .. } => format!("Program change {program}"),
        MidiMessage::PitchWheel { value, .. } => format!("Pitch wheel {value}"),
        MidiMessage::Aftertouch { note, pressure, .. } => {
            format!("After touch {}: {}", note_name(*note), pressure)
        }
        MidiMessage::ChannelPressure { pressure, .. } => format!("Channel pressure {pressure}"),
        MidiMessage::AllNotesOff { .. } => "All notes off".to_string(),
        MidiMessage::AllSoundOff { .. } => "All sound off".to_string(),
        MidiMessage::Meta { .. } => "Meta event".to_string(),
        MidiMessage::ControllerChange {
            controller, value, ..
        } => {
            let name = controller_name(*controller)
                .map(str::to_string)
                .unwrap_or_else(|| format!("[{controller}]"));
            format!("Controller {name}: {value}")
        }
        MidiMessage::Raw(bytes) => hex_dump(bytes),
    }
}
