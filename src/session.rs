use std::time::Instant;

use tracing::{debug, warn};

use crate::config::{Config, ConfigError};
use crate::events::{Channel, MidiMessage, TimedMessage};
use crate::timecode::log_line;
use crate::timing::DelayedEventQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumPad {
    BassDrum,
    SnareDrum,
    ClosedHiHat,
    OpenHiHat,
    CrashCymbal,
    RideCymbal,
}

impl DrumPad {
    pub const ALL: [DrumPad; 6] = [
        DrumPad::BassDrum,
        DrumPad::SnareDrum,
        DrumPad::ClosedHiHat,
        DrumPad::OpenHiHat,
        DrumPad::CrashCymbal,
        DrumPad::RideCymbal,
    ];

    pub fn note(self) -> u8 {
        match self {
            DrumPad::BassDrum => 36,
            DrumPad::SnareDrum => 38,
            DrumPad::ClosedHiHat => 42,
            DrumPad::OpenHiHat => 46,
            DrumPad::CrashCymbal => 49,
            DrumPad::RideCymbal => 51,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DrumPad::BassDrum => "Bass Drum (36)",
            DrumPad::SnareDrum => "Snare Drum (38)",
            DrumPad::ClosedHiHat => "Closed HH (42)",
            DrumPad::OpenHiHat => "Open HH (46)",
            DrumPad::CrashCymbal => "Crash Cymbal (49)",
            DrumPad::RideCymbal => "Ride Cymbal (51)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// CC 7, slider range 0..=127.
    Volume,
    /// CC 10, slider range -10..=10.
    Pan,
}

impl Control {
    pub fn controller(self) -> u8 {
        match self {
            Control::Volume => 7,
            Control::Pan => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Control::Volume => "Volume (CC7)",
            Control::Pan => "Pan (CC10)",
        }
    }

    pub fn range(self) -> std::ops::RangeInclusive<f64> {
        match self {
            Control::Volume => 0.0..=127.0,
            Control::Pan => -10.0..=10.0,
        }
    }

    /// Maps a slider position onto a 7-bit controller value.
    pub fn to_value(self, position: f64) -> u8 {
        let (lo, hi) = (*self.range().start(), *self.range().end());
        let position = position.clamp(lo, hi);
        ((position - lo) / (hi - lo) * 127.0).round() as u8
    }
}

/// Turns pad presses and slider moves into logged MIDI messages and
/// schedules the note-off that follows each pad press.
pub struct Session {
    started: Instant,
    channel: Channel,
    velocity: u8,
    note_off_delay: f64,
    queue: DelayedEventQueue,
    log: Vec<String>,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            started: Instant::now(),
            channel: config.channel()?,
            velocity: config.velocity,
            note_off_delay: config.note_off_delay_secs,
            queue: DelayedEventQueue::new(config.quantizer()),
            log: Vec::new(),
        })
    }

    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn lines(&self) -> &[String] {
        &self.log
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn trigger_pad(&mut self, pad: DrumPad) {
        let elapsed = self.elapsed();
        self.trigger_pad_at(pad, elapsed);
    }

    pub fn control_changed(&mut self, control: Control, position: f64) {
        let elapsed = self.elapsed();
        self.control_changed_at(control, position, elapsed);
    }

    /// One frame: release due note-offs first, then log input that arrived
    /// since the last frame, so the log stays in time order.
    pub fn advance(&mut self, external: Vec<MidiMessage>) {
        let elapsed = self.elapsed();
        self.advance_at(elapsed, external);
    }

    pub fn advance_at(&mut self, elapsed: f64, external: Vec<MidiMessage>) {
        let current = self.queue.quantizer().to_offset(elapsed);
        self.tick(current);
        for message in external {
            self.receive_external(message, elapsed);
        }
    }

    pub fn trigger_pad_at(&mut self, pad: DrumPad, elapsed: f64) {
        let note_on = MidiMessage::NoteOn {
            channel: self.channel,
            note: pad.note(),
            velocity: self.velocity,
        };
        let note_off = note_on.matching_note_off();
        self.append(TimedMessage::new(note_on, elapsed));

        if let Some(note_off) = note_off {
            let due = self
                .queue
                .quantizer()
                .to_offset(elapsed + self.note_off_delay);
            if let Err(err) = self.queue.insert(note_off, due) {
                warn!(pad = pad.label(), "dropping note-off: {}", err);
            }
        }
    }

    pub fn control_changed_at(&mut self, control: Control, position: f64, elapsed: f64) {
        let message = MidiMessage::ControllerChange {
            channel: self.channel,
            controller: control.controller(),
            value: control.to_value(position),
        };
        self.append(TimedMessage::new(message, elapsed));
    }

    /// Logs a message that arrived from a MIDI input port.
    pub fn receive_external(&mut self, message: MidiMessage, elapsed: f64) {
        self.append(TimedMessage::new(message, elapsed));
    }

    pub fn tick(&mut self, current: u64) {
        for entry in self.queue.tick(current) {
            self.append(entry);
        }
    }

    fn append(&mut self, entry: TimedMessage) {
        let line = log_line(&entry);
        debug!("{}", line);
        self.log.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&Config::default()).unwrap()
    }

    #[test]
    fn snare_logs_note_on_then_scheduled_note_off() {
        let mut session = session();
        session.trigger_pad_at(DrumPad::SnareDrum, 1.0);

        assert_eq!(session.lines(), ["00:00:01.000  -  Note on D1 Velocity 100"]);
        assert_eq!(session.pending(), 1);

        // 1.1 s at 44100 units per second
        session.tick(48_000);
        assert_eq!(session.lines().len(), 1);

        session.tick(48_600);
        assert_eq!(session.lines().len(), 2);
        assert_eq!(session.lines()[1], "00:00:01.100  -  Note off D1");
        assert_eq!(session.pending(), 0);
    }

    #[test]
    fn note_off_keeps_channel_of_note_on() {
        let config = Config {
            midi_channel: 3,
            ..Config::default()
        };
        let mut session = Session::new(&config).unwrap();
        session.trigger_pad_at(DrumPad::OpenHiHat, 0.0);

        let released = session.queue.tick(10_000);
        assert_eq!(
            released[0].message,
            MidiMessage::NoteOff {
                channel: Channel::new(3).unwrap(),
                note: 46,
                velocity: 0,
            }
        );
    }

    #[test]
    fn volume_slider_logs_controller_line() {
        let mut session = session();
        session.control_changed_at(Control::Volume, 64.0, 2.5);
        assert_eq!(session.lines(), ["00:00:02.500  -  Controller Volume: 64"]);
        assert_eq!(session.pending(), 0);
    }

    #[test]
    fn pan_slider_maps_onto_seven_bits() {
        assert_eq!(Control::Pan.to_value(-10.0), 0);
        assert_eq!(Control::Pan.to_value(0.0), 64);
        assert_eq!(Control::Pan.to_value(10.0), 127);
        assert_eq!(Control::Pan.to_value(42.0), 127);
        assert_eq!(Control::Volume.to_value(100.0), 100);
    }

    #[test]
    fn late_note_off_is_dropped() {
        let mut session = session();
        session.tick(44_100 * 10);
        session.trigger_pad_at(DrumPad::BassDrum, 1.0);

        assert_eq!(session.lines().len(), 1);
        assert_eq!(session.pending(), 0);
    }

    #[test]
    fn external_messages_are_logged() {
        let mut session = session();
        session.receive_external(MidiMessage::Raw(vec![0xF8]), 0.0);
        assert_eq!(session.lines(), ["00:00:00.000  -  f8"]);
    }

    #[test]
    fn frame_releases_note_offs_before_logging_input() {
        let mut session = session();
        session.trigger_pad_at(DrumPad::SnareDrum, 0.0);
        session.advance_at(0.2, vec![MidiMessage::ProgramChange {
            channel: Channel::new(1).unwrap(),
            program: 4,
        }]);

        assert_eq!(
            session.lines(),
            [
                "00:00:00.000  -  Note on D1 Velocity 100",
                "00:00:00.100  -  Note off D1",
                "00:00:00.200  -  Program change 4",
            ]
        );
    }

    #[test]
    fn clear_empties_the_log() {
        let mut session = session();
        session.trigger_pad_at(DrumPad::RideCymbal, 0.5);
        session.clear();
        assert!(session.lines().is_empty());
        assert_eq!(session.pending(), 1);
    }
}
