use std::fmt;

use crate::describe::describe;
use crate::events::TimedMessage;

/// Wall-clock style position, `HH:MM:SS.mmm`. Each field wraps at its
/// natural modulus, so hours roll over after a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub millis: u32,
}

impl Timecode {
    pub fn from_seconds(time: f64) -> Self {
        let time = time.max(0.0);
        Self {
            hours: ((time / 3600.0) as u64 % 24) as u32,
            minutes: ((time / 60.0) as u64 % 60) as u32,
            seconds: (time as u64 % 60) as u32,
            millis: ((time * 1000.0) as u64 % 1000) as u32,
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hours, self.minutes, self.seconds, self.millis
        )
    }
}

pub fn log_line(entry: &TimedMessage) -> String {
    format!(
        "{}  -  {}",
        Timecode::from_seconds(entry.timestamp),
        describe(&entry.message)
    )
}
