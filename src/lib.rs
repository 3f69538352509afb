mod config;
pub mod describe;
mod events;
mod input;
mod session;
pub mod timecode;
pub mod timing;
mod ui;

pub use config::{Config, ConfigError, DEFAULT_CONFIG_FILE};
pub use events::{Channel, MessageError, MidiMessage, TimedMessage};
pub use input::{InputError, InputReceiver, InputSender, MidiMonitor, handoff};
pub use session::{Control, DrumPad, Session};
pub use ui::MidiLogApp;
