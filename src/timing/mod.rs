mod quantize;
mod scheduler;

pub use quantize::TimeQuantizer;
pub use scheduler::{DelayedEventQueue, SchedulerError};
