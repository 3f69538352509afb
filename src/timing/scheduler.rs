use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use super::TimeQuantizer;
use crate::events::{MidiMessage, TimedMessage};

/// Messages waiting for their due offset, released by [`tick`].
///
/// The cursor only moves forward. Each call to `tick(current)` covers the
/// window `[cursor, current)`; anything due in that window is released once
/// and the window is cleared.
///
/// [`tick`]: DelayedEventQueue::tick
#[derive(Debug)]
pub struct DelayedEventQueue {
    pending: BTreeMap<u64, Vec<MidiMessage>>,
    cursor: u64,
    quantizer: TimeQuantizer,
}

impl DelayedEventQueue {
    pub fn new(quantizer: TimeQuantizer) -> Self {
        Self {
            pending: BTreeMap::new(),
            cursor: 0,
            quantizer,
        }
    }

    pub fn quantizer(&self) -> TimeQuantizer {
        self.quantizer
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().copied()
    }

    pub fn insert(&mut self, message: MidiMessage, due: u64) -> Result<(), SchedulerError> {
        if due < self.cursor {
            return Err(SchedulerError::AlreadyPast {
                due,
                cursor: self.cursor,
            });
        }
        self.pending.entry(due).or_default().push(message);
        Ok(())
    }

    /// Releases everything due before `current`, in offset order, stamped
    /// with the quantized due time rather than the time it was created.
    pub fn tick(&mut self, current: u64) -> Vec<TimedMessage> {
        if current <= self.cursor {
            return Vec::new();
        }

        let later = self.pending.split_off(&current);
        let window = std::mem::replace(&mut self.pending, later);
        self.cursor = current;

        let mut released = Vec::new();
        for (due, messages) in window {
            let timestamp = self.quantizer.to_seconds(due);
            for message in messages {
                debug!(due, timestamp, ?message, "releasing delayed event");
                released.push(TimedMessage::new(message, timestamp));
            }
        }
        released
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("event due at offset {due} is already behind the cursor at {cursor}")]
    AlreadyPast { due: u64, cursor: u64 },
}
