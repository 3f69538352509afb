use midir::{MidiInput, MidiInputConnection};
use ringbuf::{
    HeapCons, HeapProd, HeapRb,
    traits::{Consumer, Producer, Split},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::events::MidiMessage;

const HANDOFF_CAPACITY: usize = 1024;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to create MIDI input: {0}")]
    Init(#[from] midir::InitError),
    #[error("no MIDI input port matches {0:?}")]
    NoPorts(String),
    #[error("failed to connect to MIDI input: {0}")]
    Connect(String),
}

/// Driver-thread side of the hand-off.
pub struct InputSender {
    producer: HeapProd<Vec<u8>>,
}

impl InputSender {
    pub fn send(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if self.producer.try_push(bytes.to_vec()).is_err() {
            warn!("MIDI input buffer is full, dropping message");
        }
    }
}

/// UI-thread side of the hand-off.
pub struct InputReceiver {
    consumer: HeapCons<Vec<u8>>,
}

impl InputReceiver {
    pub fn drain(&mut self) -> Vec<MidiMessage> {
        let mut messages = Vec::new();
        while let Some(bytes) = self.consumer.try_pop() {
            if let Ok(message) = MidiMessage::from_bytes(&bytes) {
                messages.push(message);
            }
        }
        messages
    }
}

pub fn handoff(capacity: usize) -> (InputSender, InputReceiver) {
    let (producer, consumer) = HeapRb::<Vec<u8>>::new(capacity).split();
    (InputSender { producer }, InputReceiver { consumer })
}

/// A connected hardware input. Messages arrive on the driver's thread and
/// are collected with [`MidiMonitor::drain`] on the UI thread.
pub struct MidiMonitor {
    port_name: String,
    receiver: InputReceiver,
    _connection: MidiInputConnection<()>,
}

impl MidiMonitor {
    /// Connects to the first port whose name contains `filter`.
    pub fn connect(filter: &str) -> Result<Self, InputError> {
        let midi_in = MidiInput::new("midilog")?;
        let ports = midi_in.ports();
        let (port, port_name) = ports
            .iter()
            .filter_map(|p| midi_in.port_name(p).ok().map(|name| (p, name)))
            .find(|(_, name)| name.contains(filter))
            .ok_or_else(|| InputError::NoPorts(filter.to_string()))?;
        let port = port.clone();

        let (mut sender, receiver) = handoff(HANDOFF_CAPACITY);
        let connection = midi_in
            .connect(
                &port,
                "midilog-input",
                move |_timestamp, message, _| sender.send(message),
                (),
            )
            .map_err(|e| InputError::Connect(e.to_string()))?;

        info!(port = %port_name, "listening for MIDI input");

        Ok(Self {
            port_name,
            receiver,
            _connection: connection,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn drain(&mut self) -> Vec<MidiMessage> {
        self.receiver.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Channel;

    #[test]
    fn hands_messages_across_threads_in_order() {
        let (mut sender, mut receiver) = handoff(16);
        std::thread::spawn(move || {
            sender.send(&[0x99, 38, 100]);
            sender.send(&[0x89, 38, 0]);
        })
        .join()
        .unwrap();

        let channel = Channel::new(10).unwrap();
        assert_eq!(
            receiver.drain(),
            vec![
                MidiMessage::NoteOn {
                    channel,
                    note: 38,
                    velocity: 100,
                },
                MidiMessage::NoteOff {
                    channel,
                    note: 38,
                    velocity: 0,
                },
            ]
        );
        assert!(receiver.drain().is_empty());
    }

    #[test]
    fn overflow_drops_newest_messages() {
        let (mut sender, mut receiver) = handoff(2);
        sender.send(&[0xC0, 1]);
        sender.send(&[0xC0, 2]);
        sender.send(&[0xC0, 3]);
        sender.send(&[]);

        assert_eq!(receiver.drain().len(), 2);
    }
}
