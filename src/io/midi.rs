use arrayvec::ArrayVec;
#[cfg(feature = "rtrb")]
use rtrb::Producer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MAX_NOTE_EVENTS_PER_BLOCK;

/// Channel numbers are 1–16, as shown to users.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8 },
}

impl MidiEvent {
    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. } | MidiEvent::NoteOff { channel, .. } => channel,
        }
    }

    pub fn key(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => key,
        }
    }

    pub fn is_note_on(&self) -> bool {
        matches!(self, MidiEvent::NoteOn { .. })
    }

    /// Raw three-byte channel voice message.
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => [0x90 | channel_nibble(channel), key & 0x7F, velocity & 0x7F],
            MidiEvent::NoteOff { channel, key } => [0x80 | channel_nibble(channel), key & 0x7F, 0],
        }
    }
}

#[inline]
fn channel_nibble(channel: u8) -> u8 {
    channel.clamp(1, 16) - 1
}

/// A MIDI event placed at a sample offset within the current block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub offset: usize,
    pub event: MidiEvent,
}

/// A MIDI event stamped with its absolute sample position in the session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedNote {
    pub frame: u64,
    pub event: MidiEvent,
}

/// Destination for note events leaving the audio thread.
pub trait NoteSink {
    /// Returns `false` if the event could not be taken.
    fn send(&mut self, note: TimedNote) -> bool;
}

#[cfg(feature = "rtrb")]
impl NoteSink for Producer<TimedNote> {
    fn send(&mut self, note: TimedNote) -> bool {
        self.push(note).is_ok()
    }
}

/// Fixed-capacity list of note events produced for one block.
///
/// Events appear in emission order: carried-over note-offs first, then the
/// block's new notes. Call [`NoteBuffer::sort_by_offset`] if the consumer needs
/// strict time order.
#[derive(Debug, Clone, Default)]
pub struct NoteBuffer {
    events: ArrayVec<NoteEvent, MAX_NOTE_EVENTS_PER_BLOCK>,
}

impl NoteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Append an event; returns `false` (and drops it) once the buffer is full.
    pub fn push(&mut self, offset: usize, event: MidiEvent) -> bool {
        self.events.try_push(NoteEvent { offset, event }).is_ok()
    }

    /// Stable in-place sort by offset. Insertion sort: the buffer is small and
    /// nearly sorted, and this never allocates.
    pub fn sort_by_offset(&mut self) {
        for i in 1..self.events.len() {
            let mut j = i;
            while j > 0 && self.events[j - 1].offset > self.events[j].offset {
                self.events.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    /// Send every event to `sink`, stamped relative to `block_start` (the
    /// session frame of the block's first sample). Returns how many were
    /// rejected.
    pub fn forward<S: NoteSink + ?Sized>(&self, block_start: u64, sink: &mut S) -> usize {
        let mut rejected = 0;
        for note in &self.events {
            let timed = TimedNote {
                frame: block_start + note.offset as u64,
                event: note.event,
            };
            if !sink.send(timed) {
                rejected += 1;
            }
        }
        rejected
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a NoteBuffer {
    type Item = &'a NoteEvent;
    type IntoIter = std::slice::Iter<'a, NoteEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
