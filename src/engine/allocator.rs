use crate::{
    io::midi::{MidiEvent, NoteBuffer},
    MAX_PENDING_NOTE_OFFS,
};

/// A note-off that falls in a later block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingNoteOff {
    pub active: bool,
    /// Samples from the start of the next block until the note must end.
    pub samples_remaining: usize,
    pub key: u8,
    pub channel: u8,
}

impl PendingNoteOff {
    const EMPTY: PendingNoteOff = PendingNoteOff {
        active: false,
        samples_remaining: 0,
        key: 0,
        channel: 1,
    };
}

/// Fixed pool of pending note-off slots.
///
/// Slots are never removed, only flagged inactive. Allocation takes the first
/// inactive slot; when every slot is busy, slot 0 is overwritten and its
/// note-off is lost.
pub struct PendingPool {
    slots: [PendingNoteOff; MAX_PENDING_NOTE_OFFS],
}

impl PendingPool {
    pub fn new() -> Self {
        Self {
            slots: [PendingNoteOff::EMPTY; MAX_PENDING_NOTE_OFFS],
        }
    }

    /// Deactivate every slot without emitting anything.
    pub fn clear(&mut self) {
        self.slots.fill(PendingNoteOff::EMPTY);
    }

    /// Schedule a note-off. Returns `false` when the pool was full and slot 0
    /// had to be overwritten.
    pub fn allocate(&mut self, samples_remaining: usize, key: u8, channel: u8) -> bool {
        let note = PendingNoteOff {
            active: true,
            samples_remaining,
            key,
            channel,
        };

        match self.slots.iter_mut().find(|slot| !slot.active) {
            Some(slot) => {
                *slot = note;
                true
            }
            None => {
                self.slots[0] = note;
                false
            }
        }
    }

    /// Resolve obligations for a block of `num_samples`.
    ///
    /// A slot whose remaining count is below the block length fires at that
    /// offset and is freed; every other active slot is counted down by the
    /// block length.
    pub fn advance(&mut self, num_samples: usize, out: &mut NoteBuffer) {
        for slot in self.slots.iter_mut().filter(|slot| slot.active) {
            if slot.samples_remaining < num_samples {
                out.push(
                    slot.samples_remaining,
                    MidiEvent::NoteOff {
                        channel: slot.channel,
                        key: slot.key,
                    },
                );
                *slot = PendingNoteOff::EMPTY;
            } else {
                slot.samples_remaining -= num_samples;
            }
        }
    }

    /// Emit every outstanding note-off at offset 0 and free all slots.
    pub fn drain(&mut self, out: &mut NoteBuffer) {
        for slot in self.slots.iter_mut().filter(|slot| slot.active) {
            out.push(
                0,
                MidiEvent::NoteOff {
                    channel: slot.channel,
                    key: slot.key,
                },
            );
            *slot = PendingNoteOff::EMPTY;
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    pub fn slots(&self) -> &[PendingNoteOff] {
        &self.slots
    }
}

impl Default for PendingPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_takes_first_free_slot() {
        let mut pool = PendingPool::new();
        assert!(pool.allocate(100, 36, 1));
        assert!(pool.allocate(200, 38, 1));

        let mut out = NoteBuffer::new();
        pool.advance(150, &mut out);
        assert_eq!(out.len(), 1);
        assert!(!pool.slots()[0].active);

        // Slot 0 is free again and gets reused before slot 2
        assert!(pool.allocate(300, 40, 2));
        assert_eq!(pool.slots()[0].key, 40);
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn full_pool_overwrites_slot_zero() {
        let mut pool = PendingPool::new();
        for i in 0..MAX_PENDING_NOTE_OFFS {
            assert!(pool.allocate(1_000 + i, 36, 1));
        }

        assert!(!pool.allocate(5, 60, 3));
        assert_eq!(pool.active_count(), MAX_PENDING_NOTE_OFFS);
        assert_eq!(pool.slots()[0].key, 60);
        assert_eq!(pool.slots()[0].samples_remaining, 5);
    }

    #[test]
    fn advance_uses_strict_less_than() {
        let mut pool = PendingPool::new();
        pool.allocate(480, 36, 1);
        let mut out = NoteBuffer::new();

        pool.advance(480, &mut out);
        assert!(out.is_empty());
        assert_eq!(pool.slots()[0].samples_remaining, 0);

        pool.advance(480, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out.events()[0].offset, 0);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn drain_emits_everything_at_offset_zero() {
        let mut pool = PendingPool::new();
        pool.allocate(10_000, 36, 1);
        pool.allocate(20_000, 38, 2);
        let mut out = NoteBuffer::new();

        pool.drain(&mut out);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|e| e.offset == 0 && !e.event.is_note_on()));
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn clear_drops_silently() {
        let mut pool = PendingPool::new();
        pool.allocate(10, 36, 1);
        pool.clear();
        assert_eq!(pool.active_count(), 0);
    }
}
