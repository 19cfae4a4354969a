//! Realtime-safe onset detection and note scheduling.
//!
//! The crate turns a live mono audio stream into MIDI-style note events. An
//! [`detect::OnsetDetector`] finds rising edges of the signal envelope against a
//! self-calibrating threshold, and an [`engine::NoteScheduler`] turns those
//! triggers into sample-accurate note-on/note-off pairs, carrying note-offs
//! that land in a later block.
//!
//! Nothing on the processing path allocates, locks or logs.

pub mod control; // Tear-free parameter and meter handoff between threads
pub mod detect; // Onset (beat) detection
pub mod dsp;
pub mod engine; // Note scheduling and the per-block session driver
pub mod io;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

/// Maximum trigger events reported for one block.
pub const MAX_TRIGGERS_PER_BLOCK: usize = 64;
/// Capacity of the pending note-off pool.
pub const MAX_PENDING_NOTE_OFFS: usize = 128;
/// Capacity of the per-block note event buffer: every pending note-off plus
/// one on/off pair per trigger.
pub const MAX_NOTE_EVENTS_PER_BLOCK: usize = MAX_PENDING_NOTE_OFFS + 2 * MAX_TRIGGERS_PER_BLOCK;

pub use detect::{DetectorParams, OnsetDetector, TriggerBuffer, TriggerEvent};
pub use engine::{NoteScheduler, SchedulerParams, TriggerEngine, VelocityMode};
pub use io::midi::{MidiEvent, NoteBuffer, NoteEvent, NoteSink, TimedNote};

/// Replace a non-positive (or NaN) sample rate with the default.
#[inline]
pub(crate) fn sanitize_sample_rate(sample_rate: f64) -> f64 {
    if sample_rate > 0.0 {
        sample_rate
    } else {
        DEFAULT_SAMPLE_RATE
    }
}

/// Convert a duration in milliseconds to whole samples, never less than one.
#[inline]
pub(crate) fn ms_to_samples(ms: f64, sample_rate: f64) -> usize {
    let samples = ms.max(0.0) * sample_rate / 1000.0;
    (samples as usize).max(1)
}
