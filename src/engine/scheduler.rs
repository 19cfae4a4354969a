#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    detect::TriggerEvent,
    engine::allocator::PendingPool,
    io::midi::{MidiEvent, NoteBuffer},
    ms_to_samples, sanitize_sample_rate, MAX_TRIGGERS_PER_BLOCK,
};

const DYNAMIC_VELOCITY_MIN: f32 = 25.0;
const DYNAMIC_VELOCITY_MAX: f32 = 127.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VelocityMode {
    /// Always use `SchedulerParams::fixed_velocity`.
    #[default]
    Fixed,
    /// Map trigger strength onto velocities 25–127.
    Dynamic,
}

/// Note settings, read fresh every block. Out-of-range values are clamped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerParams {
    /// 0–127
    pub note: u8,
    /// 1–16
    pub channel: u8,
    pub note_length_ms: f32,
    pub velocity_mode: VelocityMode,
    /// 0–127
    pub fixed_velocity: u8,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            note: 36,
            channel: 1,
            note_length_ms: 30.0,
            velocity_mode: VelocityMode::Fixed,
            fixed_velocity: 100,
        }
    }
}

/// Velocity for a trigger strength in dynamic mode.
///
/// Strength 0 maps to 25, strength 1 to 127, linear in between.
pub fn dynamic_velocity(strength: f32) -> u8 {
    let strength = if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    };
    let velocity = DYNAMIC_VELOCITY_MIN + strength * (DYNAMIC_VELOCITY_MAX - DYNAMIC_VELOCITY_MIN);
    velocity.round().clamp(1.0, 127.0) as u8
}

/// Turns trigger events into note-on/note-off pairs.
///
/// Note-offs that fall past the end of the current block are parked in a fixed
/// pool and emitted by a later `process` call.
pub struct NoteScheduler {
    sample_rate: f64,
    pending: PendingPool,
    overwritten: u64,
}

impl NoteScheduler {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate: sanitize_sample_rate(sample_rate),
            pending: PendingPool::new(),
            overwritten: 0,
        }
    }

    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sanitize_sample_rate(sample_rate);
        if self.sample_rate != sample_rate {
            log::warn!(
                "note scheduler: invalid sample rate {sample_rate}, using {}",
                self.sample_rate
            );
        }
        self.reset();
        log::debug!("note scheduler prepared at {} Hz", self.sample_rate);
    }

    /// Drop all pending note-offs without emitting them.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.overwritten = 0;
    }

    /// Schedule one block.
    ///
    /// `triggers` must be in time order and `num_samples` must match the block
    /// the detector just analysed. Only the first [`MAX_TRIGGERS_PER_BLOCK`]
    /// triggers are scheduled, so every note-on fits in `out` together with
    /// its note-off. `out` is cleared first; carried-over
    /// note-offs are written before the new notes, so `out` is not strictly
    /// offset-ordered.
    pub fn process(
        &mut self,
        triggers: &[TriggerEvent],
        num_samples: usize,
        params: &SchedulerParams,
        out: &mut NoteBuffer,
    ) {
        out.clear();

        self.pending.advance(num_samples, out);

        let key = params.note.min(127);
        let channel = params.channel.clamp(1, 16);
        let fixed_velocity = params.fixed_velocity.min(127);
        let length = ms_to_samples(params.note_length_ms as f64, self.sample_rate);
        let last_offset = num_samples.saturating_sub(1);

        for trigger in triggers.iter().take(MAX_TRIGGERS_PER_BLOCK) {
            let offset = trigger.sample_offset.min(last_offset);

            let velocity = match params.velocity_mode {
                VelocityMode::Fixed => fixed_velocity,
                VelocityMode::Dynamic => dynamic_velocity(trigger.strength),
            };

            out.push(
                offset,
                MidiEvent::NoteOn {
                    channel,
                    key,
                    velocity,
                },
            );

            let end = offset + length;
            if end < num_samples {
                out.push(end, MidiEvent::NoteOff { channel, key });
            } else if !self.pending.allocate(end - num_samples, key, channel) {
                self.overwritten = self.overwritten.saturating_add(1);
            }
        }
    }

    /// Emit every outstanding note-off at offset 0 of the next block and clear
    /// the pool. Use when playback stops so no note is left hanging.
    pub fn flush(&mut self, out: &mut NoteBuffer) {
        out.clear();
        self.pending.drain(out);
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of note-offs waiting for a later block.
    pub fn pending_count(&self) -> usize {
        self.pending.active_count()
    }

    /// Pending note-offs lost to pool exhaustion since the last reset.
    pub fn overwritten_count(&self) -> u64 {
        self.overwritten
    }
}

impl Default for NoteScheduler {
    fn default() -> Self {
        Self::new(crate::DEFAULT_SAMPLE_RATE)
    }
}
