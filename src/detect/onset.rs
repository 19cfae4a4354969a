use arrayvec::ArrayVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::OnePole, ms_to_samples, sanitize_sample_rate, MAX_TRIGGERS_PER_BLOCK};

/*
Onset Detection
===============

Per sample, in order:

  x ──► [low-pass 180 Hz]? ──► |x| ──► envelope (8 ms) ──┬──► above = env >= thr
                                                          │
                          noise floor (350 ms) ◄── min(env, floor + 0.08)
                                    │
                   thr = max(0.0035, floor + (1 - sens) * 0.18)

A trigger fires on the rising edge of `above`, provided at least `gap` samples
have passed since the previous trigger.

  Level
      │        ╭──╮ envelope
      │       ╱    ╲
  thr ├ ─ ─ ─●─ ─ ─ ╲─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─
      │     ╱        ╲___
 floor├────╱─────────────────────────────
      └──────────────────────────────────► Time
            ↑ trigger (rising edge)

The noise-floor target is capped at `floor + 0.08` so one loud hit cannot yank
the floor up; the 350 ms follower then lets it creep toward sustained loudness
and relax again in quiet passages.

Strength is how far the envelope sits above the threshold at the moment of
crossing, scaled by 8 and clamped to [0, 1].
*/

const ENVELOPE_TIME_MS: f32 = 8.0;
const NOISE_FLOOR_TIME_MS: f32 = 350.0;
const LOW_FOCUS_CUTOFF_HZ: f32 = 180.0;

/// Maximum rise of the noise-floor target above the current floor, per sample.
const NOISE_FLOOR_MAX_STEP: f32 = 0.08;
/// Threshold lift at zero sensitivity.
const MAX_THRESHOLD_LIFT: f32 = 0.18;
/// Absolute lower bound of the threshold.
pub const MIN_THRESHOLD: f32 = 0.0035;
const STRENGTH_SCALE: f32 = 8.0;

/// Detector settings, read fresh every block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    /// 0–100, higher lowers the threshold.
    pub sensitivity: f32,
    /// Minimum time between two triggers.
    pub min_gap_ms: f32,
    /// Analyse only content below ~180 Hz (kick drums, bass).
    pub focus_low: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            sensitivity: 60.0,
            min_gap_ms: 120.0,
            focus_low: true,
        }
    }
}

/// A detected onset within the current block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggerEvent {
    /// Sample index within the block.
    pub sample_offset: usize,
    /// Normalized strength in [0, 1].
    pub strength: f32,
}

/// Fixed-capacity output of one `process_block` call.
///
/// Holds at most [`MAX_TRIGGERS_PER_BLOCK`] events in time order, plus the
/// envelope and threshold after the last sample (for metering only).
#[derive(Debug, Clone, Default)]
pub struct TriggerBuffer {
    events: ArrayVec<TriggerEvent, MAX_TRIGGERS_PER_BLOCK>,
    pub envelope: f32,
    pub threshold: f32,
}

impl TriggerBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TriggerEvent] {
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
        self.envelope = 0.0;
        self.threshold = 0.0;
    }

    /// Append an event; returns `false` (and drops it) once the buffer is full.
    pub fn push(&mut self, event: TriggerEvent) -> bool {
        self.events.try_push(event).is_ok()
    }
}

/// Threshold for a given noise floor and sensitivity (0–100).
///
/// Non-increasing in `sensitivity`, never below [`MIN_THRESHOLD`].
#[inline]
pub fn threshold(noise_floor: f32, sensitivity: f32) -> f32 {
    let sensitivity = sensitivity.clamp(0.0, 100.0) * 0.01;
    let lift = (1.0 - sensitivity) * MAX_THRESHOLD_LIFT;
    (noise_floor + lift).max(MIN_THRESHOLD)
}

pub struct OnsetDetector {
    sample_rate: f64,
    envelope: OnePole,
    noise_floor: OnePole,
    low_pass: OnePole,
    was_above: bool,
    samples_since_trigger: usize,
}

impl OnsetDetector {
    pub fn new(sample_rate: f64) -> Self {
        let mut detector = Self {
            sample_rate: sanitize_sample_rate(sample_rate),
            envelope: OnePole::new(),
            noise_floor: OnePole::new(),
            low_pass: OnePole::new(),
            was_above: false,
            samples_since_trigger: 0,
        };
        detector.reset();
        detector
    }

    /// Fix the time base and clear all state. Call before the first block and
    /// whenever the sample rate changes.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sanitize_sample_rate(sample_rate);
        if self.sample_rate != sample_rate {
            log::warn!(
                "onset detector: invalid sample rate {sample_rate}, using {}",
                self.sample_rate
            );
        }
        self.reset();
        log::debug!("onset detector prepared at {} Hz", self.sample_rate);
    }

    /// Zero the estimators and timers, keeping the sample rate.
    ///
    /// The gap counter is seeded with one second of samples so the very first
    /// onset of a session is never suppressed.
    pub fn reset(&mut self) {
        self.envelope.reset();
        self.noise_floor.reset();
        self.low_pass.reset();
        self.was_above = false;
        self.samples_since_trigger = self.sample_rate as usize;
    }

    /// Analyse one block of mono samples.
    ///
    /// `out` is cleared first. Realtime-safe: no allocation, no locking.
    pub fn process_block(&mut self, samples: &[f32], params: &DetectorParams, out: &mut TriggerBuffer) {
        out.clear();

        let sr = self.sample_rate as f32;
        let gap_samples = ms_to_samples(params.min_gap_ms as f64, self.sample_rate);

        let env_alpha = OnePole::alpha_from_time_ms(ENVELOPE_TIME_MS, sr);
        let noise_alpha = OnePole::alpha_from_time_ms(NOISE_FLOOR_TIME_MS, sr);
        let low_alpha = OnePole::alpha_from_cutoff_hz(LOW_FOCUS_CUTOFF_HZ, sr);

        let mut thr = threshold(self.noise_floor.value(), params.sensitivity);

        for (i, &sample) in samples.iter().enumerate() {
            let x = if params.focus_low {
                self.low_pass.process(sample, low_alpha)
            } else {
                sample
            };

            let env = self.envelope.process(x.abs(), env_alpha);

            let noise_target = env.min(self.noise_floor.value() + NOISE_FLOOR_MAX_STEP);
            let floor = self.noise_floor.process(noise_target, noise_alpha);

            thr = threshold(floor, params.sensitivity);
            let above = env >= thr;

            self.samples_since_trigger = self.samples_since_trigger.saturating_add(1);

            if above && !self.was_above && self.samples_since_trigger >= gap_samples {
                // Dropped events still restart the gap so a burst cannot retrigger
                // faster once the buffer is full.
                out.push(TriggerEvent {
                    sample_offset: i,
                    strength: ((env - thr) * STRENGTH_SCALE).clamp(0.0, 1.0),
                });
                self.samples_since_trigger = 0;
            }

            self.was_above = above;
        }

        out.envelope = self.envelope.value();
        out.threshold = thr;
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Current envelope estimate.
    pub fn envelope(&self) -> f32 {
        self.envelope.value()
    }

    /// Current noise-floor estimate.
    pub fn noise_floor(&self) -> f32 {
        self.noise_floor.value()
    }
}

impl Default for OnsetDetector {
    fn default() -> Self {
        Self::new(crate::DEFAULT_SAMPLE_RATE)
    }
}
