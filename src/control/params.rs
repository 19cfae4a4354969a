use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use super::AtomicF32;
use crate::{
    detect::DetectorParams,
    engine::{SchedulerParams, VelocityMode},
};

/// Parameters shared between a control thread and the audio thread.
///
/// One atomic per field; `detector()` and `scheduler()` assemble a snapshot
/// for the current block. Values are stored as given and clamped by the
/// detector and scheduler when used.
#[derive(Debug)]
pub struct SharedParams {
    sensitivity: AtomicF32,
    min_gap_ms: AtomicF32,
    focus_low: AtomicBool,
    note: AtomicU8,
    channel: AtomicU8,
    note_length_ms: AtomicF32,
    dynamic_velocity: AtomicBool,
    fixed_velocity: AtomicU8,
}

impl SharedParams {
    pub fn new() -> Self {
        Self::from_params(&DetectorParams::default(), &SchedulerParams::default())
    }

    pub fn from_params(detector: &DetectorParams, scheduler: &SchedulerParams) -> Self {
        Self {
            sensitivity: AtomicF32::new(detector.sensitivity),
            min_gap_ms: AtomicF32::new(detector.min_gap_ms),
            focus_low: AtomicBool::new(detector.focus_low),
            note: AtomicU8::new(scheduler.note),
            channel: AtomicU8::new(scheduler.channel),
            note_length_ms: AtomicF32::new(scheduler.note_length_ms),
            dynamic_velocity: AtomicBool::new(scheduler.velocity_mode == VelocityMode::Dynamic),
            fixed_velocity: AtomicU8::new(scheduler.fixed_velocity),
        }
    }

    pub fn detector(&self) -> DetectorParams {
        DetectorParams {
            sensitivity: self.sensitivity.load(),
            min_gap_ms: self.min_gap_ms.load(),
            focus_low: self.focus_low.load(Ordering::Relaxed),
        }
    }

    pub fn scheduler(&self) -> SchedulerParams {
        SchedulerParams {
            note: self.note.load(Ordering::Relaxed),
            channel: self.channel.load(Ordering::Relaxed),
            note_length_ms: self.note_length_ms.load(),
            velocity_mode: self.velocity_mode(),
            fixed_velocity: self.fixed_velocity.load(Ordering::Relaxed),
        }
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity.load()
    }

    pub fn set_sensitivity(&self, value: f32) {
        self.sensitivity.store(value);
    }

    pub fn min_gap_ms(&self) -> f32 {
        self.min_gap_ms.load()
    }

    pub fn set_min_gap_ms(&self, value: f32) {
        self.min_gap_ms.store(value);
    }

    pub fn focus_low(&self) -> bool {
        self.focus_low.load(Ordering::Relaxed)
    }

    pub fn set_focus_low(&self, value: bool) {
        self.focus_low.store(value, Ordering::Relaxed);
    }

    pub fn note(&self) -> u8 {
        self.note.load(Ordering::Relaxed)
    }

    pub fn set_note(&self, value: u8) {
        self.note.store(value, Ordering::Relaxed);
    }

    pub fn channel(&self) -> u8 {
        self.channel.load(Ordering::Relaxed)
    }

    pub fn set_channel(&self, value: u8) {
        self.channel.store(value, Ordering::Relaxed);
    }

    pub fn note_length_ms(&self) -> f32 {
        self.note_length_ms.load()
    }

    pub fn set_note_length_ms(&self, value: f32) {
        self.note_length_ms.store(value);
    }

    pub fn velocity_mode(&self) -> VelocityMode {
        if self.dynamic_velocity.load(Ordering::Relaxed) {
            VelocityMode::Dynamic
        } else {
            VelocityMode::Fixed
        }
    }

    pub fn set_velocity_mode(&self, mode: VelocityMode) {
        self.dynamic_velocity
            .store(mode == VelocityMode::Dynamic, Ordering::Relaxed);
    }

    pub fn fixed_velocity(&self) -> u8 {
        self.fixed_velocity.load(Ordering::Relaxed)
    }

    pub fn set_fixed_velocity(&self, value: u8) {
        self.fixed_velocity.store(value, Ordering::Relaxed);
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn defaults_match_param_defaults() {
        let shared = SharedParams::new();
        assert_eq!(shared.detector(), DetectorParams::default());
        assert_eq!(shared.scheduler(), SchedulerParams::default());
    }

    #[test]
    fn setters_show_up_in_next_snapshot() {
        let shared = SharedParams::new();
        shared.set_sensitivity(85.0);
        shared.set_focus_low(false);
        shared.set_velocity_mode(VelocityMode::Dynamic);
        shared.set_channel(10);

        let detector = shared.detector();
        assert_eq!(detector.sensitivity, 85.0);
        assert!(!detector.focus_low);

        let scheduler = shared.scheduler();
        assert_eq!(scheduler.velocity_mode, VelocityMode::Dynamic);
        assert_eq!(scheduler.channel, 10);
    }

    #[test]
    fn snapshots_are_readable_from_another_thread() {
        let shared = Arc::new(SharedParams::new());
        let writer = Arc::clone(&shared);

        std::thread::spawn(move || writer.set_note(42))
            .join()
            .expect("writer thread panicked");

        assert_eq!(shared.scheduler().note, 42);
    }
}
