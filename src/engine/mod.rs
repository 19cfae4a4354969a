//! Note scheduling and the per-block session driver.
//!
//! [`TriggerEngine`] owns one detector and one scheduler and drives them with
//! the same block, which is all a realtime caller needs. The pieces can also be
//! used on their own.

pub mod allocator;
pub mod scheduler;

pub use scheduler::{dynamic_velocity, NoteScheduler, SchedulerParams, VelocityMode};

use crate::{
    detect::{DetectorParams, OnsetDetector, TriggerBuffer},
    io::midi::NoteBuffer,
};

/// Diagnostic summary of one processed block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlockReport {
    /// Triggers detected (and scheduled) in the block.
    pub triggers: usize,
    pub envelope: f32,
    pub threshold: f32,
}

/// One audio session: detector and scheduler sharing a time base.
pub struct TriggerEngine {
    detector: OnsetDetector,
    scheduler: NoteScheduler,
    triggers: TriggerBuffer,
}

impl TriggerEngine {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            detector: OnsetDetector::new(sample_rate),
            scheduler: NoteScheduler::new(sample_rate),
            triggers: TriggerBuffer::new(),
        }
    }

    /// Start a session at `sample_rate`. Call again whenever the rate changes.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.detector.prepare(sample_rate);
        self.scheduler.prepare(sample_rate);
        self.triggers.clear();
    }

    /// Clear all state, keeping the sample rate. Pending note-offs are dropped;
    /// call [`TriggerEngine::flush`] first to release them.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.scheduler.reset();
        self.triggers.clear();
        log::debug!("trigger engine reset");
    }

    /// Analyse `mono` and write the block's note events into `out`.
    pub fn process(
        &mut self,
        mono: &[f32],
        detector_params: &DetectorParams,
        scheduler_params: &SchedulerParams,
        out: &mut NoteBuffer,
    ) -> BlockReport {
        self.detector
            .process_block(mono, detector_params, &mut self.triggers);
        self.scheduler
            .process(self.triggers.events(), mono.len(), scheduler_params, out);

        BlockReport {
            triggers: self.triggers.len(),
            envelope: self.triggers.envelope,
            threshold: self.triggers.threshold,
        }
    }

    /// Release every pending note-off at offset 0.
    pub fn flush(&mut self, out: &mut NoteBuffer) {
        self.scheduler.flush(out);
    }

    /// Triggers found in the most recent block.
    pub fn triggers(&self) -> &TriggerBuffer {
        &self.triggers
    }

    pub fn detector(&self) -> &OnsetDetector {
        &self.detector
    }

    pub fn scheduler(&self) -> &NoteScheduler {
        &self.scheduler
    }

    pub fn sample_rate(&self) -> f64 {
        self.detector.sample_rate()
    }
}

impl Default for TriggerEngine {
    fn default() -> Self {
        Self::new(crate::DEFAULT_SAMPLE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::midi::MidiEvent;

    #[test]
    fn click_becomes_note_pair() {
        let mut engine = TriggerEngine::new(1_000.0);
        let mut out = NoteBuffer::new();
        let detector_params = DetectorParams {
            focus_low: false,
            ..Default::default()
        };
        // 30 ms at 1 kHz = 30 samples
        let scheduler_params = SchedulerParams::default();

        let mut block = vec![0.0f32; 100];
        block[20] = 1.0;
        let report = engine.process(&block, &detector_params, &scheduler_params, &mut out);

        assert_eq!(report.triggers, 1);
        assert_eq!(
            out.events()[0].event,
            MidiEvent::NoteOn {
                channel: 1,
                key: 36,
                velocity: 100
            }
        );
        assert_eq!(out.events()[0].offset, 20);
        assert_eq!(out.events()[1].offset, 50);
    }

    #[test]
    fn flush_after_long_note() {
        let mut engine = TriggerEngine::new(1_000.0);
        let mut out = NoteBuffer::new();
        let detector_params = DetectorParams {
            focus_low: false,
            ..Default::default()
        };
        let scheduler_params = SchedulerParams {
            note_length_ms: 100.0,
            ..Default::default()
        };

        let mut block = vec![0.0f32; 50];
        block[5] = 1.0;
        engine.process(&block, &detector_params, &scheduler_params, &mut out);
        assert_eq!(engine.scheduler().pending_count(), 1);

        engine.flush(&mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(engine.scheduler().pending_count(), 0);
    }

    #[test]
    fn prepare_clears_session() {
        let mut engine = TriggerEngine::new(1_000.0);
        let mut out = NoteBuffer::new();
        let detector_params = DetectorParams {
            focus_low: false,
            ..Default::default()
        };

        let mut block = vec![0.0f32; 50];
        block[5] = 1.0;
        engine.process(&block, &detector_params, &SchedulerParams::default(), &mut out);

        engine.prepare(48_000.0);
        assert_eq!(engine.sample_rate(), 48_000.0);
        assert!(engine.triggers().is_empty());
        assert_eq!(engine.scheduler().pending_count(), 0);
        assert_eq!(engine.detector().envelope(), 0.0);
    }
}
