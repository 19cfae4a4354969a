use std::sync::atomic::{AtomicBool, Ordering};

use super::AtomicF32;
use crate::engine::BlockReport;

/// Values published by the audio thread once per block for display.
#[derive(Debug, Default)]
pub struct Meter {
    level: AtomicF32,
    envelope: AtomicF32,
    threshold: AtomicF32,
    trigger_flash: AtomicBool,
}

impl Meter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called from the audio thread after each block.
    pub fn publish(&self, level: f32, report: &BlockReport) {
        self.level.store(level);
        self.envelope.store(report.envelope);
        self.threshold.store(report.threshold);
        if report.triggers > 0 {
            self.trigger_flash.store(true, Ordering::Relaxed);
        }
    }

    /// Peak input level of the last block.
    pub fn level(&self) -> f32 {
        self.level.load()
    }

    pub fn envelope(&self) -> f32 {
        self.envelope.load()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold.load()
    }

    /// `true` if any trigger fired since the previous call.
    pub fn consume_trigger_flash(&self) -> bool {
        self.trigger_flash.swap(false, Ordering::Relaxed)
    }
}
