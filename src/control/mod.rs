//! Lock-free handoff between the audio thread and everything else.
//!
//! Every value here is a single atomic word, so a reader always sees either the
//! old or the new value of a field, never a torn mix. Snapshots are taken once
//! at the start of a block and used for the whole block.

/// Level, envelope, threshold and trigger flash for metering.
pub mod meter;
/// Detector and scheduler settings written by a UI, read by the audio thread.
pub mod params;

pub use meter::Meter;
pub use params::SharedParams;

use std::sync::atomic::{AtomicU32, Ordering};

/// `f32` stored as its bit pattern in an `AtomicU32`.
#[derive(Debug, Default)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_f32_round_trips_bits() {
        let value = AtomicF32::new(0.25);
        assert_eq!(value.load(), 0.25);
        value.store(-3.5);
        assert_eq!(value.load(), -3.5);
    }
}
