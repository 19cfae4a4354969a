//! Onset detection: audio samples in, trigger events out.
//!
//! The detector compares a fast envelope against a slowly adapting noise floor
//! plus a sensitivity-controlled lift, and reports rising edges across that
//! threshold. It knows nothing about notes or MIDI; see `engine` for that.

/// Adaptive-threshold onset detector.
pub mod onset;

pub use onset::{DetectorParams, OnsetDetector, TriggerBuffer, TriggerEvent};
