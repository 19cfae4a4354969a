//! Low-level DSP primitives used by the detector.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside per-session state structs. They stay focused on the
//! signal-processing math; thresholds and edge logic live in `detect`.

/// One-pole exponential smoother, used as envelope follower and low-pass.
pub mod one_pole;

pub use one_pole::OnePole;
