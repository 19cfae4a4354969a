use std::f32::consts::TAU;

/*
One-Pole Smoother
=================

The simplest recursive filter: every sample the state moves a fixed fraction
`alpha` of the way toward the input.

    y[n] = y[n-1] + alpha * (x[n] - y[n-1])

Small alpha = slow, heavy smoothing. alpha = 1 passes the input through.


Where alpha comes from
----------------------

A continuous-time pole with time constant `tau` decays by exp(-t / tau). One
sample lasts 1/sr seconds, so the per-sample decay factor is exp(-1 / (tau*sr))
and the fraction we move toward the target is its complement:

    alpha = 1 - exp(-1 / (tau * sr))

A corner frequency `fc` is the same pole written as tau = 1 / (2π fc):

    alpha = 1 - exp(-2π fc / sr)

  usage in this crate        parameter
  ------------------------   ---------
  envelope follower          tau = 8 ms
  noise-floor tracker        tau = 350 ms
  low-frequency focus        fc  = 180 Hz

Alpha is computed once per block (sample rate and time constant are fixed for
the block) and handed to `process`, so the state itself is just one float.
*/

/// Exponential smoother with a single state value.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnePole {
    state: f32,
}

impl OnePole {
    pub fn new() -> Self {
        Self { state: 0.0 }
    }

    /// Coefficient for a time constant given in milliseconds.
    #[inline]
    pub fn alpha_from_time_ms(time_ms: f32, sample_rate: f32) -> f32 {
        let samples = 0.001 * time_ms * sample_rate;
        if samples <= 0.0 {
            return 1.0;
        }
        1.0 - (-1.0 / samples).exp()
    }

    /// Coefficient for a corner frequency given in Hz.
    #[inline]
    pub fn alpha_from_cutoff_hz(cutoff_hz: f32, sample_rate: f32) -> f32 {
        if sample_rate <= 0.0 {
            return 1.0;
        }
        1.0 - (-TAU * cutoff_hz / sample_rate).exp()
    }

    /// Move toward `target` by `alpha` and return the new value.
    #[inline]
    pub fn process(&mut self, target: f32, alpha: f32) -> f32 {
        self.state += alpha * (target - self.state);
        self.state
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}
