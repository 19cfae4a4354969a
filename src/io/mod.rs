// Purpose - external interfaces, format conversions

pub mod midi;

/// Average `inputs` into `out` and return the block's peak absolute value.
///
/// Channels shorter than `out` contribute silence past their end; with no
/// channels at all the output is silence.
pub fn downmix(inputs: &[&[f32]], out: &mut [f32]) -> f32 {
    if inputs.is_empty() {
        out.fill(0.0);
        return 0.0;
    }

    let scale = 1.0 / inputs.len() as f32;
    let mut peak = 0.0f32;

    for (i, sample) in out.iter_mut().enumerate() {
        let sum: f32 = inputs
            .iter()
            .map(|channel| channel.get(i).copied().unwrap_or(0.0))
            .sum();
        *sample = sum * scale;
        peak = peak.max(sample.abs());
    }

    peak
}

/// Deinterleave-and-average variant for interleaved device buffers.
///
/// `data` holds `out.len() * channels` samples; returns the peak of the mono
/// signal.
pub fn downmix_interleaved(data: &[f32], channels: usize, out: &mut [f32]) -> f32 {
    if channels == 0 {
        out.fill(0.0);
        return 0.0;
    }

    let scale = 1.0 / channels as f32;
    let mut peak = 0.0f32;

    for (frame, sample) in data.chunks(channels).zip(out.iter_mut()) {
        *sample = frame.iter().sum::<f32>() * scale;
        peak = peak.max(sample.abs());
    }

    peak
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_channels() {
        let left = [1.0f32, 0.5, -1.0];
        let right = [0.0f32, 0.5, -0.5];
        let mut out = [0.0f32; 3];

        let peak = downmix(&[&left[..], &right[..]], &mut out);

        assert_eq!(out, [0.5, 0.5, -0.75]);
        assert_eq!(peak, 0.75);
    }

    #[test]
    fn downmix_without_channels_is_silent() {
        let mut out = [1.0f32; 4];
        assert_eq!(downmix(&[], &mut out), 0.0);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn interleaved_matches_planar() {
        let interleaved = [1.0f32, 0.0, 0.5, 0.5, -1.0, -0.5];
        let mut out = [0.0f32; 3];

        let peak = downmix_interleaved(&interleaved, 2, &mut out);

        assert_eq!(out, [0.5, 0.5, -0.75]);
        assert_eq!(peak, 0.75);
    }
}
