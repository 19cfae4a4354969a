//! Offline run: synthesize a stereo kick pattern, downmix it, and print the
//! note events the engine produces.
//!
//! Run with: cargo run --example offline_clicks

use onset_midi::{
    io::downmix, DetectorParams, MidiEvent, NoteBuffer, SchedulerParams, TriggerEngine,
    VelocityMode,
};

const SAMPLE_RATE: f64 = 48_000.0;
const BLOCK: usize = 480;

/// Sine kick with a pitch drop, every `period` samples, getting quieter.
fn kick_pattern(len: usize, period: usize) -> Vec<f32> {
    (0..len)
        .map(|n| {
            let hit = n / period;
            let t = (n % period) as f32 / SAMPLE_RATE as f32;
            let gain = 1.0 / (1.0 + hit as f32 * 0.5);
            let freq = 50.0 + 100.0 * (-t * 30.0).exp();
            gain * (-t * 12.0).exp() * (t * freq * std::f32::consts::TAU).sin()
        })
        .collect()
}

fn main() {
    // Two seconds, a kick every 500 ms (120 BPM quarter notes)
    let left = kick_pattern(96_000, 24_000);
    let right: Vec<f32> = left.iter().map(|s| s * 0.8).collect();

    let detector = DetectorParams::default();
    let scheduler = SchedulerParams {
        velocity_mode: VelocityMode::Dynamic,
        ..Default::default()
    };

    let mut engine = TriggerEngine::new(SAMPLE_RATE);
    let mut mono = vec![0.0f32; BLOCK];
    let mut out = NoteBuffer::new();

    for (block, (l, r)) in left.chunks(BLOCK).zip(right.chunks(BLOCK)).enumerate() {
        let mono = &mut mono[..l.len()];
        downmix(&[l, r], mono);

        engine.process(mono, &detector, &scheduler, &mut out);
        out.sort_by_offset();

        for note in &out {
            let at_ms = (block * BLOCK + note.offset) as f64 * 1000.0 / SAMPLE_RATE;
            match note.event {
                MidiEvent::NoteOn { key, velocity, .. } => {
                    println!("{:>8.2} ms  note on  {} vel {}", at_ms, key, velocity)
                }
                MidiEvent::NoteOff { key, .. } => println!("{:>8.2} ms  note off {}", at_ms, key),
            }
        }
    }
}
