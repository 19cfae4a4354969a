//! Benchmarks for a complete session block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use onset_midi::{DetectorParams, NoteBuffer, SchedulerParams, TriggerEngine};

use crate::{drum_loop, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages/engine");
    let detector = DetectorParams::default();
    let scheduler = SchedulerParams::default();

    for &size in BLOCK_SIZES {
        // One second of material, walked block by block
        let signal = drum_loop(SAMPLE_RATE as usize);
        let blocks: Vec<&[f32]> = signal.chunks_exact(size).collect();
        let mut engine = TriggerEngine::new(SAMPLE_RATE);
        let mut out = NoteBuffer::new();
        let mut index = 0;

        group.bench_with_input(BenchmarkId::new("drum_loop", size), &size, |b, _| {
            b.iter(|| {
                let block = blocks[index % blocks.len()];
                index += 1;
                engine.process(black_box(block), black_box(&detector), black_box(&scheduler), &mut out);
            })
        });
    }

    group.finish();
}
