//! Benchmarks for the onset detector.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use onset_midi::{DetectorParams, OnsetDetector, TriggerBuffer};

use crate::{drum_loop, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages/detector");

    for &size in BLOCK_SIZES {
        let signal = drum_loop(size);
        let mut out = TriggerBuffer::new();

        let broadband = DetectorParams {
            focus_low: false,
            ..Default::default()
        };
        let mut detector = OnsetDetector::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("broadband", size), &size, |b, _| {
            b.iter(|| {
                detector.process_block(black_box(&signal), black_box(&broadband), &mut out);
            })
        });

        // Low focus adds the 180 Hz one-pole per sample
        let low = DetectorParams::default();
        let mut detector = OnsetDetector::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("focus_low", size), &size, |b, _| {
            b.iter(|| {
                detector.process_block(black_box(&signal), black_box(&low), &mut out);
            })
        });
    }

    group.finish();
}
