//! Benchmarks for the note scheduler.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use onset_midi::{NoteBuffer, NoteScheduler, SchedulerParams, TriggerEvent, MAX_TRIGGERS_PER_BLOCK};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages/scheduler");
    let params = SchedulerParams::default();

    for &size in BLOCK_SIZES {
        let mut out = NoteBuffer::new();

        // Quiet block: only the pending pool scan
        let no_triggers: [TriggerEvent; 0] = [];
        let mut scheduler = NoteScheduler::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                scheduler.process(black_box(&no_triggers[..]), size, black_box(&params), &mut out);
            })
        });

        // Worst case: a full trigger buffer every block
        let triggers: Vec<TriggerEvent> = (0..MAX_TRIGGERS_PER_BLOCK)
            .map(|i| TriggerEvent {
                sample_offset: i * size / MAX_TRIGGERS_PER_BLOCK,
                strength: 0.5,
            })
            .collect();
        let mut scheduler = NoteScheduler::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("full_burst", size), &size, |b, _| {
            b.iter(|| {
                scheduler.process(black_box(&triggers), size, black_box(&params), &mut out);
            })
        });
    }

    group.finish();
}
