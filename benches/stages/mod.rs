//! Benchmarks for each pipeline stage.

mod detector;
mod engine;
mod scheduler;

pub use detector::bench_detector;
pub use engine::bench_engine;
pub use scheduler::bench_scheduler;
