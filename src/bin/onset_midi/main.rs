//! onset_midi - live onset-to-MIDI monitor
//!
//! Listens to the default input device, detects onsets and shows the note
//! events they would produce.
//!
//! Run with: cargo run --release

mod app;
mod ui;

use app::Monitor;
use onset_midi::{DetectorParams, SchedulerParams};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    Monitor::new()
        .detector(DetectorParams::default())
        .scheduler(SchedulerParams::default())
        .run()
}
