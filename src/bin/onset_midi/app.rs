//! Monitor - input stream setup and the audio callback

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use onset_midi::{
    control::{Meter, SharedParams},
    engine::BlockReport,
    io::downmix_interleaved,
    DetectorParams, NoteBuffer, SchedulerParams, TimedNote, TriggerEngine, MAX_BLOCK_SIZE,
};

use super::ui::{UiApp, UiShared};

/// Note events buffered between the audio thread and the UI.
const EVENT_QUEUE_SIZE: usize = 1024;

/// Live monitor builder
pub struct Monitor {
    detector: DetectorParams,
    scheduler: SchedulerParams,
}

impl Monitor {
    pub fn new() -> Self {
        Self {
            detector: DetectorParams::default(),
            scheduler: SchedulerParams::default(),
        }
    }

    /// Initial detector settings
    pub fn detector(mut self, params: DetectorParams) -> Self {
        self.detector = params;
        self
    }

    /// Initial note settings
    pub fn scheduler(mut self, params: SchedulerParams) -> Self {
        self.scheduler = params;
        self
    }

    /// Open the input device, start the stream and hand the terminal to the UI
    /// until the user quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| eyre!("no default input device available"))?;
        let config = device
            .default_input_config()
            .wrap_err("failed to fetch default input config")?;

        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(eyre!(
                "unsupported input sample format {:?}, expected f32",
                config.sample_format()
            ));
        }

        let sample_rate = config.sample_rate().0 as f64;
        let channels = config.channels() as usize;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        println!("=== onset_midi ===");
        println!("Input: {}", device_name);
        println!("Sample rate: {} Hz", sample_rate);
        println!("Channels: {}", channels);
        println!();

        let shared = Arc::new(UiShared {
            params: SharedParams::from_params(&self.detector, &self.scheduler),
            meter: Meter::new(),
            running: AtomicBool::new(true),
        });

        let (mut event_tx, event_rx) = RingBuffer::<TimedNote>::new(EVENT_QUEUE_SIZE);

        let mut engine = TriggerEngine::new(sample_rate);
        engine.prepare(sample_rate);

        // Everything the callback touches is allocated here, up front.
        let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut notes = NoteBuffer::new();
        let mut frame_position = 0u64;
        let mut was_running = true;
        let audio_shared = Arc::clone(&shared);

        let stream = device.build_input_stream(
            &config.into(),
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let channels = channels.max(1);

                for chunk in data.chunks(MAX_BLOCK_SIZE * channels) {
                    let frames = chunk.len() / channels;
                    let block = &mut mono[..frames];
                    let peak = downmix_interleaved(chunk, channels, block);

                    let running = audio_shared.running.load(Ordering::Relaxed);
                    let report = if running {
                        let detector = audio_shared.params.detector();
                        let scheduler = audio_shared.params.scheduler();
                        engine.process(block, &detector, &scheduler, &mut notes)
                    } else {
                        if was_running {
                            // Stopping: release whatever is still sounding
                            engine.flush(&mut notes);
                        } else {
                            notes.clear();
                        }
                        BlockReport::default()
                    };
                    was_running = running;

                    notes.sort_by_offset();
                    // A full queue just means the UI is behind; drop.
                    notes.forward(frame_position, &mut event_tx);

                    audio_shared.meter.publish(peak, &report);
                    frame_position += frames as u64;
                }
            },
            |err| eprintln!("Audio error: {}", err),
            None,
        )?;

        stream.play().wrap_err("failed to start input stream")?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(shared, event_rx, sample_rate).run(&mut terminal);
        ratatui::restore();

        drop(stream);
        result
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}
