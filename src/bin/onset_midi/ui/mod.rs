//! TUI module for onset_midi
//!
//! Shows input level, detector state, parameters and recent note events.

mod controls;
mod events;
mod meter;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use onset_midi::{
    control::{Meter, SharedParams},
    TimedNote,
};

use controls::{render_controls, Control};
use events::render_events;
use meter::render_meter;

/// Note events kept for display
const EVENT_HISTORY: usize = 32;
/// UI frames the trigger LED stays lit after a flash
const LED_FRAMES: u8 = 5;

/// State shared with the audio thread (atomics only)
pub struct UiShared {
    pub params: SharedParams,
    pub meter: Meter,
    pub running: AtomicBool,
}

/// UI application state
pub struct UiApp {
    shared: Arc<UiShared>,
    events_rx: Consumer<TimedNote>,
    history: VecDeque<TimedNote>,
    sample_rate: f64,
    selected: usize,
    led_frames: u8,
    should_quit: bool,
}

impl UiApp {
    pub fn new(shared: Arc<UiShared>, events_rx: Consumer<TimedNote>, sample_rate: f64) -> Self {
        Self {
            shared,
            events_rx,
            history: VecDeque::with_capacity(EVENT_HISTORY),
            sample_rate,
            selected: 0,
            led_frames: 0,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_events();
            self.tick_led();

            terminal.draw(|frame| self.render(frame))?;

            // ~30 fps
            if event::poll(Duration::from_millis(33))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Drain the note event queue, keeping the most recent events
    fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.pop() {
            if self.history.len() == EVENT_HISTORY {
                self.history.pop_back();
            }
            self.history.push_front(event);
        }
    }

    fn tick_led(&mut self) {
        if self.shared.meter.consume_trigger_flash() {
            self.led_frames = LED_FRAMES;
        }
        self.led_frames = self.led_frames.saturating_sub(1);
    }

    fn handle_key(&mut self, key: KeyCode) {
        let params = &self.shared.params;
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                let running = self.shared.running.load(Ordering::Relaxed);
                self.shared.running.store(!running, Ordering::Relaxed);
            }
            KeyCode::Up => {
                self.selected = self.selected.checked_sub(1).unwrap_or(Control::ALL.len() - 1);
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % Control::ALL.len();
            }
            KeyCode::Left => Control::ALL[self.selected].adjust(params, -1),
            KeyCode::Right => Control::ALL[self.selected].adjust(params, 1),
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),  // Meters
                Constraint::Length(10), // Parameters
                Constraint::Min(4),     // Event log
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let running = self.shared.running.load(Ordering::Relaxed);
        render_meter(frame, chunks[0], &self.shared.meter, self.led_frames > 0, running);
        render_controls(frame, chunks[1], &self.shared.params, self.selected);
        render_events(frame, chunks[2], &self.history, self.sample_rate);

        let help = Paragraph::new(" [Q] Quit  [Space] Start/Stop  [↑↓] Select  [←→] Adjust")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
