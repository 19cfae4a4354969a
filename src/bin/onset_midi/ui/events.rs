//! Event log widget - most recent note events, newest first

use std::collections::VecDeque;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use onset_midi::{MidiEvent, TimedNote};

pub fn render_events(frame: &mut Frame, area: Rect, history: &VecDeque<TimedNote>, sample_rate: f64) {
    let block = Block::default().title(" Note events ").borders(Borders::ALL);

    let lines: Vec<Line> = history
        .iter()
        .map(|note| {
            let (label, color, detail) = match note.event {
                MidiEvent::NoteOn {
                    channel,
                    key,
                    velocity,
                } => ("ON ", Color::Green, format!("ch {:>2}  key {:>3}  vel {:>3}", channel, key, velocity)),
                MidiEvent::NoteOff { channel, key } => {
                    ("OFF", Color::DarkGray, format!("ch {:>2}  key {:>3}", channel, key))
                }
            };
            let bytes = note.event.to_bytes();

            Line::from(vec![
                Span::styled(format!(" {} ", label), Style::default().fg(color)),
                Span::raw(format!(
                    "{:>12.1} ms  frame {:>10}  ",
                    note.frame as f64 * 1000.0 / sample_rate,
                    note.frame
                )),
                Span::raw(detail),
                Span::styled(
                    format!("  [{:02X} {:02X} {:02X}]", bytes[0], bytes[1], bytes[2]),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
