//! Meter widget - input level gauge, envelope vs threshold, trigger LED

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use onset_midi::control::Meter;

pub fn render_meter(frame: &mut Frame, area: Rect, meter: &Meter, lit: bool, running: bool) {
    let block = Block::default().title(" onset_midi ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let level = gauge_ratio(meter.level());
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(level)
        .label(format!("Input {:.2}", level));
    frame.render_widget(gauge, rows[0]);

    let envelope = meter.envelope();
    let threshold = meter.threshold();
    let above = envelope >= threshold;
    let detector = Line::from(vec![
        Span::styled(
            format!(" Envelope: {:.4}  ", envelope),
            Style::default().fg(if above { Color::Yellow } else { Color::White }),
        ),
        Span::styled(
            format!("Threshold: {:.4}", threshold),
            Style::default().fg(Color::Cyan),
        ),
    ]);
    frame.render_widget(Paragraph::new(detector), rows[1]);

    let status = Line::from(vec![
        Span::styled(
            " ● Trigger  ",
            Style::default().fg(if lit { Color::LightGreen } else { Color::Red }),
        ),
        Span::styled(
            if running { "▶ Running" } else { "⏸ Stopped" },
            Style::default().fg(if running { Color::Green } else { Color::Yellow }),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), rows[2]);
}

/// Gauge fill for a peak level. `Gauge::ratio` panics outside [0, 1], so
/// non-finite levels read as empty.
fn gauge_ratio(level: f32) -> f64 {
    if level.is_finite() {
        level.clamp(0.0, 1.0) as f64
    } else {
        0.0
    }
}
