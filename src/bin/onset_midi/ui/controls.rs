//! Parameter panel - one row per control, the selected row highlighted

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use onset_midi::{control::SharedParams, VelocityMode};

/// Adjustable parameters, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Sensitivity,
    MinGap,
    Note,
    Channel,
    NoteLength,
    VelocityMode,
    FixedVelocity,
    FocusLow,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Control::Sensitivity,
        Control::MinGap,
        Control::Note,
        Control::Channel,
        Control::NoteLength,
        Control::VelocityMode,
        Control::FixedVelocity,
        Control::FocusLow,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Control::Sensitivity => "Sensitivity",
            Control::MinGap => "Min gap",
            Control::Note => "Note",
            Control::Channel => "MIDI channel",
            Control::NoteLength => "Note length",
            Control::VelocityMode => "Velocity mode",
            Control::FixedVelocity => "Fixed velocity",
            Control::FocusLow => "Focus low",
        }
    }

    pub fn value_text(self, params: &SharedParams) -> String {
        match self {
            Control::Sensitivity => format!("{:.0}", params.sensitivity()),
            Control::MinGap => format!("{:.0} ms", params.min_gap_ms()),
            Control::Note => params.note().to_string(),
            Control::Channel => params.channel().to_string(),
            Control::NoteLength => format!("{:.0} ms", params.note_length_ms()),
            Control::VelocityMode => match params.velocity_mode() {
                VelocityMode::Fixed => "Fixed".to_string(),
                VelocityMode::Dynamic => "Dynamic".to_string(),
            },
            Control::FixedVelocity => params.fixed_velocity().to_string(),
            Control::FocusLow => String::from(if params.focus_low() { "On" } else { "Off" }),
        }
    }

    /// Step the parameter up (`direction > 0`) or down within its UI range.
    pub fn adjust(self, params: &SharedParams, direction: i32) {
        let step = direction.signum();
        match self {
            Control::Sensitivity => {
                params.set_sensitivity((params.sensitivity() + step as f32).clamp(0.0, 100.0))
            }
            Control::MinGap => {
                params.set_min_gap_ms((params.min_gap_ms() + 5.0 * step as f32).clamp(50.0, 300.0))
            }
            Control::Note => params.set_note(step_u8(params.note(), step, 0, 127)),
            Control::Channel => params.set_channel(step_u8(params.channel(), step, 1, 16)),
            Control::NoteLength => params
                .set_note_length_ms((params.note_length_ms() + 5.0 * step as f32).clamp(10.0, 120.0)),
            Control::VelocityMode => params.set_velocity_mode(match params.velocity_mode() {
                VelocityMode::Fixed => VelocityMode::Dynamic,
                VelocityMode::Dynamic => VelocityMode::Fixed,
            }),
            Control::FixedVelocity => {
                params.set_fixed_velocity(step_u8(params.fixed_velocity(), step, 0, 127))
            }
            Control::FocusLow => params.set_focus_low(!params.focus_low()),
        }
    }
}

fn step_u8(value: u8, step: i32, min: u8, max: u8) -> u8 {
    (value as i32 + step).clamp(min as i32, max as i32) as u8
}

pub fn render_controls(frame: &mut Frame, area: Rect, params: &SharedParams, selected: usize) {
    let block = Block::default().title(" Parameters ").borders(Borders::ALL);

    let lines: Vec<Line> = Control::ALL
        .iter()
        .enumerate()
        .map(|(i, control)| {
            let style = if i == selected {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!(" {:<16}", control.label()), style),
                Span::styled(format!(" {:>10} ", control.value_text(params)), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustments_stay_in_ui_range() {
        let params = SharedParams::new();
        params.set_channel(16);
        Control::Channel.adjust(&params, 1);
        assert_eq!(params.channel(), 16);

        params.set_min_gap_ms(50.0);
        Control::MinGap.adjust(&params, -1);
        assert_eq!(params.min_gap_ms(), 50.0);
        Control::MinGap.adjust(&params, 1);
        assert_eq!(params.min_gap_ms(), 55.0);
    }

    #[test]
    fn toggles_flip() {
        let params = SharedParams::new();
        Control::VelocityMode.adjust(&params, 1);
        assert_eq!(params.velocity_mode(), VelocityMode::Dynamic);
        Control::FocusLow.adjust(&params, -1);
        assert!(!params.focus_low());
    }
}
