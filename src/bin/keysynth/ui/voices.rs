//! Voice pool panel - sounding notes, pool usage and drop counters

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::UiStateUpdate;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Note number as a name with octave, e.g. 60 → "C4"
fn note_name(note: i32) -> String {
    let name = NOTE_NAMES[note.rem_euclid(12) as usize];
    let octave = note.div_euclid(12) - 1;
    format!("{name}{octave}")
}

pub fn render_voices(
    frame: &mut Frame,
    area: Rect,
    state: &UiStateUpdate,
    waveform: &str,
    queue_drops: u64,
) {
    let block = Block::default()
        .title(" keysynth ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let polyphony = state.active + state.free;
    let status = Line::from(vec![
        Span::styled(
            format!(" {waveform}  "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("Octave: {:+}  ", state.octave),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("Transpose: {:+}  ", state.transpose),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("Dropped: {} pool / {} queue", state.dropped_note_ons, queue_drops),
            Style::default().fg(if state.dropped_note_ons + queue_drops > 0 {
                Color::Red
            } else {
                Color::DarkGray
            }),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), rows[0]);

    let ratio = if polyphony == 0 {
        0.0
    } else {
        state.active as f64 / polyphony as f64
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!(
            "{} active / {} free of {}",
            state.active, state.free, polyphony
        ));
    frame.render_widget(gauge, rows[1]);

    let mut spans = vec![Span::raw(" ")];
    for &note in state.notes() {
        spans.push(Span::styled(
            format!("{:<4}", note_name(note)),
            Style::default().fg(Color::LightGreen),
        ));
    }
    if state.notes().is_empty() {
        spans.push(Span::styled("silent", Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[2]);
}
