//! TUI module for keysynth
//!
//! Reads the computer keyboard, feeds the engine's message queue, and shows
//! the voice pool alongside a scope and spectrum of the output.

pub mod state;
mod spectrum;
mod voices;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::{io::stdout, time::Duration};

use keysynth::{io::keyboard::KeyboardInput, synth::message::NoteSender, SynthConfig};

use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::UiStateUpdate;
use voices::render_voices;
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Octave offset limits for the arrow keys
const OCTAVE_RANGE: std::ops::RangeInclusive<i32> = -4..=4;
/// Transpose limits for the arrow keys
const TRANSPOSE_RANGE: std::ops::RangeInclusive<i32> = -12..=12;

/// UI application state
pub struct UiApp {
    /// Sending half of the engine's message queue
    notes: NoteSender,
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    /// Ring buffer receiver for voice pool snapshots
    state_rx: Consumer<UiStateUpdate>,
    /// Latest pool snapshot
    current_state: UiStateUpdate,
    /// Audio sample buffer for visualization
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    keys: KeyboardInput,
    /// Whether the terminal reports key releases
    key_release: bool,
    transpose: i32,
    octave: i32,
    waveform_name: &'static str,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        notes: NoteSender,
        audio_rx: Consumer<f32>,
        state_rx: Consumer<UiStateUpdate>,
        sample_rate: f32,
        config: &SynthConfig,
    ) -> Self {
        Self {
            notes,
            audio_rx,
            state_rx,
            current_state: UiStateUpdate::new(config.polyphony),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            keys: KeyboardInput::new(),
            key_release: false,
            transpose: config.transpose,
            octave: config.octave,
            waveform_name: config.waveform.name(),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        self.key_release = supports_keyboard_enhancement().unwrap_or(false);
        if self.key_release {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            log::warn!("terminal does not report key releases, keys toggle notes instead");
        }

        let res = self.event_loop(terminal);

        if self.key_release {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        self.notes.all_notes_off();
        res
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_state();

            terminal.draw(|frame| self.render(frame))?;

            // Drain every pending key before the next frame (~60fps)
            if event::poll(Duration::from_millis(16))? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        self.handle_key(key);
                    }
                }
            }

            if self.notes.is_abandoned() {
                log::error!("audio stream stopped");
                self.should_quit = true;
            }
        }

        Ok(())
    }

    /// Poll for new audio samples from ring buffer
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }

        if received {
            // Keep only the last VIS_BUFFER_SIZE
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
            self.spectrum.update(&self.audio_buffer);
        }
    }

    /// Keep only the latest pool snapshot
    fn poll_state(&mut self) {
        while let Ok(state) = self.state_rx.pop() {
            self.current_state = state;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.kind) {
            (KeyCode::Esc, KeyEventKind::Press) | (KeyCode::Char('q'), KeyEventKind::Press) => {
                self.should_quit = true;
            }
            (KeyCode::Char(' '), KeyEventKind::Press) => {
                self.notes.all_notes_off();
                self.keys.clear();
            }
            (KeyCode::Left, KeyEventKind::Press) => self.shift_octave(-1),
            (KeyCode::Right, KeyEventKind::Press) => self.shift_octave(1),
            (KeyCode::Up, KeyEventKind::Press) => self.shift_transpose(1),
            (KeyCode::Down, KeyEventKind::Press) => self.shift_transpose(-1),
            (KeyCode::Char(c), KeyEventKind::Press) if self.key_release => {
                self.keys.press(c, &mut self.notes);
            }
            (KeyCode::Char(c), KeyEventKind::Release) => {
                self.keys.release(c, &mut self.notes);
            }
            (KeyCode::Char(c), KeyEventKind::Press) => {
                self.keys.toggle(c, &mut self.notes);
            }
            _ => {}
        }
    }

    // Held notes keep their shifted number; releasing them after a shift
    // misses the voice, so the engine's all-notes-off is the way out.
    fn shift_octave(&mut self, delta: i32) {
        let octave = (self.octave + delta).clamp(*OCTAVE_RANGE.start(), *OCTAVE_RANGE.end());
        if octave != self.octave && self.notes.set_octave(octave) {
            self.octave = octave;
        }
    }

    fn shift_transpose(&mut self, delta: i32) {
        let transpose =
            (self.transpose + delta).clamp(*TRANSPOSE_RANGE.start(), *TRANSPOSE_RANGE.end());
        if transpose != self.transpose && self.notes.set_transpose(transpose) {
            self.transpose = transpose;
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: voices, waveform + spectrum, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // Voice pool
                Constraint::Min(8),    // Scope and spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_voices(
            frame,
            chunks[0],
            &self.current_state,
            self.waveform_name,
            self.notes.dropped(),
        );

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        render_waveform(frame, scopes[0], &self.audio_buffer);
        render_spectrum(frame, scopes[1], self.spectrum.data(), self.current_state.notes());

        let help = Paragraph::new(
            " [A W S E D F T G Z H U J K] Play  [←/→] Octave  [↑/↓] Transpose  [Space] All off  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}
