//! Spectrum analyzer widget
//!
//! FFT of the output with log-spaced bins, plus a marker at the fundamental of
//! every sounding note.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use keysynth::dsp::note_to_freq;

/// Number of frequency bins to display
const SPECTRUM_BINS: usize = 48;
/// Lowest frequency shown
const MIN_FREQ: f32 = 20.0;
/// Floor of the magnitude axis
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// FFT bin index for each displayed point
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 frequency, magnitude dB)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size and must match the buffers passed to `update`.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        // Hann window - reduces spectral leakage
        let denom = buffer_len.saturating_sub(1).max(1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let max_freq = (sample_rate / 2.0).min(20_000.0).max(MIN_FREQ + 1.0);
        let ratio = (max_freq / MIN_FREQ) as f64;
        let half = (buffer_len / 2).max(1);

        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = MIN_FREQ as f64 * ratio.powf(t);
            let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
            bin_indices.push(index.min(half - 1));
            spectrum.push((freq.log10(), FLOOR_DB));
        }

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    /// Recompute from the latest output; ignored if the length doesn't match.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }

        self.fft.process(&mut self.scratch);

        for (point, &idx) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            let bin = self.scratch[idx];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12);
            point.1 = (10.0 * (power as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the spectrum with a vertical marker per sounding note
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)], notes: &[i32]) {
    let block = Block::default()
        .title(" Spectrum ")
        .borders(Borders::ALL);

    let min_x = spectrum.first().map_or(0.0, |p| p.0);
    let max_x = spectrum.last().map_or(1.0, |p| p.0).max(min_x + 1.0);
    let max_db = spectrum.iter().map(|p| p.1).fold(FLOOR_DB, f64::max);
    let top = max_db.max(0.0) + 10.0;

    let markers: Vec<[(f64, f64); 2]> = notes
        .iter()
        .map(|&note| note_to_freq(note) as f64)
        .filter(|f| *f > 0.0)
        .map(|f| f.log10())
        .filter(|x| (min_x..=max_x).contains(x))
        .map(|x| [(x, FLOOR_DB), (x, top)])
        .collect();

    let mut datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum)];
    datasets.extend(markers.iter().map(|line| {
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(line)
    }));

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, top])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
