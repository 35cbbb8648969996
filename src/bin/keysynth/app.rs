//! KeySynth - audio device setup and the audio callback

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, PushError, RingBuffer};

use keysynth::{synth::message::SynthMessage, SynthConfig, SynthEngine, MAX_BLOCK_SIZE};

use super::ui::{state::UiStateUpdate, UiApp, VIS_BUFFER_SIZE};

/// Capacity in visualization blocks for the audio → UI sample ring
const AUDIO_RING_BLOCKS: usize = 8;
/// Voice snapshots buffered for the UI
const STATE_RING_LEN: usize = 16;

pub struct KeySynth {
    config: SynthConfig,
}

impl KeySynth {
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    /// Open the default output device and run the UI until the user quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = stream_config.sample_rate().0 as f32;
        let channels = stream_config.channels() as usize;

        let (engine, notes) = SynthEngine::with_queue(sample_rate, self.config.clone())
            .wrap_err("failed to initialise synth engine")?;

        log::info!(
            "output device: {} ({} Hz, {} channels)",
            device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate,
            channels
        );

        let (audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * AUDIO_RING_BLOCKS);
        let (state_tx, state_rx) = RingBuffer::<UiStateUpdate>::new(STATE_RING_LEN);

        let mut callback = AudioCallback {
            engine,
            channels,
            audio_tx,
            state_tx,
        };

        let stream = device
            .build_output_stream(
                &stream_config.into(),
                move |data: &mut [f32], _| callback.process(data),
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        let mut terminal = ratatui::init();
        let mut ui = UiApp::new(notes, audio_rx, state_rx, sample_rate, &self.config);
        let res = ui.run(&mut terminal);
        ratatui::restore();

        // Dropping the stream stops the callback; the engine goes with it
        drop(stream);
        log::info!("stream closed");
        res
    }
}

/// State moved into the audio callback.
struct AudioCallback {
    engine: SynthEngine<Consumer<SynthMessage>>,
    channels: usize,
    audio_tx: Producer<f32>,
    state_tx: Producer<UiStateUpdate>,
}

impl AudioCallback {
    fn process(&mut self, data: &mut [f32]) {
        if self.channels == 0 {
            return;
        }

        // Render in bounded chunks so each engine call sees a predictable size
        let chunk_len = MAX_BLOCK_SIZE * self.channels;
        for chunk in data.chunks_mut(chunk_len) {
            let frames = chunk.len() / self.channels;
            self.engine.render(chunk, frames, self.channels);

            // First channel to the scope, drop on overflow
            for frame in chunk.chunks_exact(self.channels) {
                if let Err(PushError::Full(_)) = self.audio_tx.push(frame[0]) {
                    break;
                }
            }
        }

        let _ = self.state_tx.push(UiStateUpdate::from_engine(&self.engine));
    }
}

impl Drop for AudioCallback {
    fn drop(&mut self) {
        self.engine.shutdown();
    }
}
