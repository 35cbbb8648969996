//! Host-facing engine: init, render, shutdown.
//!
//! The engine owns the voice pool and the receiving end of the message queue.
//! Everything that mutates the pool happens inside [`SynthEngine::render`], on
//! the audio thread, so the pool itself needs no locking.

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

#[cfg(feature = "rtrb")]
use crate::synth::message::{queue, NoteSender};
use crate::{
    config::{effective_note, SynthConfig},
    synth::{
        message::{MessageReceiver, SynthMessage},
        pool::VoicePool,
        render,
    },
    SynthError, SynthResult,
};

pub struct SynthEngine<R: MessageReceiver> {
    pool: VoicePool,
    rx: R,
    sample_rate: f32,
    transpose: i32,
    octave: i32,
    running: bool,
}

impl<R: MessageReceiver> SynthEngine<R> {
    /// Validate the configuration and build every voice up front.
    pub fn init(sample_rate: f32, config: SynthConfig, rx: R) -> SynthResult<Self> {
        check_sample_rate(sample_rate)?;
        config.validate()?;

        log::debug!("engine config: {config:?}");

        let pool = VoicePool::new(
            config.polyphony,
            config.waveform,
            config.gain,
            config.noise_seed,
        );

        log::info!(
            "synth engine ready: {} voices, {} waveform, {} Hz",
            config.polyphony,
            config.waveform.name(),
            sample_rate
        );

        Ok(Self {
            pool,
            rx,
            sample_rate,
            transpose: config.transpose,
            octave: config.octave,
            running: true,
        })
    }

    /// Render one interleaved hardware buffer.
    ///
    /// Applies every queued message first, then zeroes `out` and mixes the
    /// active voices into it. After [`shutdown`](Self::shutdown) this only
    /// writes silence.
    pub fn render(&mut self, out: &mut [f32], frame_count: usize, channels: usize) {
        if !self.running {
            out.fill(0.0);
            return;
        }

        while let Some(msg) = self.rx.pop() {
            self.handle(msg);
        }

        render::render(&mut self.pool, out, frame_count, channels);
    }

    /// Apply one message to the pool immediately.
    ///
    /// `render` calls this for everything it drains. Hosts that already run
    /// their input on the audio thread can call it directly instead.
    pub fn handle(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn { note, velocity } => {
                let note = effective_note(note, self.transpose, self.octave);
                self.pool.note_on(note, velocity, self.sample_rate);
            }
            SynthMessage::NoteOff { note } => {
                let note = effective_note(note, self.transpose, self.octave);
                self.pool.note_off(note);
            }
            SynthMessage::AllNotesOff => self.pool.all_notes_off(),
            SynthMessage::SetTranspose(semitones) => self.transpose = semitones,
            SynthMessage::SetOctave(octaves) => self.octave = octaves,
        }
    }

    /// Silence every voice and stop rendering.
    ///
    /// Pending messages are discarded and all voices go back to the free
    /// stack. Calling it twice is harmless.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;

        let mut discarded = 0usize;
        while self.rx.pop().is_some() {
            discarded += 1;
        }
        self.pool.reset();

        log::info!("synth engine shut down ({discarded} pending messages discarded)");
    }

    /// Sample rate used for notes triggered from now on.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> SynthResult<()> {
        check_sample_rate(sample_rate)?;
        self.sample_rate = sample_rate;
        Ok(())
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn transpose(&self) -> i32 {
        self.transpose
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }
}

#[cfg(feature = "rtrb")]
impl SynthEngine<Consumer<SynthMessage>> {
    /// Build an engine together with a queue sized by `config.queue_capacity`.
    pub fn with_queue(sample_rate: f32, config: SynthConfig) -> SynthResult<(Self, NoteSender)> {
        config.validate()?;
        let (tx, rx) = queue(config.queue_capacity);
        let engine = Self::init(sample_rate, config, rx)?;
        Ok((engine, tx))
    }
}

fn check_sample_rate(rate: f32) -> SynthResult<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(SynthError::InvalidSampleRate { rate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Waveform;
    use std::collections::VecDeque;

    const SR: f32 = 48_000.0;

    /// In-memory receiver so tests can script exact message batches.
    #[derive(Default)]
    struct Script(VecDeque<SynthMessage>);

    impl MessageReceiver for Script {
        fn pop(&mut self) -> Option<SynthMessage> {
            self.0.pop_front()
        }
    }

    fn engine(config: SynthConfig) -> SynthEngine<Script> {
        SynthEngine::init(SR, config.with_noise_seed(5), Script::default()).unwrap()
    }

    fn on(note: i32) -> SynthMessage {
        SynthMessage::NoteOn {
            note,
            velocity: 1.0,
        }
    }

    fn off(note: i32) -> SynthMessage {
        SynthMessage::NoteOff { note }
    }

    #[test]
    fn init_rejects_bad_sample_rate() {
        for rate in [0.0, -44_100.0, f32::NAN, f32::INFINITY] {
            let result = SynthEngine::init(rate, SynthConfig::default(), Script::default());
            assert!(matches!(result, Err(SynthError::InvalidSampleRate { .. })));
        }
    }

    #[test]
    fn init_rejects_bad_config() {
        let result = SynthEngine::init(
            SR,
            SynthConfig::default().with_polyphony(0),
            Script::default(),
        );
        assert!(matches!(result, Err(SynthError::InvalidPolyphony { .. })));
    }

    #[test]
    fn render_drains_queue_before_sampling() {
        let mut e = engine(SynthConfig::default().with_waveform(Waveform::Square));
        e.rx.0.push_back(on(69));

        let mut buffer = vec![0.0f32; 32];
        e.render(&mut buffer, 16, 2);

        assert_eq!(e.pool().active_count(), 1);
        assert!(buffer.iter().all(|&s| (s - 1.0).abs() < 1e-6));
    }

    #[test]
    fn transpose_and_octave_shift_notes() {
        let mut e = engine(SynthConfig::default().with_transpose(2).with_octave(1));
        e.handle(on(60));
        assert!(e.pool().voice_for_note(74).is_some());
        assert!(e.pool().voice_for_note(60).is_none());

        e.handle(off(60));
        assert!(e.pool().notes().is_empty());
    }

    #[test]
    fn changing_transpose_mid_note_leaves_it_stuck() {
        let mut e = engine(SynthConfig::default());
        e.handle(on(60));
        e.handle(SynthMessage::SetTranspose(1));
        e.handle(off(60));

        // The off looked for 61; 60 keeps sounding
        assert!(e.pool().voice_for_note(60).is_some());
        assert_eq!(e.pool().sounding_notes().collect::<Vec<_>>(), vec![60]);
    }

    #[test]
    fn octave_message_applies_to_later_notes() {
        let mut e = engine(SynthConfig::default());
        e.handle(SynthMessage::SetOctave(-1));
        e.handle(on(60));
        assert_eq!(e.octave(), -1);
        assert!(e.pool().voice_for_note(48).is_some());
    }

    #[test]
    fn voice_pitch_locked_to_rate_at_trigger() {
        let mut e = engine(SynthConfig::default());
        e.handle(on(60));
        e.set_sample_rate(44_100.0).unwrap();
        e.handle(on(64));

        let first = e.pool().voice(e.pool().voice_for_note(60).unwrap()).unwrap();
        let second = e.pool().voice(e.pool().voice_for_note(64).unwrap()).unwrap();
        assert_eq!(first.sample_rate(), SR);
        assert_eq!(second.sample_rate(), 44_100.0);

        assert!(e.set_sample_rate(0.0).is_err());
        assert_eq!(e.sample_rate(), 44_100.0);
    }

    #[test]
    fn all_notes_off_reclaims_on_next_render() {
        let mut e = engine(SynthConfig::default().with_polyphony(4));
        for note in [60, 64, 67] {
            e.handle(on(note));
        }
        e.rx.0.push_back(SynthMessage::AllNotesOff);

        let mut buffer = vec![0.0f32; 64];
        e.render(&mut buffer, 64, 1);

        assert_eq!(e.pool().active_count(), 0);
        assert_eq!(e.pool().free_count(), 4);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn shutdown_silences_and_discards_pending() {
        let mut e = engine(SynthConfig::default().with_polyphony(4));
        e.handle(on(60));
        e.rx.0.push_back(on(64));

        e.shutdown();
        assert!(!e.is_running());
        assert_eq!(e.pool().free_count(), 4);
        assert!(e.rx.0.is_empty());

        let mut buffer = vec![0.5f32; 64];
        e.render(&mut buffer, 64, 1);
        assert!(buffer.iter().all(|&s| s == 0.0));

        e.shutdown();
        assert_eq!(e.pool().free_count(), 4);
    }
}
