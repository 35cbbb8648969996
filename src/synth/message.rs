#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, PushError, RingBuffer};

/// Events sent from the input side to the render side.
///
/// Note numbers are raw: transpose and octave are applied by the engine when
/// it drains the queue.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: i32, velocity: f32 },
    NoteOff { note: i32 },
    AllNotesOff,
    /// Replace the semitone offset for notes handled after this message.
    SetTranspose(i32),
    /// Replace the octave offset for notes handled after this message.
    SetOctave(i32),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

/// The two calls a note source (keyboard, sequencer, MIDI input) makes.
pub trait NoteHandler {
    fn note_on(&mut self, note: i32, velocity: f32);
    fn note_off(&mut self, note: i32);
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Bounded, lock-free message queue between the input and render threads.
///
/// Returns the sending half and the receiving half for
/// [`SynthEngine::init`](crate::SynthEngine::init).
#[cfg(feature = "rtrb")]
pub fn queue(capacity: usize) -> (NoteSender, Consumer<SynthMessage>) {
    let (tx, rx) = RingBuffer::<SynthMessage>::new(capacity);
    (NoteSender::new(tx), rx)
}

/// Producer side of the message queue.
///
/// When the queue is full the newest message is dropped and counted; nothing
/// already queued is reordered or overwritten.
#[cfg(feature = "rtrb")]
pub struct NoteSender {
    tx: Producer<SynthMessage>,
    dropped: u64,
}

#[cfg(feature = "rtrb")]
impl NoteSender {
    pub fn new(tx: Producer<SynthMessage>) -> Self {
        Self { tx, dropped: 0 }
    }

    /// Queue a message. Returns `false` if it was dropped because the queue is full.
    pub fn send(&mut self, msg: SynthMessage) -> bool {
        match self.tx.push(msg) {
            Ok(()) => true,
            Err(PushError::Full(dropped)) => {
                self.dropped += 1;
                log::debug!("message queue full, dropped {dropped:?}");
                false
            }
        }
    }

    pub fn all_notes_off(&mut self) -> bool {
        self.send(SynthMessage::AllNotesOff)
    }

    pub fn set_transpose(&mut self, semitones: i32) -> bool {
        self.send(SynthMessage::SetTranspose(semitones))
    }

    pub fn set_octave(&mut self, octaves: i32) -> bool {
        self.send(SynthMessage::SetOctave(octaves))
    }

    /// Messages dropped on a full queue since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// True once the engine's receiving half has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_abandoned()
    }
}

#[cfg(feature = "rtrb")]
impl NoteHandler for NoteSender {
    fn note_on(&mut self, note: i32, velocity: f32) {
        self.send(SynthMessage::NoteOn { note, velocity });
    }

    fn note_off(&mut self, note: i32) {
        self.send(SynthMessage::NoteOff { note });
    }
}
