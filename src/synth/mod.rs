// Purpose: Voice management, polyphony, note events
// This layer sits above the DSP primitives and owns every voice

pub mod engine;
pub mod message;
pub mod pool;
pub mod render;
pub mod voice;
