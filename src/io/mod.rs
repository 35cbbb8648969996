// Purpose - note sources feeding the engine

pub mod keyboard;
pub mod midi;
