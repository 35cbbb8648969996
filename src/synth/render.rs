//! The per-buffer render pass over a voice pool.

use crate::synth::pool::VoicePool;

/// Mix every active voice into `out` and reclaim voices that have gone idle.
///
/// `out` is interleaved with `channels` samples per frame. At most
/// `frame_count` frames are rendered; the whole buffer is zeroed first either
/// way. The active list is walked from the back so removing the current entry
/// never skips or revisits another one. Nothing here allocates.
pub fn render(pool: &mut VoicePool, out: &mut [f32], frame_count: usize, channels: usize) {
    out.fill(0.0);

    let len = frame_count.saturating_mul(channels).min(out.len());
    let block = &mut out[..len];

    let mut i = pool.active.len();
    while i > 0 {
        i -= 1;
        let idx = pool.active[i];
        let voice = &mut pool.voices[idx];

        voice.render(block, channels);

        if !voice.is_active() {
            voice.reclaim();
            // `remove` keeps trigger order for the entries already visited
            pool.active.remove(i);
            pool.free.push(idx);
        }
    }
}
