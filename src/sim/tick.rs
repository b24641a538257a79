//! Per-frame update
//!
//! The render driver calls [`tick`] once per animation frame, then reads the
//! mutated buffers. Everything runs synchronously on the calling thread.

use super::assembly::EngineAssembly;
use super::status::AlertMap;
use crate::consts::MAX_FRAME_DELTA;

/// What the render driver supplies each frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub delta: f32,
    /// Seconds since the animation clock started
    pub elapsed: f32,
    /// False freezes the scene: nothing is advanced
    pub playing: bool,
}

impl FrameInput {
    /// Frame input from raw driver timings. Negative or non-finite deltas
    /// become 0 and long stalls are clamped to `MAX_FRAME_DELTA`.
    pub fn new(delta: f32, elapsed: f32, playing: bool) -> Self {
        let delta = if delta.is_finite() {
            delta.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };
        Self {
            delta,
            elapsed,
            playing,
        }
    }
}

/// Advance the scene by one frame.
///
/// Alerts are forwarded to the stages first, so a frame always renders with
/// the status that was current when it started. The play flag is read once:
/// when it is false neither the airflow nor any stage rotation moves.
pub fn tick(engine: &mut EngineAssembly, input: &FrameInput, alerts: &AlertMap) {
    let playing = input.playing;

    engine.apply_alerts(alerts);
    engine.set_combustor_lit(playing);

    if !playing {
        return;
    }
    engine.advance(input);
}
