//! UI sound playback contracts and no-op adapter.

use std::{cell::RefCell, rc::Rc};

/// Host service that plays a short, named UI sound at a given gain.
///
/// `gain` is normalized to `0.0..=1.0`. Implementations must not block and must swallow
/// playback failures (autoplay policies, missing assets).
pub trait SoundSink {
    /// Starts playback of the sound identified by `cue_token`.
    fn play(&self, cue_token: &'static str, gain: f32);
}

#[derive(Debug, Clone, Copy, Default)]
/// Sound sink for unsupported targets and headless sessions.
pub struct NoopSoundSink;

impl SoundSink for NoopSoundSink {
    fn play(&self, _cue_token: &'static str, _gain: f32) {}
}

#[derive(Debug, Clone, Default)]
/// Sound sink that records every request instead of playing it.
pub struct RecordingSoundSink {
    played: Rc<RefCell<Vec<(&'static str, f32)>>>,
}

impl RecordingSoundSink {
    /// Returns the recorded `(cue, gain)` pairs in playback order.
    pub fn played(&self) -> Vec<(&'static str, f32)> {
        self.played.borrow().clone()
    }
}

impl SoundSink for RecordingSoundSink {
    fn play(&self, cue_token: &'static str, gain: f32) {
        self.played.borrow_mut().push((cue_token, gain));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order_and_shares_between_clones() {
        let sink = RecordingSoundSink::default();
        let handle = sink.clone();
        let dyn_sink: &dyn SoundSink = &sink;

        dyn_sink.play("open", 0.5);
        dyn_sink.play("close", 1.0);

        assert_eq!(handle.played(), vec![("open", 0.5), ("close", 1.0)]);
    }
}
