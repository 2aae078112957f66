//! Session-owned UI sound service.

use std::{cell::Cell, rc::Rc};

use desktop_app_contract::VolumeLevel;
use leptos::logging;
use platform_host::SoundSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// UI events that have an associated sound.
pub enum SoundCue {
    Startup,
    Open,
    Close,
    Minimize,
    Maximize,
    Restore,
}

impl SoundCue {
    /// Asset token the sink resolves to a sound file.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Open => "open",
            Self::Close => "close",
            Self::Minimize => "minimize",
            Self::Maximize => "maximize",
            Self::Restore => "restore",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SoundLifecycle {
    Created,
    Ready,
    Disposed,
}

/// Plays [`SoundCue`]s through a host [`SoundSink`] once initialized.
///
/// Cues are dropped before [`SoundSystem::init`] and after [`SoundSystem::dispose`], and at
/// zero volume.
pub struct SoundSystem {
    sink: Rc<dyn SoundSink>,
    lifecycle: Cell<SoundLifecycle>,
}

impl SoundSystem {
    pub fn new(sink: Rc<dyn SoundSink>) -> Self {
        Self {
            sink,
            lifecycle: Cell::new(SoundLifecycle::Created),
        }
    }

    /// Enables playback. Has no effect on a disposed system.
    pub fn init(&self) {
        if self.lifecycle.get() == SoundLifecycle::Created {
            self.lifecycle.set(SoundLifecycle::Ready);
        }
    }

    /// Permanently disables playback.
    pub fn dispose(&self) {
        self.lifecycle.set(SoundLifecycle::Disposed);
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle.get() == SoundLifecycle::Ready
    }

    pub fn play(&self, cue: SoundCue, volume: VolumeLevel) {
        if !self.is_ready() {
            logging::debug_warn!("sound cue {:?} dropped: sound system not ready", cue);
            return;
        }
        if volume == VolumeLevel::MUTE {
            return;
        }
        self.sink.play(cue.token(), volume.gain());
    }
}
