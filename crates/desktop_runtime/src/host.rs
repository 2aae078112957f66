//! Host service bundle the desktop session runs against.
//!
//! The default bundle wires browser adapters from [`platform_host_web`]; tests and headless
//! embeddings inject in-memory services instead.

use std::rc::Rc;

use platform_host::{PrefsStore, SoundSink};
use platform_host_web::{host_strategy_name, prefs_store, sound_sink, viewport_size};

use crate::model::Viewport;

#[derive(Clone)]
/// Host services for preference persistence, sound playback, and viewport queries.
pub struct DesktopHostContext {
    prefs: Rc<dyn PrefsStore>,
    sound: Rc<dyn SoundSink>,
    host_strategy_name: &'static str,
}

impl Default for DesktopHostContext {
    fn default() -> Self {
        Self {
            prefs: Rc::new(prefs_store()),
            sound: Rc::new(sound_sink()),
            host_strategy_name: host_strategy_name(),
        }
    }
}

impl DesktopHostContext {
    /// Builds a bundle from explicit services (tests, headless embeddings).
    pub fn with_services(prefs: Rc<dyn PrefsStore>, sound: Rc<dyn SoundSink>) -> Self {
        Self {
            prefs,
            sound,
            host_strategy_name: "injected",
        }
    }

    pub fn prefs_store(&self) -> Rc<dyn PrefsStore> {
        self.prefs.clone()
    }

    pub fn sound_sink(&self) -> Rc<dyn SoundSink> {
        self.sound.clone()
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy_name
    }

    /// Current browser viewport, or a fixed fallback outside the browser.
    pub fn viewport(&self) -> Viewport {
        let (width, height) = viewport_size();
        Viewport::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use platform_host::{MemoryPrefsStore, NoopSoundSink};

    use super::*;

    #[test]
    fn default_bundle_uses_compile_time_strategy() {
        let host = DesktopHostContext::default();
        assert_eq!(host.host_strategy_name(), host_strategy_name());
        assert_eq!(host.viewport(), Viewport::new(1024, 768));
    }

    #[test]
    fn injected_bundle_reports_injected_strategy() {
        let host = DesktopHostContext::with_services(
            Rc::new(MemoryPrefsStore::default()),
            Rc::new(NoopSoundSink),
        );
        assert_eq!(host.host_strategy_name(), "injected");
    }
}
