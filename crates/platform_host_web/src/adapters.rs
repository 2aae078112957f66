use platform_host::{
    NoopPrefsStore, NoopSoundSink, PrefsError, PrefsStore, PrefsStoreFuture, SoundSink,
};

use crate::{WebPrefsStore, WebSoundSink};

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters from `platform_host_web`.
    Browser,
    /// Inert adapters for headless builds (prerender, server-side checks).
    Headless,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "headless-host")]
    {
        HostStrategy::Headless
    }

    #[cfg(not(feature = "headless-host"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::Headless => "headless",
    }
}

/// Adapter enum that erases the concrete preferences backend behind [`PrefsStore`].
#[derive(Debug, Clone, Copy)]
pub enum PrefsStoreAdapter {
    /// Browser-backed `localStorage` preference storage.
    Browser(WebPrefsStore),
    /// No-op fallback for headless builds.
    Headless(NoopPrefsStore),
}

impl PrefsStore for PrefsStoreAdapter {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, PrefsError>> {
        match self {
            Self::Browser(store) => store.load_pref(key),
            Self::Headless(store) => store.load_pref(key),
        }
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        match self {
            Self::Browser(store) => store.save_pref(key, raw_json),
            Self::Headless(store) => store.save_pref(key, raw_json),
        }
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        match self {
            Self::Browser(store) => store.delete_pref(key),
            Self::Headless(store) => store.delete_pref(key),
        }
    }
}

/// Adapter enum that erases the concrete audio backend behind [`SoundSink`].
#[derive(Debug, Clone)]
pub enum SoundSinkAdapter {
    /// `HtmlAudioElement` playback of bundled sound assets.
    Browser(WebSoundSink),
    /// Silent fallback for headless builds.
    Headless(NoopSoundSink),
}

impl SoundSink for SoundSinkAdapter {
    fn play(&self, cue_token: &'static str, gain: f32) {
        match self {
            Self::Browser(sink) => sink.play(cue_token, gain),
            Self::Headless(sink) => sink.play(cue_token, gain),
        }
    }
}

/// Builds the preferences adapter for the compile-time selected host strategy.
pub fn prefs_store() -> PrefsStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => PrefsStoreAdapter::Browser(WebPrefsStore),
        HostStrategy::Headless => PrefsStoreAdapter::Headless(NoopPrefsStore),
    }
}

/// Builds the sound adapter for the compile-time selected host strategy.
pub fn sound_sink() -> SoundSinkAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => SoundSinkAdapter::Browser(WebSoundSink::default()),
        HostStrategy::Headless => SoundSinkAdapter::Headless(NoopSoundSink),
    }
}
