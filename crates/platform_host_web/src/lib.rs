//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side wiring layer for preference persistence
//! (`localStorage`), UI sound playback (`HtmlAudioElement`) and the environment queries the
//! desktop session needs at boot (query string, viewport size). Non-wasm builds compile to
//! inert fallbacks so the runtime can be tested natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod audio;
pub mod env;
pub mod storage;

pub use adapters::{
    host_strategy_name, prefs_store, selected_host_strategy, sound_sink, HostStrategy,
    PrefsStoreAdapter, SoundSinkAdapter,
};
pub use audio::WebSoundSink;
pub use env::{current_query_string, viewport_size};
pub use storage::local_prefs::WebPrefsStore;
