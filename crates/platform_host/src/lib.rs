//! Typed host-domain contracts shared by the desktop runtime and browser adapters.
//!
//! This crate is the API-first boundary for platform services the window manager depends on:
//! lightweight preference persistence and UI sound playback. Concrete browser adapters live in
//! `platform_host_web`; in-memory and no-op adapters here back headless sessions and tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod sound;
pub mod storage;

pub use sound::{NoopSoundSink, RecordingSoundSink, SoundSink};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsError, PrefsStore,
    PrefsStoreFuture,
};
