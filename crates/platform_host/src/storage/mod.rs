//! Storage contracts for host-backed persistence.

pub mod prefs;
