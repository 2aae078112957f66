//! Fail-soft persistence of desktop geometry and preferences over a host [`PrefsStore`].
//!
//! Reads never fail: a missing, unreadable, or malformed value comes back as `None` and the
//! caller keeps its defaults. Writes log and swallow store errors.

use std::rc::Rc;

use desktop_app_contract::VolumeLevel;
use leptos::logging;
use platform_host::{load_pref_with, save_pref_with, PrefsStore};
use serde::{de::DeserializeOwned, Serialize};

use crate::model::{DesktopState, GeometryRecord, WallpaperPreference};

/// Versioned key holding the full [`GeometryRecord`].
pub const GEOMETRY_KEY: &str = "retrodesk.window-geometry.v1";
/// Versioned key holding the [`WallpaperPreference`].
pub const WALLPAPER_KEY: &str = "retrodesk.wallpaper.v1";
/// Versioned key holding the volume level (0-100).
pub const VOLUME_KEY: &str = "retrodesk.volume.v1";

/// Everything read from the store at session start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedDesktop {
    pub geometry: Option<GeometryRecord>,
    pub wallpaper: Option<WallpaperPreference>,
    pub volume: Option<VolumeLevel>,
}

#[derive(Clone)]
/// Typed, fail-soft view over the host preference store.
pub struct DesktopPersistence {
    store: Rc<dyn PrefsStore>,
}

impl DesktopPersistence {
    pub fn new(store: Rc<dyn PrefsStore>) -> Self {
        Self { store }
    }

    /// Loads `key`, returning `None` when absent or unusable.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match load_pref_with(self.store.as_ref(), key).await {
            Ok(value) => value,
            Err(err) => {
                logging::warn!("ignoring stored `{key}`: {err}");
                None
            }
        }
    }

    /// Stores `value` under `key`. Failures are logged only.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = save_pref_with(self.store.as_ref(), key, value).await {
            logging::warn!("failed to persist `{key}`: {err}");
        }
    }

    pub async fn load_desktop(&self) -> PersistedDesktop {
        PersistedDesktop {
            geometry: self.get(GEOMETRY_KEY).await,
            wallpaper: self.get(WALLPAPER_KEY).await,
            volume: self.get(VOLUME_KEY).await,
        }
    }

    /// Flushes the whole geometry record.
    pub async fn persist_geometry(&self, state: &DesktopState) {
        self.set(GEOMETRY_KEY, &state.geometry).await;
    }

    pub async fn persist_wallpaper(&self, state: &DesktopState) {
        self.set(WALLPAPER_KEY, &state.wallpaper).await;
    }

    pub async fn persist_volume(&self, state: &DesktopState) {
        self.set(VOLUME_KEY, &state.volume).await;
    }
}
