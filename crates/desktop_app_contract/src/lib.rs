//! Shared contract types between the desktop window manager runtime and hosted apps.
//!
//! Hosted applications never touch window-manager state. They receive an [`AppServices`]
//! handle scoped to their own window and request transitions through it; the runtime
//! implements [`DesktopCapabilities`] and serializes every request through its session.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

/// Stable identifier of a window definition or open window instance.
pub type WindowKey = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
/// Closed set of icon kinds a window, start-menu entry, or desktop shortcut can show.
///
/// Unknown kinds in host catalogs deserialize to [`IconKind::Generic`].
pub enum IconKind {
    /// "My Computer" shell icon.
    Computer,
    /// Folder / explorer icon.
    Folder,
    /// Text document icon.
    Document,
    /// Notepad app icon.
    Notepad,
    /// Calculator app icon.
    Calculator,
    /// Paint app icon.
    Paint,
    /// Terminal / MS-DOS prompt icon.
    Terminal,
    /// Audio player icon.
    MediaPlayer,
    /// Video player icon.
    VideoPlayer,
    /// Web browser icon.
    Browser,
    /// Mail icon.
    Mail,
    /// Help book icon.
    Help,
    /// Control panel / settings icon.
    Settings,
    /// Recycle bin icon.
    RecycleBin,
    /// Fallback for anything else.
    #[default]
    #[serde(other)]
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Answer of a close-interceptor to a pending close request.
pub enum CloseDecision {
    /// Let the window close.
    Allow,
    /// Keep the window open.
    Deny,
}

impl From<bool> for CloseDecision {
    fn from(allow: bool) -> Self {
        if allow {
            Self::Allow
        } else {
            Self::Deny
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Result of a close request issued through [`DesktopCapabilities::close_window`].
pub enum CloseOutcome {
    /// The window was removed.
    Closed,
    /// The window's interceptor denied the close.
    Vetoed,
    /// A close for this window is already awaiting confirmation.
    AlreadyPending,
    /// No window with that id is open.
    NotOpen,
}

/// Per-window veto hook. The returned future may wait on user confirmation.
pub type CloseInterceptor = Rc<dyn Fn() -> LocalBoxFuture<'static, CloseDecision>>;

/// Per-window save action invoked by host menus (File → Save).
pub type SaveHandler = Rc<dyn Fn()>;

/// Boxed future returned by asynchronous capability calls.
pub type CapabilityFuture<'a, T> = LocalBoxFuture<'a, T>;

/// Builds a [`CloseInterceptor`] from an async closure returning `bool` (`true` = allow).
pub fn close_interceptor<F, Fut>(decide: F) -> CloseInterceptor
where
    F: Fn() -> Fut + 'static,
    Fut: std::future::Future<Output = bool> + 'static,
{
    Rc::new(move || -> LocalBoxFuture<'static, CloseDecision> {
        let pending = decide();
        Box::pin(async move { CloseDecision::from(pending.await) })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
/// Global volume level, always within `0..=100`.
pub struct VolumeLevel(u8);

impl VolumeLevel {
    /// Highest representable level.
    pub const MAX: Self = Self(100);
    /// Silence.
    pub const MUTE: Self = Self(0);

    /// Creates a level, clamping out-of-range values.
    pub fn new(level: i64) -> Self {
        Self(level.clamp(0, 100) as u8)
    }

    /// Returns the level as a percentage.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the level as a normalized gain in `0.0..=1.0`.
    pub fn gain(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for VolumeLevel {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<i64> for VolumeLevel {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if (0..=100).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(format!("volume {raw} outside 0..=100"))
        }
    }
}

impl From<VolumeLevel> for u8 {
    fn from(level: VolumeLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Read-only projection of one open window.
pub struct RunningApp {
    /// Window id.
    pub id: WindowKey,
    /// Title shown in the titlebar and taskbar.
    pub title: String,
    /// Icon kind.
    pub icon: IconKind,
    /// Whether the window is minimized to the taskbar.
    pub is_minimized: bool,
    /// Whether the window is maximized.
    pub is_maximized: bool,
    /// Whether the window has focus.
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Read-only projection of one openable window definition.
pub struct AvailableApp {
    /// Definition id accepted by [`DesktopCapabilities::open_window`].
    pub id: WindowKey,
    /// Display title.
    pub title: String,
    /// Icon kind.
    pub icon: IconKind,
}

/// Operations the desktop session exposes to hosted applications.
///
/// Unknown ids are ignored. Nothing here reports errors: persistence problems are logged by
/// the runtime and vetoes come back as [`CloseOutcome::Vetoed`].
pub trait DesktopCapabilities {
    /// Opens the window with `window_id`, or focuses/restores it when already open.
    fn open_window<'a>(&'a self, window_id: &'a str) -> CapabilityFuture<'a, ()>;

    /// Requests a close, awaiting the window's interceptor when one is registered.
    fn close_window<'a>(&'a self, window_id: &'a str) -> CapabilityFuture<'a, CloseOutcome>;

    /// Registers (or replaces) the close-interceptor for `window_id`.
    fn register_close_interceptor(&self, window_id: &str, interceptor: CloseInterceptor);

    /// Removes the close-interceptor for `window_id`.
    fn unregister_close_interceptor(&self, window_id: &str);

    /// Registers (or replaces) the save handler for `window_id`.
    fn register_save_handler(&self, window_id: &str, handler: SaveHandler);

    /// Removes the save handler for `window_id`.
    fn unregister_save_handler(&self, window_id: &str);

    /// Returns the shared volume level.
    fn volume(&self) -> VolumeLevel;

    /// Sets and persists the shared volume level.
    fn set_volume<'a>(&'a self, level: VolumeLevel) -> CapabilityFuture<'a, ()>;

    /// Lists open windows in stacking order (bottom first).
    fn running_apps(&self) -> Vec<RunningApp>;

    /// Lists every window definition that can be opened.
    fn available_apps(&self) -> Vec<AvailableApp>;
}

#[derive(Clone)]
/// Capability handle injected into one hosted app, scoped to its own window.
pub struct AppServices {
    window_id: WindowKey,
    host: Rc<dyn DesktopCapabilities>,
}

impl AppServices {
    /// Creates a window-scoped handle over the runtime's capability host.
    pub fn new(window_id: impl Into<WindowKey>, host: Rc<dyn DesktopCapabilities>) -> Self {
        Self {
            window_id: window_id.into(),
            host,
        }
    }

    /// Returns the id of the window this handle belongs to.
    pub fn window_id(&self) -> &str {
        &self.window_id
    }

    /// Opens (or focuses) another window by id.
    pub async fn open_window(&self, window_id: &str) {
        self.host.open_window(window_id).await;
    }

    /// Requests a close of another window by id.
    pub async fn close_window(&self, window_id: &str) -> CloseOutcome {
        self.host.close_window(window_id).await
    }

    /// Requests a close of this app's own window.
    pub async fn close_self(&self) -> CloseOutcome {
        self.host.close_window(&self.window_id).await
    }

    /// Installs a veto hook for this window (for example, "save changes?").
    pub fn set_close_interceptor(&self, interceptor: CloseInterceptor) {
        self.host
            .register_close_interceptor(&self.window_id, interceptor);
    }

    /// Removes this window's veto hook.
    pub fn clear_close_interceptor(&self) {
        self.host.unregister_close_interceptor(&self.window_id);
    }

    /// Installs the save action host menus invoke for this window.
    pub fn set_save_handler(&self, handler: SaveHandler) {
        self.host.register_save_handler(&self.window_id, handler);
    }

    /// Removes this window's save action.
    pub fn clear_save_handler(&self) {
        self.host.unregister_save_handler(&self.window_id);
    }

    /// Returns the shared volume level.
    pub fn volume(&self) -> VolumeLevel {
        self.host.volume()
    }

    /// Sets the shared volume level.
    pub async fn set_volume(&self, level: VolumeLevel) {
        self.host.set_volume(level).await;
    }

    /// Lists open windows.
    pub fn running_apps(&self) -> Vec<RunningApp> {
        self.host.running_apps()
    }

    /// Lists openable windows.
    pub fn available_apps(&self) -> Vec<AvailableApp> {
        self.host.available_apps()
    }
}
