use std::collections::BTreeMap;

use desktop_app_contract::{IconKind, RunningApp, VolumeLevel};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which this window's geometry is persisted.
    pub fn geometry_key(&self) -> String {
        self.0.trim().to_lowercase()
    }
}

impl From<&str> for WindowId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for WindowId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800)
    }
}

/// Position and optional size of a window. Size is `None` while the window is auto-sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
}

impl Geometry {
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            width: None,
            height: None,
        }
    }

    pub const fn sized(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn size(self) -> Option<WindowSize> {
        Some(WindowSize {
            width: self.width?,
            height: self.height?,
        })
    }

    pub fn with_size(self, size: WindowSize) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
            ..self
        }
    }

    pub fn with_position(self, position: PointerPosition) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..self
        }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }
}

/// Host-supplied layout hints for a window definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutHints {
    pub full_bleed: bool,
    pub lock_aspect_ratio: bool,
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    pub can_maximize: bool,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl Default for LayoutHints {
    fn default() -> Self {
        Self {
            full_bleed: false,
            lock_aspect_ratio: false,
            min_width: None,
            min_height: None,
            can_maximize: true,
            width: None,
            height: None,
        }
    }
}

impl LayoutHints {
    /// Width/height ratio of the declared default size, when both dimensions are declared.
    pub fn declared_aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(f64::from(w) / f64::from(h)),
            _ => None,
        }
    }
}

/// Static, host-supplied template for an openable window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDefinition {
    pub id: WindowId,
    pub title: String,
    #[serde(default, with = "crate::icons::icon_name")]
    pub icon: IconKind,
    /// Opaque payload handed to the renderer.
    #[serde(default)]
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_content: Option<Value>,
    #[serde(flatten)]
    pub layout: LayoutHints,
}

impl WindowDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>, icon: IconKind) -> Self {
        Self {
            id: WindowId::new(id),
            title: title.into(),
            icon,
            content: Value::Null,
            help_content: None,
            layout: LayoutHints::default(),
        }
    }

    pub fn with_layout(mut self, layout: LayoutHints) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    pub fn with_help(mut self, help_content: Value) -> Self {
        self.help_content = Some(help_content);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClosePhase {
    #[default]
    Open,
    /// A close-interceptor is deciding whether the window may close.
    PendingCloseConfirmation,
}

/// Derived lifecycle state of an open window instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowLifecycle {
    Open { active: bool },
    Maximized { active: bool },
    Minimized,
    PendingCloseConfirmation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInstance {
    pub id: WindowId,
    /// Distinguishes this instance from earlier windows opened under the same id.
    #[serde(default)]
    pub instance_serial: u64,
    pub title: String,
    pub icon: IconKind,
    pub geometry: Geometry,
    /// Geometry captured when the window was maximized.
    pub restore_geometry: Option<Geometry>,
    pub z_index: u32,
    pub is_active: bool,
    pub is_minimized: bool,
    pub is_maximized: bool,
    pub close_phase: ClosePhase,
    /// Synthesized windows (help, about) that have no registry definition.
    pub ephemeral: bool,
    pub layout: LayoutHints,
    pub content: Value,
}

impl WindowInstance {
    pub fn lifecycle(&self) -> WindowLifecycle {
        if self.close_phase == ClosePhase::PendingCloseConfirmation {
            WindowLifecycle::PendingCloseConfirmation
        } else if self.is_minimized {
            WindowLifecycle::Minimized
        } else if self.is_maximized {
            WindowLifecycle::Maximized {
                active: self.is_active,
            }
        } else {
            WindowLifecycle::Open {
                active: self.is_active,
            }
        }
    }

    pub fn running_app(&self) -> RunningApp {
        RunningApp {
            id: self.id.0.clone(),
            title: self.title.clone(),
            icon: self.icon,
            is_minimized: self.is_minimized,
            is_maximized: self.is_maximized,
            is_active: self.is_active,
        }
    }
}

/// Persisted geometry per window, keyed by [`WindowId::geometry_key`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryRecord(BTreeMap<String, Geometry>);

impl GeometryRecord {
    pub fn get(&self, window_id: &WindowId) -> Option<Geometry> {
        self.0.get(&window_id.geometry_key()).copied()
    }

    pub fn insert(&mut self, window_id: &WindowId, geometry: Geometry) {
        self.0.insert(window_id.geometry_key(), geometry);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperKind {
    Color,
    Image,
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallpaperPreference {
    pub id: String,
    pub name: String,
    /// CSS colour, image URL, or pattern token depending on `kind`.
    pub value: String,
    #[serde(rename = "type")]
    pub kind: WallpaperKind,
}

impl Default for WallpaperPreference {
    fn default() -> Self {
        Self {
            id: "teal".to_string(),
            name: "Teal".to_string(),
            value: "#008080".to_string(),
            kind: WallpaperKind::Color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BootPhase {
    #[default]
    Booting,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub windows: Vec<WindowInstance>,
    pub geometry: GeometryRecord,
    pub viewport: Viewport,
    pub wallpaper: WallpaperPreference,
    pub volume: VolumeLevel,
    pub start_menu_open: bool,
    pub boot_phase: BootPhase,
    pub animations_enabled: bool,
    #[serde(default)]
    pub next_instance_serial: u64,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            geometry: GeometryRecord::default(),
            viewport: Viewport::default(),
            wallpaper: WallpaperPreference::default(),
            volume: VolumeLevel::default(),
            start_menu_open: false,
            boot_phase: BootPhase::Booting,
            animations_enabled: true,
            next_instance_serial: 1,
        }
    }
}

impl DesktopState {
    pub fn active_window_id(&self) -> Option<&WindowId> {
        self.windows.iter().find(|w| w.is_active).map(|w| &w.id)
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowInstance> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn is_open(&self, window_id: &WindowId) -> bool {
        self.window(window_id).is_some()
    }

    pub fn running_apps(&self) -> Vec<RunningApp> {
        self.windows.iter().map(WindowInstance::running_app).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub geometry_start: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub size_start: WindowSize,
    pub min_size: WindowSize,
    /// Width/height ratio to preserve, when the window locks its aspect ratio.
    pub aspect_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}
