//! Layout configuration for the window manager.

use leptos::logging;
use serde::{Deserialize, Serialize};

use crate::model::{PointerPosition, Viewport, WindowId, WindowSize};

/// Height reserved for the taskbar at the bottom of the viewport.
pub const TASKBAR_HEIGHT: i32 = 30;
/// Viewports narrower than this are treated as mobile/touch layouts.
pub const MOBILE_BREAKPOINT: i32 = 768;
pub const DEFAULT_WINDOW_WIDTH: i32 = 420;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;
pub const DEFAULT_MIN_WINDOW_WIDTH: i32 = 220;
pub const DEFAULT_MIN_WINDOW_HEIGHT: i32 = 140;
/// Largest mobile inset that still leaves a usable window.
pub const MAX_MOBILE_INSET_RATIO: f64 = 0.45;

/// Tunables for placement, clamping, and boot behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub taskbar_height: i32,
    pub mobile_breakpoint: i32,
    /// Position of the first cascaded window.
    pub cascade_origin: PointerPosition,
    /// Diagonal offset added per already-open window.
    pub cascade_step: i32,
    /// Number of cascade slots before placement wraps back to the origin.
    pub cascade_slots: usize,
    /// Inset on each side of a mobile viewport, as a fraction of its size.
    pub mobile_inset_ratio: f64,
    pub default_size: WindowSize,
    pub default_min_size: WindowSize,
    /// Window opened once boot completes, unless the session skips it.
    pub welcome_window_id: Option<WindowId>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            taskbar_height: TASKBAR_HEIGHT,
            mobile_breakpoint: MOBILE_BREAKPOINT,
            cascade_origin: PointerPosition { x: 100, y: 50 },
            cascade_step: 30,
            cascade_slots: 10,
            mobile_inset_ratio: 0.05,
            default_size: WindowSize {
                width: DEFAULT_WINDOW_WIDTH,
                height: DEFAULT_WINDOW_HEIGHT,
            },
            default_min_size: WindowSize {
                width: DEFAULT_MIN_WINDOW_WIDTH,
                height: DEFAULT_MIN_WINDOW_HEIGHT,
            },
            welcome_window_id: None,
        }
    }
}

impl LayoutConfig {
    /// Parses a JSON config, falling back to defaults for a malformed document.
    ///
    /// The parsed config is [normalized](Self::normalized).
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Self>(raw) {
            Ok(config) => config.normalized(),
            Err(err) => {
                logging::warn!("layout config rejected, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Clamps out-of-range values into a layout the window manager can honor.
    pub fn normalized(mut self) -> Self {
        if self.taskbar_height < 0 {
            logging::warn!("taskbar_height {} clamped to 0", self.taskbar_height);
            self.taskbar_height = 0;
        }
        if self.cascade_step < 0 {
            logging::warn!("cascade_step {} clamped to 0", self.cascade_step);
            self.cascade_step = 0;
        }
        if self.cascade_slots == 0 {
            logging::warn!("cascade_slots 0 raised to 1");
            self.cascade_slots = 1;
        }
        if self.mobile_inset_ratio.is_nan() {
            logging::warn!("mobile_inset_ratio is not a number, using default");
            self.mobile_inset_ratio = Self::default().mobile_inset_ratio;
        } else if !(0.0..=MAX_MOBILE_INSET_RATIO).contains(&self.mobile_inset_ratio) {
            let clamped = self.mobile_inset_ratio.clamp(0.0, MAX_MOBILE_INSET_RATIO);
            logging::warn!(
                "mobile_inset_ratio {} clamped to {clamped}",
                self.mobile_inset_ratio
            );
            self.mobile_inset_ratio = clamped;
        }
        for (name, size) in [
            ("default_size", &mut self.default_size),
            ("default_min_size", &mut self.default_min_size),
        ] {
            if size.width < 1 || size.height < 1 {
                logging::warn!("{name} {}x{} raised to at least 1x1", size.width, size.height);
                size.width = size.width.max(1);
                size.height = size.height.max(1);
            }
        }
        self
    }

    pub fn with_welcome_window(mut self, window_id: impl Into<String>) -> Self {
        self.welcome_window_id = Some(WindowId::new(window_id));
        self
    }

    pub fn is_mobile(&self, viewport: Viewport) -> bool {
        viewport.width < self.mobile_breakpoint
    }
}
