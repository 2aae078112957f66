//! Geometry and stacking helpers shared by the desktop reducer.
//!
//! Everything here is a pure function over model types so placement and clamping can be tested
//! without a session.

use crate::{
    config::LayoutConfig,
    model::{
        DesktopState, Geometry, LayoutHints, PointerPosition, Viewport, WindowDefinition,
        WindowId, WindowSize,
    },
};

/// How far a window may hang past the top/left edges.
pub const EDGE_SLACK: i32 = 11;
/// Width of the sliver that must stay grabbable near the right/bottom edges.
pub const GRAB_MARGIN: i32 = 10;

fn clamp_axis(value: i32, min: i32, max: i32) -> i32 {
    value.max(min).min(max.max(min))
}

/// Keeps a grabbable sliver of the window on screen above the taskbar.
pub fn clamp_position(geometry: Geometry, viewport: Viewport, taskbar_height: i32) -> Geometry {
    Geometry {
        x: clamp_axis(geometry.x, -EDGE_SLACK, viewport.width - GRAB_MARGIN),
        y: clamp_axis(
            geometry.y,
            -EDGE_SLACK,
            viewport.height - taskbar_height - GRAB_MARGIN,
        ),
        ..geometry
    }
}

/// Returns `true` when `geometry` already satisfies [`clamp_position`].
pub fn is_within_bounds(geometry: Geometry, viewport: Viewport, taskbar_height: i32) -> bool {
    clamp_position(geometry, viewport, taskbar_height) == geometry
}

/// Top-left corner for the next cascaded window given how many windows are already open.
pub fn cascade_position(open_count: usize, config: &LayoutConfig) -> PointerPosition {
    let slot = open_count % config.cascade_slots.max(1);
    let offset = config.cascade_step * slot as i32;
    PointerPosition {
        x: config.cascade_origin.x + offset,
        y: config.cascade_origin.y + offset,
    }
}

/// Centered geometry covering the usable area minus an inset on every side.
pub fn mobile_geometry(viewport: Viewport, config: &LayoutConfig) -> Geometry {
    let usable_height = viewport.height - config.taskbar_height;
    let inset_x = (f64::from(viewport.width) * config.mobile_inset_ratio).round() as i32;
    let inset_y = (f64::from(usable_height) * config.mobile_inset_ratio).round() as i32;
    Geometry::sized(
        inset_x,
        inset_y,
        (viewport.width - inset_x * 2).max(0),
        (usable_height - inset_y * 2).max(0),
    )
}

/// The whole viewport above the taskbar.
pub fn maximized_geometry(viewport: Viewport, taskbar_height: i32) -> Geometry {
    Geometry::sized(
        0,
        0,
        viewport.width,
        (viewport.height - taskbar_height).max(0),
    )
}

/// Minimum size for a window, falling back to the configured default per axis.
pub fn min_size(layout: &LayoutHints, config: &LayoutConfig) -> WindowSize {
    WindowSize {
        width: layout.min_width.unwrap_or(config.default_min_size.width),
        height: layout.min_height.unwrap_or(config.default_min_size.height),
    }
}

/// Raises an explicit size to the window's minimum on both axes.
pub fn clamp_size(size: WindowSize, min: WindowSize) -> WindowSize {
    WindowSize {
        width: size.width.max(min.width),
        height: size.height.max(min.height),
    }
}

/// Computes where a newly opened window lands.
///
/// Priority: saved geometry, then the mobile inset layout, then the desktop cascade. The result
/// is always clamped against the current viewport.
pub fn initial_geometry(
    definition: &WindowDefinition,
    saved: Option<Geometry>,
    open_count: usize,
    viewport: Viewport,
    config: &LayoutConfig,
) -> Geometry {
    let placed = if let Some(saved) = saved {
        saved
    } else if config.is_mobile(viewport) {
        mobile_geometry(viewport, config)
    } else {
        let position = cascade_position(open_count, config);
        let geometry = Geometry::at(position.x, position.y);
        match (definition.layout.width, definition.layout.height) {
            (Some(width), Some(height)) => geometry.with_size(clamp_size(
                WindowSize { width, height },
                min_size(&definition.layout, config),
            )),
            _ => geometry,
        }
    };
    clamp_position(placed, viewport, config.taskbar_height)
}

/// Applies a bottom-right resize drag of `(dx, dy)` to `start`.
///
/// Both axes are floored at `min`. With an aspect ratio, height follows width; if that pushes
/// height under its minimum, height is pinned and width is re-derived from it.
pub fn resize_size(
    start: WindowSize,
    dx: i32,
    dy: i32,
    min: WindowSize,
    aspect_ratio: Option<f64>,
) -> WindowSize {
    let mut size = clamp_size(
        WindowSize {
            width: start.width.saturating_add(dx),
            height: start.height.saturating_add(dy),
        },
        min,
    );
    if let Some(ratio) = aspect_ratio.filter(|r| *r > 0.0) {
        size.height = (f64::from(size.width) / ratio).round() as i32;
        if size.height < min.height {
            size.height = min.height;
            size.width = (f64::from(size.height) * ratio).round() as i32;
        }
    }
    size
}

/// Aspect ratio to preserve while resizing, when the window locks it.
pub fn locked_aspect_ratio(layout: &LayoutHints, start: WindowSize) -> Option<f64> {
    if !layout.lock_aspect_ratio {
        return None;
    }
    layout.declared_aspect_ratio().or_else(|| {
        (start.width > 0 && start.height > 0)
            .then(|| f64::from(start.width) / f64::from(start.height))
    })
}

/// Activates and raises `window_id`, un-minimizing it and deactivating every other window.
///
/// Returns `false` when the window does not exist.
pub fn focus_window_internal(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(index) = state.windows.iter().position(|w| &w.id == window_id) else {
        return false;
    };

    let already_active_top = index + 1 == state.windows.len()
        && state
            .windows
            .get(index)
            .map(|w| w.is_active && !w.is_minimized)
            .unwrap_or(false);
    if already_active_top {
        return true;
    }

    for window in &mut state.windows {
        window.is_active = false;
    }
    let mut window = state.windows.remove(index);
    window.is_active = true;
    window.is_minimized = false;
    state.windows.push(window);
    normalize_window_stack(state);
    true
}

/// Renumbers z-indices from stack order and enforces the activation invariants.
///
/// A minimized window is never active and at most one window (the topmost claimant) stays
/// active. No other window is promoted when the active one goes away.
pub fn normalize_window_stack(state: &mut DesktopState) {
    let mut has_active = false;
    for (idx, window) in state.windows.iter_mut().enumerate().rev() {
        window.z_index = (idx + 1) as u32;
        if window.is_minimized {
            window.is_active = false;
        }
        if window.is_active {
            if has_active {
                window.is_active = false;
            } else {
                has_active = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::IconKind;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{ClosePhase, WindowInstance};

    const DESKTOP: Viewport = Viewport::new(1280, 800);

    fn instance(id: &str) -> WindowInstance {
        WindowInstance {
            id: WindowId::from(id),
            instance_serial: 0,
            title: id.to_string(),
            icon: IconKind::Generic,
            geometry: Geometry::at(0, 0),
            restore_geometry: None,
            z_index: 0,
            is_active: false,
            is_minimized: false,
            is_maximized: false,
            close_phase: ClosePhase::Open,
            ephemeral: false,
            layout: LayoutHints::default(),
            content: serde_json::Value::Null,
        }
    }

    #[test]
    fn clamp_keeps_sliver_visible_above_taskbar() {
        let clamped = clamp_position(Geometry::at(5000, 5000), DESKTOP, 30);
        assert_eq!(clamped, Geometry::at(1270, 760));

        let clamped = clamp_position(Geometry::sized(-400, -90, 300, 200), DESKTOP, 30);
        assert_eq!(clamped, Geometry::sized(-11, -11, 300, 200));

        assert!(is_within_bounds(Geometry::at(-11, 760), DESKTOP, 30));
        assert!(!is_within_bounds(Geometry::at(0, 761), DESKTOP, 30));
    }

    #[test]
    fn clamp_on_degenerate_viewport_pins_to_minimum() {
        let clamped = clamp_position(Geometry::at(50, 50), Viewport::new(0, 0), 30);
        assert_eq!(clamped, Geometry::at(-11, -11));
    }

    #[test]
    fn cascade_steps_diagonally_and_wraps() {
        let config = LayoutConfig::default();
        assert_eq!(cascade_position(0, &config), PointerPosition { x: 100, y: 50 });
        assert_eq!(cascade_position(1, &config), PointerPosition { x: 130, y: 80 });
        assert_eq!(cascade_position(10, &config), PointerPosition { x: 100, y: 50 });
    }

    #[test]
    fn initial_geometry_prefers_saved_then_mobile_then_cascade() {
        let config = LayoutConfig::default();
        let definition = WindowDefinition::new("notepad", "Notepad", IconKind::Notepad);

        let saved = initial_geometry(
            &definition,
            Some(Geometry::sized(300, 200, 500, 400)),
            3,
            DESKTOP,
            &config,
        );
        assert_eq!(saved, Geometry::sized(300, 200, 500, 400));

        let mobile = initial_geometry(&definition, None, 3, Viewport::new(400, 830), &config);
        assert_eq!(mobile, Geometry::sized(20, 40, 360, 720));

        let cascaded = initial_geometry(&definition, None, 2, DESKTOP, &config);
        assert_eq!(cascaded, Geometry::at(160, 110));
    }

    #[test]
    fn saved_geometry_is_clamped_into_current_viewport() {
        let config = LayoutConfig::default();
        let definition = WindowDefinition::new("notepad", "Notepad", IconKind::Notepad);
        let placed = initial_geometry(
            &definition,
            Some(Geometry::sized(1200, 700, 400, 300)),
            0,
            Viewport::new(800, 400),
            &config,
        );
        assert_eq!(placed, Geometry::sized(790, 360, 400, 300));
    }

    #[test]
    fn declared_size_is_floored_at_minimum() {
        let config = LayoutConfig::default();
        let definition =
            WindowDefinition::new("tiny", "Tiny", IconKind::Generic).with_layout(LayoutHints {
                width: Some(50),
                height: Some(500),
                ..LayoutHints::default()
            });
        let placed = initial_geometry(&definition, None, 0, DESKTOP, &config);
        assert_eq!(placed, Geometry::sized(100, 50, 220, 500));
    }

    #[test]
    fn resize_floors_at_minimum() {
        let size = resize_size(
            WindowSize {
                width: 400,
                height: 300,
            },
            -350,
            -250,
            WindowSize {
                width: 200,
                height: 150,
            },
            None,
        );
        assert_eq!(
            size,
            WindowSize {
                width: 200,
                height: 150
            }
        );
    }

    #[test]
    fn resize_with_locked_aspect_rederives_width_when_height_clamps() {
        let min = WindowSize {
            width: 100,
            height: 100,
        };
        let start = WindowSize {
            width: 400,
            height: 200,
        };

        let grown = resize_size(start, 100, 0, min, Some(2.0));
        assert_eq!(
            grown,
            WindowSize {
                width: 500,
                height: 250
            }
        );

        let shrunk = resize_size(start, -250, 0, min, Some(2.0));
        assert_eq!(
            shrunk,
            WindowSize {
                width: 200,
                height: 100
            }
        );
    }

    #[test]
    fn locked_aspect_prefers_declared_size() {
        let layout = LayoutHints {
            lock_aspect_ratio: true,
            width: Some(275),
            height: Some(110),
            ..LayoutHints::default()
        };
        let start = WindowSize {
            width: 100,
            height: 100,
        };
        assert_eq!(locked_aspect_ratio(&layout, start), Some(2.5));
        assert_eq!(
            locked_aspect_ratio(&LayoutHints::default(), start),
            None
        );
    }

    #[test]
    fn focus_raises_and_keeps_single_active() {
        let mut state = DesktopState::default();
        state.windows = vec![instance("a"), instance("b"), instance("c")];
        state.windows[2].is_active = true;
        state.windows[1].is_minimized = true;

        assert!(focus_window_internal(&mut state, &WindowId::from("b")));

        let order: Vec<&str> = state.windows.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
        assert_eq!(state.active_window_id(), Some(&WindowId::from("b")));
        assert!(!state.windows[2].is_minimized);
        assert_eq!(state.windows[2].z_index, 3);
        assert_eq!(state.windows.iter().filter(|w| w.is_active).count(), 1);

        assert!(!focus_window_internal(&mut state, &WindowId::from("zzz")));
    }

    #[test]
    fn normalize_drops_minimized_activity_without_promoting() {
        let mut state = DesktopState::default();
        state.windows = vec![instance("a"), instance("b")];
        state.windows[1].is_active = true;
        state.windows[1].is_minimized = true;

        normalize_window_stack(&mut state);
        assert_eq!(state.active_window_id(), None);
        assert_eq!(state.windows[0].z_index, 1);
        assert_eq!(state.windows[1].z_index, 2);
    }
}
