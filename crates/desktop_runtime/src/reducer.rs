//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use desktop_app_contract::{CloseDecision, VolumeLevel};
use thiserror::Error;

use crate::{
    config::LayoutConfig,
    model::{
        BootPhase, ClosePhase, DesktopState, DragSession, Geometry, GeometryRecord,
        InteractionState, PointerPosition, ResizeSession, Viewport, WallpaperPreference,
        WindowDefinition, WindowId, WindowInstance, WindowSize,
    },
    registry::WindowRegistry,
    sound::SoundCue,
    window_manager::{
        clamp_position, clamp_size, focus_window_internal, initial_geometry, locked_aspect_ratio,
        maximized_geometry, min_size, normalize_window_stack, resize_size,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a registered window, or focus/restore it when already open.
    OpenWindow { window_id: WindowId },
    /// Open a synthesized window that has no registry entry (help, about).
    OpenEphemeral { definition: WindowDefinition },
    /// Remove a window without consulting its interceptor.
    CloseWindow { window_id: WindowId },
    /// Mark a window as awaiting its close-interceptor's decision.
    RequestClose { window_id: WindowId },
    /// Apply the interceptor's decision to a pending close.
    ///
    /// Ignored unless `instance_serial` still names the open window and its close is pending.
    ResolveClose {
        window_id: WindowId,
        instance_serial: u64,
        decision: CloseDecision,
    },
    /// Remove every window, bypassing interceptors.
    CloseAll,
    MinimizeWindow { window_id: WindowId },
    /// Minimize every window and clear the active window.
    MinimizeAll,
    /// Maximize a window, or restore it when already maximized.
    ToggleMaximize { window_id: WindowId },
    /// Un-minimize a window, or restore a maximized window to its snapshot.
    RestoreWindow { window_id: WindowId },
    /// Activate and raise a window.
    FocusWindow { window_id: WindowId },
    /// Taskbar button behavior: restore when minimized, minimize when active, otherwise focus.
    ToggleTaskbarWindow { window_id: WindowId },
    ToggleStartMenu,
    CloseStartMenu,
    BeginMove {
        window_id: WindowId,
        pointer: PointerPosition,
    },
    UpdateMove { pointer: PointerPosition },
    /// Commit the drag and persist the final geometry.
    EndMove,
    BeginResize {
        window_id: WindowId,
        pointer: PointerPosition,
        /// Rendered size, for windows that are still auto-sized.
        measured: Option<WindowSize>,
    },
    UpdateResize { pointer: PointerPosition },
    /// Commit the resize and persist the final geometry.
    EndResize,
    /// Move a window to an explicit position (clamped, persisted).
    MoveWindow {
        window_id: WindowId,
        position: PointerPosition,
    },
    /// Resize a window to an explicit size (floored at minimums, persisted).
    ResizeWindow {
        window_id: WindowId,
        size: WindowSize,
    },
    /// Re-clamp every window against a new viewport.
    ViewportResized { viewport: Viewport },
    SetWallpaper { wallpaper: WallpaperPreference },
    SetVolume { level: VolumeLevel },
    SetAnimationsEnabled { enabled: bool },
    /// Replace the in-memory geometry record with the one loaded at startup.
    HydrateGeometry { record: GeometryRecord },
    /// Apply preferences loaded at startup; `None` keeps the default.
    HydratePreferences {
        wallpaper: Option<WallpaperPreference>,
        volume: Option<VolumeLevel>,
    },
    /// Leave the boot screen, optionally opening the configured welcome window.
    BootComplete { open_welcome: bool },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the session to execute.
pub enum RuntimeEffect {
    /// Flush the full geometry record to the preference store.
    PersistGeometry,
    PersistWallpaper,
    PersistVolume,
    PlaySound(SoundCue),
    /// A window left the open set; per-window handlers should be dropped.
    WindowClosed(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that reference something that does not exist.
///
/// The reducer checks these before mutating, so an `Err` always leaves state untouched.
pub enum ReducerError {
    /// The target window is not open.
    #[error("window `{0}` is not open")]
    WindowNotFound(WindowId),
    /// No registry definition exists for the requested id.
    #[error("no window definition for `{0}`")]
    DefinitionNotFound(WindowId),
    /// A gesture update or release arrived without a matching begin.
    #[error("no drag or resize gesture in progress")]
    NoActiveGesture,
}

/// Read-only inputs the reducer consults alongside the mutable state.
#[derive(Clone, Copy)]
pub struct DesktopEnv<'a> {
    pub registry: &'a WindowRegistry,
    pub config: &'a LayoutConfig,
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// This is the authoritative window lifecycle state machine. It is synchronous and performs no
/// I/O; persistence and sound happen when the caller executes the returned effects.
///
/// # Errors
///
/// Returns [`ReducerError`] when the action targets a window or definition that does not exist,
/// or continues a gesture that never began. State is unchanged in that case.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    env: DesktopEnv<'_>,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow { window_id } => {
            if state.is_open(&window_id) {
                reopen_window(state, &window_id, &mut effects)?;
            } else {
                let definition = env
                    .registry
                    .definition(&window_id)
                    .ok_or_else(|| ReducerError::DefinitionNotFound(window_id.clone()))?;
                let saved = state.geometry.get(&window_id);
                spawn_window(state, env.config, definition, saved, false);
                effects.push(RuntimeEffect::PlaySound(SoundCue::Open));
            }
            state.start_menu_open = false;
        }
        DesktopAction::OpenEphemeral { definition } => {
            if state.is_open(&definition.id) {
                reopen_window(state, &definition.id, &mut effects)?;
            } else {
                spawn_window(state, env.config, &definition, None, true);
                effects.push(RuntimeEffect::PlaySound(SoundCue::Open));
            }
            state.start_menu_open = false;
        }
        DesktopAction::CloseWindow { window_id } => {
            remove_window(state, interaction, &window_id)?;
            effects.push(RuntimeEffect::WindowClosed(window_id));
            effects.push(RuntimeEffect::PlaySound(SoundCue::Close));
        }
        DesktopAction::RequestClose { window_id } => {
            find_window_mut(state, &window_id)?.close_phase = ClosePhase::PendingCloseConfirmation;
        }
        DesktopAction::ResolveClose {
            window_id,
            instance_serial,
            decision,
        } => {
            let pending = state.window(&window_id).is_some_and(|w| {
                w.instance_serial == instance_serial
                    && w.close_phase == ClosePhase::PendingCloseConfirmation
            });
            if !pending {
                return Ok(effects);
            }
            match decision {
                CloseDecision::Allow => {
                    remove_window(state, interaction, &window_id)?;
                    effects.push(RuntimeEffect::WindowClosed(window_id));
                    effects.push(RuntimeEffect::PlaySound(SoundCue::Close));
                }
                CloseDecision::Deny => {
                    find_window_mut(state, &window_id)?.close_phase = ClosePhase::Open;
                }
            }
        }
        DesktopAction::CloseAll => {
            interaction.dragging = None;
            interaction.resizing = None;
            let closed: Vec<WindowId> = state.windows.drain(..).map(|w| w.id).collect();
            if !closed.is_empty() {
                effects.extend(closed.into_iter().map(RuntimeEffect::WindowClosed));
                effects.push(RuntimeEffect::PlaySound(SoundCue::Close));
            }
            state.start_menu_open = false;
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let window = find_window_mut(state, &window_id)?;
            let was_minimized = window.is_minimized;
            window.is_minimized = true;
            window.is_active = false;
            normalize_window_stack(state);
            if !was_minimized {
                effects.push(RuntimeEffect::PlaySound(SoundCue::Minimize));
            }
        }
        DesktopAction::MinimizeAll => {
            for window in &mut state.windows {
                window.is_minimized = true;
                window.is_active = false;
            }
            normalize_window_stack(state);
            state.start_menu_open = false;
        }
        DesktopAction::ToggleMaximize { window_id } => {
            let viewport = state.viewport;
            let window = find_window_mut(state, &window_id)?;
            if window.is_maximized {
                if let Some(snapshot) = window.restore_geometry.take() {
                    window.geometry = snapshot;
                }
                window.is_maximized = false;
                effects.push(RuntimeEffect::PlaySound(SoundCue::Restore));
            } else if window.layout.can_maximize {
                window.restore_geometry = Some(window.geometry);
                window.geometry = maximized_geometry(viewport, env.config.taskbar_height);
                window.is_maximized = true;
                effects.push(RuntimeEffect::PlaySound(SoundCue::Maximize));
            } else {
                return Ok(effects);
            }
            focus_window_internal(state, &window_id);
        }
        DesktopAction::RestoreWindow { window_id } => {
            let window = find_window_mut(state, &window_id)?;
            if window.is_minimized {
                window.is_minimized = false;
                effects.push(RuntimeEffect::PlaySound(SoundCue::Restore));
            } else if window.is_maximized {
                if let Some(snapshot) = window.restore_geometry.take() {
                    window.geometry = snapshot;
                }
                window.is_maximized = false;
                effects.push(RuntimeEffect::PlaySound(SoundCue::Restore));
            }
            focus_window_internal(state, &window_id);
        }
        DesktopAction::FocusWindow { window_id } => {
            if !focus_window_internal(state, &window_id) {
                return Err(ReducerError::WindowNotFound(window_id));
            }
            state.start_menu_open = false;
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let window = state
                .window(&window_id)
                .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
            let action = if window.is_minimized {
                DesktopAction::RestoreWindow { window_id }
            } else if window.is_active {
                DesktopAction::MinimizeWindow { window_id }
            } else {
                DesktopAction::FocusWindow { window_id }
            };
            effects.extend(reduce_desktop(state, interaction, env, action)?);
        }
        DesktopAction::ToggleStartMenu => {
            state.start_menu_open = !state.start_menu_open;
        }
        DesktopAction::CloseStartMenu => {
            state.start_menu_open = false;
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let window = state
                .window(&window_id)
                .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
            let geometry_start = window.geometry;
            let maximized = window.is_maximized;
            focus_window_internal(state, &window_id);
            interaction.dragging = (!maximized).then_some(DragSession {
                window_id,
                pointer_start: pointer,
                geometry_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            let session = interaction
                .dragging
                .as_ref()
                .ok_or(ReducerError::NoActiveGesture)?;
            let dx = pointer.x.saturating_sub(session.pointer_start.x);
            let dy = pointer.y.saturating_sub(session.pointer_start.y);
            let moved = clamp_position(
                session.geometry_start.offset(dx, dy),
                state.viewport,
                env.config.taskbar_height,
            );
            let window = find_window_mut(state, &session.window_id)?;
            if !window.is_maximized {
                window.geometry = moved;
            }
        }
        DesktopAction::EndMove => {
            let session = interaction
                .dragging
                .take()
                .ok_or(ReducerError::NoActiveGesture)?;
            if record_restored_geometry(state, &session.window_id) {
                effects.push(RuntimeEffect::PersistGeometry);
            }
        }
        DesktopAction::BeginResize {
            window_id,
            pointer,
            measured,
        } => {
            let window = state
                .window(&window_id)
                .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
            let size_start = window
                .geometry
                .size()
                .or(measured)
                .unwrap_or(env.config.default_size);
            let session = (!window.is_maximized).then(|| ResizeSession {
                window_id: window_id.clone(),
                pointer_start: pointer,
                size_start,
                min_size: min_size(&window.layout, env.config),
                aspect_ratio: locked_aspect_ratio(&window.layout, size_start),
            });
            focus_window_internal(state, &window_id);
            interaction.resizing = session;
        }
        DesktopAction::UpdateResize { pointer } => {
            let session = interaction
                .resizing
                .as_ref()
                .ok_or(ReducerError::NoActiveGesture)?;
            let size = resize_size(
                session.size_start,
                pointer.x.saturating_sub(session.pointer_start.x),
                pointer.y.saturating_sub(session.pointer_start.y),
                session.min_size,
                session.aspect_ratio,
            );
            let window = find_window_mut(state, &session.window_id)?;
            if !window.is_maximized {
                window.geometry = window.geometry.with_size(size);
            }
        }
        DesktopAction::EndResize => {
            let session = interaction
                .resizing
                .take()
                .ok_or(ReducerError::NoActiveGesture)?;
            if record_restored_geometry(state, &session.window_id) {
                effects.push(RuntimeEffect::PersistGeometry);
            }
        }
        DesktopAction::MoveWindow {
            window_id,
            position,
        } => {
            let viewport = state.viewport;
            let window = find_window_mut(state, &window_id)?;
            if window.is_maximized {
                return Ok(effects);
            }
            window.geometry = clamp_position(
                window.geometry.with_position(position),
                viewport,
                env.config.taskbar_height,
            );
            record_geometry(state, &window_id);
            effects.push(RuntimeEffect::PersistGeometry);
        }
        DesktopAction::ResizeWindow { window_id, size } => {
            let window = find_window_mut(state, &window_id)?;
            if window.is_maximized {
                return Ok(effects);
            }
            let size = clamp_size(size, min_size(&window.layout, env.config));
            window.geometry = window.geometry.with_size(size);
            record_geometry(state, &window_id);
            effects.push(RuntimeEffect::PersistGeometry);
        }
        DesktopAction::ViewportResized { viewport } => {
            state.viewport = viewport;
            let taskbar_height = env.config.taskbar_height;
            let mut nudged = Vec::new();
            for window in &mut state.windows {
                if window.is_maximized {
                    window.geometry = maximized_geometry(viewport, taskbar_height);
                    window.restore_geometry = window
                        .restore_geometry
                        .map(|snapshot| clamp_position(snapshot, viewport, taskbar_height));
                    continue;
                }
                let clamped = clamp_position(window.geometry, viewport, taskbar_height);
                if clamped != window.geometry {
                    window.geometry = clamped;
                    nudged.push((window.id.clone(), clamped));
                }
            }
            if !nudged.is_empty() {
                for (window_id, geometry) in &nudged {
                    state.geometry.insert(window_id, *geometry);
                }
                effects.push(RuntimeEffect::PersistGeometry);
            }
        }
        DesktopAction::SetWallpaper { wallpaper } => {
            state.wallpaper = wallpaper;
            state.start_menu_open = false;
            effects.push(RuntimeEffect::PersistWallpaper);
        }
        DesktopAction::SetVolume { level } => {
            state.volume = level;
            effects.push(RuntimeEffect::PersistVolume);
        }
        DesktopAction::SetAnimationsEnabled { enabled } => {
            state.animations_enabled = enabled;
        }
        DesktopAction::HydrateGeometry { record } => {
            state.geometry = record;
        }
        DesktopAction::HydratePreferences { wallpaper, volume } => {
            if let Some(wallpaper) = wallpaper {
                state.wallpaper = wallpaper;
            }
            if let Some(volume) = volume {
                state.volume = volume;
            }
        }
        DesktopAction::BootComplete { open_welcome } => {
            if state.boot_phase == BootPhase::Ready {
                return Ok(effects);
            }
            state.boot_phase = BootPhase::Ready;
            effects.push(RuntimeEffect::PlaySound(SoundCue::Startup));
            let welcome = env
                .config
                .welcome_window_id
                .clone()
                .filter(|id| open_welcome && env.registry.definition(id).is_some());
            if let Some(window_id) = welcome {
                effects.extend(reduce_desktop(
                    state,
                    interaction,
                    env,
                    DesktopAction::OpenWindow { window_id },
                )?);
            }
        }
    }
    Ok(effects)
}

fn find_window_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &WindowId,
) -> Result<&'a mut WindowInstance, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| &w.id == window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))
}

/// Focuses an open window, un-minimizing it. Emits a restore cue if it was minimized.
fn reopen_window(
    state: &mut DesktopState,
    window_id: &WindowId,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let was_minimized = state
        .window(window_id)
        .map(|w| w.is_minimized)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
    focus_window_internal(state, window_id);
    if was_minimized {
        effects.push(RuntimeEffect::PlaySound(SoundCue::Restore));
    }
    Ok(())
}

fn spawn_window(
    state: &mut DesktopState,
    config: &LayoutConfig,
    definition: &WindowDefinition,
    saved: Option<Geometry>,
    ephemeral: bool,
) {
    let geometry = initial_geometry(
        definition,
        saved,
        state.windows.len(),
        state.viewport,
        config,
    );
    let instance_serial = state.next_instance_serial;
    state.next_instance_serial += 1;
    state.windows.push(WindowInstance {
        id: definition.id.clone(),
        instance_serial,
        title: definition.title.clone(),
        icon: definition.icon,
        geometry,
        restore_geometry: None,
        z_index: 0,
        is_active: false,
        is_minimized: false,
        is_maximized: false,
        close_phase: ClosePhase::Open,
        ephemeral,
        layout: definition.layout.clone(),
        content: definition.content.clone(),
    });
    focus_window_internal(state, &definition.id);
}

fn remove_window(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: &WindowId,
) -> Result<(), ReducerError> {
    let index = state
        .windows
        .iter()
        .position(|w| &w.id == window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
    state.windows.remove(index);
    if interaction
        .dragging
        .as_ref()
        .is_some_and(|s| &s.window_id == window_id)
    {
        interaction.dragging = None;
    }
    if interaction
        .resizing
        .as_ref()
        .is_some_and(|s| &s.window_id == window_id)
    {
        interaction.resizing = None;
    }
    normalize_window_stack(state);
    Ok(())
}

/// Records geometry at the end of a gesture. Maximized windows are skipped, since their
/// real placement lives in the restore snapshot.
fn record_restored_geometry(state: &mut DesktopState, window_id: &WindowId) -> bool {
    match state.window(window_id) {
        Some(window) if !window.is_maximized => record_geometry(state, window_id),
        _ => false,
    }
}

/// Copies a window's current geometry into the record. Returns `false` if it is not open.
fn record_geometry(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(geometry) = state.window(window_id).map(|w| w.geometry) else {
        return false;
    };
    state.geometry.insert(window_id, geometry);
    true
}
