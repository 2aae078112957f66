//! Desktop session controller.
//!
//! [`DesktopSession`] owns the open-window list, the in-memory geometry record, the per-window
//! close interceptors and save handlers, and the sound system. Every state change goes through
//! [`reduce_desktop`]; the session then executes the returned effects (persistence, sound,
//! handler cleanup) in order. Reducer errors stop at this boundary as logged no-ops.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use desktop_app_contract::{
    AppServices, AvailableApp, CapabilityFuture, CloseDecision, CloseInterceptor, CloseOutcome,
    DesktopCapabilities, RunningApp, SaveHandler, VolumeLevel,
};
use leptos::logging;

use crate::{
    boot::BootFlags,
    config::LayoutConfig,
    host::DesktopHostContext,
    model::{
        BootPhase, ClosePhase, DesktopState, InteractionState, PointerPosition, Viewport,
        WallpaperPreference, WindowId, WindowSize,
    },
    persistence::DesktopPersistence,
    reducer::{reduce_desktop, DesktopAction, DesktopEnv, RuntimeEffect},
    registry::WindowRegistry,
    sound::SoundSystem,
};

type StateObserver = Rc<dyn Fn(&DesktopState)>;

/// Single-threaded controller for one desktop session.
///
/// Construct it once per page, call [`DesktopSession::start`], and [`DesktopSession::dispose`]
/// when the desktop unmounts.
pub struct DesktopSession {
    registry: WindowRegistry,
    config: LayoutConfig,
    flags: BootFlags,
    state: RefCell<DesktopState>,
    interaction: RefCell<InteractionState>,
    interceptors: RefCell<HashMap<WindowId, CloseInterceptor>>,
    save_handlers: RefCell<HashMap<WindowId, SaveHandler>>,
    persistence: DesktopPersistence,
    sounds: SoundSystem,
    observer: RefCell<Option<StateObserver>>,
}

impl DesktopSession {
    pub fn new(
        registry: WindowRegistry,
        config: LayoutConfig,
        host: &DesktopHostContext,
        flags: BootFlags,
    ) -> Self {
        Self {
            registry,
            config: config.normalized(),
            flags,
            state: RefCell::new(DesktopState::default()),
            interaction: RefCell::new(InteractionState::default()),
            interceptors: RefCell::new(HashMap::new()),
            save_handlers: RefCell::new(HashMap::new()),
            persistence: DesktopPersistence::new(host.prefs_store()),
            sounds: SoundSystem::new(host.sound_sink()),
            observer: RefCell::new(None),
        }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn flags(&self) -> BootFlags {
        self.flags
    }

    /// Returns a copy of the current desktop state.
    pub fn state(&self) -> DesktopState {
        self.state.borrow().clone()
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction.borrow().clone()
    }

    /// Installs a callback invoked with the new state after every applied transition.
    pub fn set_observer(&self, observer: impl Fn(&DesktopState) + 'static) {
        *self.observer.borrow_mut() = Some(Rc::new(observer));
    }

    /// Builds the capability handle handed to the app hosted in `window_id`.
    pub fn app_services(self: &Rc<Self>, window_id: impl Into<String>) -> AppServices {
        AppServices::new(window_id, self.clone() as Rc<dyn DesktopCapabilities>)
    }

    /// Initializes sound, loads persisted geometry and preferences, and applies boot flags.
    ///
    /// With `skip_boot` the session is `Ready` when this returns; otherwise the renderer calls
    /// [`DesktopSession::finish_boot`] once its boot screen is done.
    pub async fn start(&self, viewport: Viewport) {
        self.sounds.init();
        let persisted = self.persistence.load_desktop().await;
        if let Some(record) = persisted.geometry {
            logging::log!("restored geometry for {} window(s)", record.len());
            self.dispatch(DesktopAction::HydrateGeometry { record }).await;
        }
        self.dispatch(DesktopAction::HydratePreferences {
            wallpaper: persisted.wallpaper,
            volume: persisted.volume,
        })
        .await;
        self.dispatch(DesktopAction::ViewportResized { viewport })
            .await;
        if self.flags.skip_animations {
            self.dispatch(DesktopAction::SetAnimationsEnabled { enabled: false })
                .await;
        }
        if self.flags.skip_boot {
            self.finish_boot().await;
        }
    }

    /// Leaves the boot screen and opens the welcome window unless `skip_welcome` is set.
    pub async fn finish_boot(&self) {
        if self.state.borrow().boot_phase == BootPhase::Ready {
            return;
        }
        self.dispatch(DesktopAction::BootComplete {
            open_welcome: !self.flags.skip_welcome,
        })
        .await;
        logging::log!("desktop ready");
    }

    /// Stops sound playback and drops every registered handler.
    pub fn dispose(&self) {
        self.sounds.dispose();
        self.interceptors.borrow_mut().clear();
        self.save_handlers.borrow_mut().clear();
    }

    /// Applies `action` and executes its effects. Returns `false` when the reducer rejected it.
    pub async fn dispatch(&self, action: DesktopAction) -> bool {
        let result = {
            let env = DesktopEnv {
                registry: &self.registry,
                config: &self.config,
            };
            let mut state = self.state.borrow_mut();
            let mut interaction = self.interaction.borrow_mut();
            reduce_desktop(&mut state, &mut interaction, env, action)
        };

        let effects = match result {
            Ok(effects) => effects,
            Err(err) => {
                logging::debug_warn!("desktop action ignored: {err}");
                return false;
            }
        };

        let snapshot = self.state();
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            observer(&snapshot);
        }
        self.run_effects(&snapshot, effects).await;
        true
    }

    async fn run_effects(&self, snapshot: &DesktopState, effects: Vec<RuntimeEffect>) {
        for effect in effects {
            match effect {
                RuntimeEffect::PersistGeometry => {
                    self.persistence.persist_geometry(snapshot).await
                }
                RuntimeEffect::PersistWallpaper => {
                    self.persistence.persist_wallpaper(snapshot).await
                }
                RuntimeEffect::PersistVolume => self.persistence.persist_volume(snapshot).await,
                RuntimeEffect::PlaySound(cue) => self.sounds.play(cue, snapshot.volume),
                RuntimeEffect::WindowClosed(window_id) => {
                    self.interceptors.borrow_mut().remove(&window_id);
                    self.save_handlers.borrow_mut().remove(&window_id);
                }
            }
        }
    }

    pub async fn open_window(&self, window_id: impl Into<WindowId>) {
        self.dispatch(DesktopAction::OpenWindow {
            window_id: window_id.into(),
        })
        .await;
    }

    /// Opens the help window for `window_id`. Returns `false` when it has no help content.
    pub async fn open_help(&self, window_id: impl Into<WindowId>) -> bool {
        let window_id = window_id.into();
        let Some(definition) = self.registry.help_definition(&window_id) else {
            logging::debug_warn!("no help content for `{window_id}`");
            return false;
        };
        self.dispatch(DesktopAction::OpenEphemeral { definition })
            .await
    }

    /// Closes a window, awaiting its close-interceptor when one is registered.
    ///
    /// While the interceptor decides, the window is in
    /// [`ClosePhase::PendingCloseConfirmation`] and further close requests for it report
    /// [`CloseOutcome::AlreadyPending`].
    pub async fn close_window(&self, window_id: impl Into<WindowId>) -> CloseOutcome {
        let window_id = window_id.into();
        let target = self
            .state
            .borrow()
            .window(&window_id)
            .map(|w| (w.close_phase, w.instance_serial));
        let instance_serial = match target {
            None => return CloseOutcome::NotOpen,
            Some((ClosePhase::PendingCloseConfirmation, _)) => return CloseOutcome::AlreadyPending,
            Some((ClosePhase::Open, serial)) => serial,
        };

        let interceptor = self.interceptors.borrow().get(&window_id).cloned();
        let Some(interceptor) = interceptor else {
            self.dispatch(DesktopAction::CloseWindow { window_id }).await;
            return CloseOutcome::Closed;
        };

        self.dispatch(DesktopAction::RequestClose {
            window_id: window_id.clone(),
        })
        .await;
        let decision = interceptor().await;

        let same_instance = self
            .state
            .borrow()
            .window(&window_id)
            .is_some_and(|w| w.instance_serial == instance_serial);
        if !same_instance {
            // Closed by a bulk operation while the interceptor was deciding.
            return CloseOutcome::Closed;
        }
        self.dispatch(DesktopAction::ResolveClose {
            window_id: window_id.clone(),
            instance_serial,
            decision,
        })
        .await;
        match decision {
            CloseDecision::Allow => CloseOutcome::Closed,
            CloseDecision::Deny => {
                logging::debug_warn!("close of `{window_id}` vetoed");
                CloseOutcome::Vetoed
            }
        }
    }

    /// Closes every window without consulting interceptors.
    pub async fn close_all(&self) {
        self.dispatch(DesktopAction::CloseAll).await;
    }

    pub async fn minimize_window(&self, window_id: impl Into<WindowId>) {
        self.dispatch(DesktopAction::MinimizeWindow {
            window_id: window_id.into(),
        })
        .await;
    }

    pub async fn minimize_all(&self) {
        self.dispatch(DesktopAction::MinimizeAll).await;
    }

    pub async fn toggle_maximize(&self, window_id: impl Into<WindowId>) {
        self.dispatch(DesktopAction::ToggleMaximize {
            window_id: window_id.into(),
        })
        .await;
    }

    pub async fn restore_window(&self, window_id: impl Into<WindowId>) {
        self.dispatch(DesktopAction::RestoreWindow {
            window_id: window_id.into(),
        })
        .await;
    }

    pub async fn set_active(&self, window_id: impl Into<WindowId>) {
        self.dispatch(DesktopAction::FocusWindow {
            window_id: window_id.into(),
        })
        .await;
    }

    pub async fn toggle_taskbar_window(&self, window_id: impl Into<WindowId>) {
        self.dispatch(DesktopAction::ToggleTaskbarWindow {
            window_id: window_id.into(),
        })
        .await;
    }

    pub async fn toggle_start_menu(&self) {
        self.dispatch(DesktopAction::ToggleStartMenu).await;
    }

    pub async fn close_start_menu(&self) {
        self.dispatch(DesktopAction::CloseStartMenu).await;
    }

    pub async fn move_window(&self, window_id: impl Into<WindowId>, position: PointerPosition) {
        self.dispatch(DesktopAction::MoveWindow {
            window_id: window_id.into(),
            position,
        })
        .await;
    }

    pub async fn resize_window(&self, window_id: impl Into<WindowId>, size: WindowSize) {
        self.dispatch(DesktopAction::ResizeWindow {
            window_id: window_id.into(),
            size,
        })
        .await;
    }

    pub async fn viewport_resized(&self, viewport: Viewport) {
        self.dispatch(DesktopAction::ViewportResized { viewport })
            .await;
    }

    pub async fn set_wallpaper(&self, wallpaper: WallpaperPreference) {
        self.dispatch(DesktopAction::SetWallpaper { wallpaper })
            .await;
    }

    pub fn volume(&self) -> VolumeLevel {
        self.state.borrow().volume
    }

    pub async fn set_volume(&self, level: VolumeLevel) {
        self.dispatch(DesktopAction::SetVolume { level }).await;
    }

    pub fn register_close_interceptor(
        &self,
        window_id: impl Into<WindowId>,
        interceptor: CloseInterceptor,
    ) {
        self.interceptors
            .borrow_mut()
            .insert(window_id.into(), interceptor);
    }

    pub fn unregister_close_interceptor(&self, window_id: impl Into<WindowId>) {
        self.interceptors.borrow_mut().remove(&window_id.into());
    }

    pub fn register_save_handler(&self, window_id: impl Into<WindowId>, handler: SaveHandler) {
        self.save_handlers
            .borrow_mut()
            .insert(window_id.into(), handler);
    }

    pub fn unregister_save_handler(&self, window_id: impl Into<WindowId>) {
        self.save_handlers.borrow_mut().remove(&window_id.into());
    }

    /// Runs the save handler of `window_id`. Returns `false` when none is registered.
    pub fn invoke_save(&self, window_id: impl Into<WindowId>) -> bool {
        let handler = self.save_handlers.borrow().get(&window_id.into()).cloned();
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn running_apps(&self) -> Vec<RunningApp> {
        self.state.borrow().running_apps()
    }

    pub fn available_apps(&self) -> Vec<AvailableApp> {
        self.registry.available_apps()
    }
}

impl DesktopCapabilities for DesktopSession {
    fn open_window<'a>(&'a self, window_id: &'a str) -> CapabilityFuture<'a, ()> {
        Box::pin(DesktopSession::open_window(self, window_id))
    }

    fn close_window<'a>(&'a self, window_id: &'a str) -> CapabilityFuture<'a, CloseOutcome> {
        Box::pin(DesktopSession::close_window(self, window_id))
    }

    fn register_close_interceptor(&self, window_id: &str, interceptor: CloseInterceptor) {
        DesktopSession::register_close_interceptor(self, window_id, interceptor);
    }

    fn unregister_close_interceptor(&self, window_id: &str) {
        DesktopSession::unregister_close_interceptor(self, window_id);
    }

    fn register_save_handler(&self, window_id: &str, handler: SaveHandler) {
        DesktopSession::register_save_handler(self, window_id, handler);
    }

    fn unregister_save_handler(&self, window_id: &str) {
        DesktopSession::unregister_save_handler(self, window_id);
    }

    fn volume(&self) -> VolumeLevel {
        DesktopSession::volume(self)
    }

    fn set_volume<'a>(&'a self, level: VolumeLevel) -> CapabilityFuture<'a, ()> {
        Box::pin(DesktopSession::set_volume(self, level))
    }

    fn running_apps(&self) -> Vec<RunningApp> {
        DesktopSession::running_apps(self)
    }

    fn available_apps(&self) -> Vec<AvailableApp> {
        DesktopSession::available_apps(self)
    }
}
