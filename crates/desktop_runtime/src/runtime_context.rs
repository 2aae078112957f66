//! Runtime provider and context wiring for the desktop shell.
//!
//! [`DesktopProvider`] owns the [`DesktopSession`] for the lifetime of the desktop view, mirrors
//! session state into a signal for rendering, and forwards browser viewport changes.

use std::rc::Rc;

use desktop_app_contract::AppServices;
use leptos::*;

use crate::{
    boot::BootFlags,
    config::LayoutConfig,
    host::DesktopHostContext,
    model::DesktopState,
    reducer::DesktopAction,
    registry::WindowRegistry,
    session::DesktopSession,
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop state and driving the session.
pub struct DesktopRuntimeContext {
    /// Session controller shared with hosted apps.
    pub session: StoredValue<Rc<DesktopSession>>,
    /// Reactive mirror of the session state, updated after every applied transition.
    pub state: RwSignal<DesktopState>,
}

impl DesktopRuntimeContext {
    pub fn session(&self) -> Rc<DesktopSession> {
        self.session.get_value()
    }

    /// Dispatches `action` on the session without waiting for its effects.
    pub fn dispatch_action(&self, action: DesktopAction) {
        let session = self.session();
        spawn_local(async move {
            session.dispatch(action).await;
        });
    }

    /// Called by the boot screen when its sequence has finished.
    pub fn finish_boot(&self) {
        let session = self.session();
        spawn_local(async move { session.finish_boot().await });
    }

    /// Capability handle for the app rendered inside `window_id`.
    pub fn app_services(&self, window_id: impl Into<String>) -> AppServices {
        self.session().app_services(window_id)
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and starts the session.
pub fn DesktopProvider(
    /// Host-supplied window catalog.
    registry: WindowRegistry,
    /// Layout overrides; defaults apply when omitted.
    #[prop(optional)]
    config: Option<LayoutConfig>,
    children: Children,
) -> impl IntoView {
    let host = DesktopHostContext::default();
    let flags = BootFlags::from_current_location();
    logging::log!(
        "desktop session starting (host: {}, flags: {:?})",
        host.host_strategy_name(),
        flags
    );

    let session = Rc::new(DesktopSession::new(
        registry,
        config.unwrap_or_default(),
        &host,
        flags,
    ));
    let state = create_rw_signal(session.state());
    session.set_observer(move |next: &DesktopState| state.set(next.clone()));

    let runtime = DesktopRuntimeContext {
        session: store_value(session.clone()),
        state,
    };
    provide_context(runtime);

    {
        let session = session.clone();
        let viewport = host.viewport();
        spawn_local(async move { session.start(viewport).await });
    }

    let resize_listener = window_event_listener(ev::resize, move |_| {
        runtime.dispatch_action(DesktopAction::ViewportResized {
            viewport: host.viewport(),
        });
    });
    on_cleanup(move || {
        resize_listener.remove();
        session.dispose();
    });

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
