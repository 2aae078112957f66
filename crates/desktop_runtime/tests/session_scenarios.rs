use std::rc::Rc;

use desktop_app_contract::{close_interceptor, CloseOutcome};
use desktop_runtime::{
    config::TASKBAR_HEIGHT, persistence::GEOMETRY_KEY, BootFlags, DesktopHostContext,
    DesktopSession, Geometry, LayoutConfig, PointerPosition, Viewport, WindowId, WindowRegistry,
    WindowSize,
};
use futures::executor::block_on;
use platform_host::{MemoryPrefsStore, NoopSoundSink};
use pretty_assertions::assert_eq;

const CATALOG: &str = r#"{
    "definitions": [
        {"id": "editor", "title": "Editor", "icon": "notepad", "min_width": 200, "min_height": 150},
        {"id": "paint", "title": "Paint", "icon": "paint"},
        {"id": "resume", "title": "Resume", "icon": "document", "help_content": "How to read this."}
    ],
    "start_menu": [
        {"kind": "folder", "label": "Programs", "children": [
            {"kind": "window", "id": "editor"},
            {"kind": "window", "id": "paint"}
        ]},
        {"kind": "window", "id": "resume"}
    ],
    "desktop_icons": ["resume"]
}"#;

const DESKTOP: Viewport = Viewport::new(1280, 800);

fn boot(store: &MemoryPrefsStore, viewport: Viewport) -> Rc<DesktopSession> {
    let registry = WindowRegistry::from_json(CATALOG).expect("catalog");
    let host = DesktopHostContext::with_services(Rc::new(store.clone()), Rc::new(NoopSoundSink));
    let flags = BootFlags::from_query("?skip-boot&skip-welcome");
    let session = Rc::new(DesktopSession::new(
        registry,
        LayoutConfig::default(),
        &host,
        flags,
    ));
    block_on(session.start(viewport));
    session
}

fn geometry_of(session: &DesktopSession, id: &str) -> Geometry {
    session
        .state()
        .window(&WindowId::from(id))
        .map(|w| w.geometry)
        .expect("window open")
}

fn assert_in_bounds(session: &DesktopSession) {
    let state = session.state();
    for window in &state.windows {
        let g = window.geometry;
        assert!(g.x >= -11 && g.x <= state.viewport.width - 10, "{g:?}");
        assert!(
            g.y >= -11 && g.y <= state.viewport.height - TASKBAR_HEIGHT - 10,
            "{g:?}"
        );
    }
}

#[test]
fn first_two_windows_cascade_from_origin() {
    let session = boot(&MemoryPrefsStore::default(), DESKTOP);
    block_on(session.open_window("editor"));
    block_on(session.open_window("paint"));

    assert_eq!(geometry_of(&session, "editor"), Geometry::at(100, 50));
    assert_eq!(geometry_of(&session, "paint"), Geometry::at(130, 80));
}

#[test]
fn reopening_never_duplicates() {
    let session = boot(&MemoryPrefsStore::default(), DESKTOP);
    for _ in 0..3 {
        block_on(session.open_window("editor"));
    }
    block_on(session.minimize_window("editor"));
    block_on(session.open_window("editor"));

    let state = session.state();
    assert_eq!(state.windows.len(), 1);
    assert!(state.windows[0].is_active && !state.windows[0].is_minimized);
}

#[test]
fn at_most_one_active_window_through_mixed_sequence() {
    let session = boot(&MemoryPrefsStore::default(), DESKTOP);
    block_on(session.open_window("editor"));
    block_on(session.open_window("paint"));
    block_on(session.open_window("resume"));

    let steps = [
        ("minimize", "resume"),
        ("focus", "editor"),
        ("maximize", "paint"),
        ("taskbar", "paint"),
        ("taskbar", "resume"),
        ("minimize-all", ""),
        ("focus", "paint"),
    ];
    for (op, id) in steps {
        match op {
            "minimize" => block_on(session.minimize_window(id)),
            "focus" => block_on(session.set_active(id)),
            "maximize" => block_on(session.toggle_maximize(id)),
            "taskbar" => block_on(session.toggle_taskbar_window(id)),
            _ => block_on(session.minimize_all()),
        }
        let state = session.state();
        let active: Vec<_> = state.windows.iter().filter(|w| w.is_active).collect();
        assert!(active.len() <= 1);
        assert!(active.iter().all(|w| !w.is_minimized));
    }
}

#[test]
fn resize_below_minimum_clamps() {
    let session = boot(&MemoryPrefsStore::default(), DESKTOP);
    block_on(session.open_window("editor"));
    block_on(session.resize_window(
        "editor",
        WindowSize {
            width: 50,
            height: 50,
        },
    ));

    assert_eq!(
        geometry_of(&session, "editor").size(),
        Some(WindowSize {
            width: 200,
            height: 150
        })
    );
}

#[test]
fn maximize_restore_round_trip() {
    let session = boot(&MemoryPrefsStore::default(), DESKTOP);
    block_on(session.open_window("editor"));
    block_on(session.move_window("editor", PointerPosition { x: 5, y: 5 }));

    block_on(session.toggle_maximize("editor"));
    assert_eq!(
        geometry_of(&session, "editor"),
        Geometry::sized(0, 0, 1280, 800 - TASKBAR_HEIGHT)
    );
    block_on(session.restore_window("editor"));
    assert_eq!(geometry_of(&session, "editor"), Geometry::at(5, 5));
}

#[test]
fn vetoed_close_leaves_editor_untouched() {
    let session = boot(&MemoryPrefsStore::default(), DESKTOP);
    block_on(session.open_window("paint"));
    block_on(session.open_window("editor"));
    session.register_close_interceptor("editor", close_interceptor(|| async { false }));

    let outcome = block_on(session.close_window("editor"));

    let state = session.state();
    assert_eq!(outcome, CloseOutcome::Vetoed);
    assert!(state.is_open(&WindowId::from("editor")));
    assert_eq!(state.active_window_id(), Some(&WindowId::from("editor")));
}

#[test]
fn close_all_ignores_vetoing_interceptors() {
    let session = boot(&MemoryPrefsStore::default(), DESKTOP);
    block_on(session.open_window("editor"));
    block_on(session.open_window("paint"));
    session.register_close_interceptor("editor", close_interceptor(|| async { false }));
    session.register_close_interceptor("paint", close_interceptor(|| async { false }));

    block_on(session.close_all());
    assert!(session.state().windows.is_empty());
}

#[test]
fn viewport_shrink_nudges_window_and_persists() {
    let store = MemoryPrefsStore::default();
    let session = boot(&store, DESKTOP);
    block_on(session.open_window("editor"));
    block_on(session.move_window("editor", PointerPosition { x: 300, y: 700 }));

    block_on(session.viewport_resized(Viewport::new(800, 400)));

    let moved = geometry_of(&session, "editor");
    assert!(moved.y <= 400 - TASKBAR_HEIGHT - 10);
    assert_in_bounds(&session);
    assert_eq!(
        store.raw(GEOMETRY_KEY).as_deref(),
        Some(r#"{"editor":{"x":300,"y":360}}"#)
    );
}

#[test]
fn gestures_stay_in_bounds() {
    let session = boot(&MemoryPrefsStore::default(), Viewport::new(1024, 600));
    block_on(session.open_window("paint"));
    for (x, y) in [(-5000, -5000), (5000, 5000), (512, 300), (-20, 900)] {
        block_on(session.move_window("paint", PointerPosition { x, y }));
        assert_in_bounds(&session);
    }
}

#[test]
fn geometry_survives_reload() {
    let store = MemoryPrefsStore::default();
    {
        let session = boot(&store, DESKTOP);
        block_on(session.open_window("Editor"));
        block_on(session.open_window("editor"));
        block_on(session.move_window("editor", PointerPosition { x: 420, y: 240 }));
        block_on(session.resize_window(
            "editor",
            WindowSize {
                width: 640,
                height: 480,
            },
        ));
        session.dispose();
    }

    let reloaded = boot(&store, DESKTOP);
    block_on(reloaded.open_window("editor"));
    assert_eq!(
        geometry_of(&reloaded, "editor"),
        Geometry::sized(420, 240, 640, 480)
    );
}

#[test]
fn corrupt_store_boots_with_defaults() {
    let store = MemoryPrefsStore::default();
    store.insert_raw(GEOMETRY_KEY, "not json");
    let session = boot(&store, DESKTOP);
    block_on(session.open_window("paint"));
    assert_eq!(geometry_of(&session, "paint"), Geometry::at(100, 50));
}

#[test]
fn failing_writes_do_not_block_transitions() {
    let store = MemoryPrefsStore::default();
    store.set_reject_writes(true);
    let session = boot(&store, DESKTOP);
    block_on(session.open_window("paint"));
    block_on(session.move_window("paint", PointerPosition { x: 10, y: 10 }));

    assert_eq!(geometry_of(&session, "paint"), Geometry::at(10, 10));
    assert_eq!(store.raw(GEOMETRY_KEY), None);
}

#[test]
fn start_menu_and_desktop_icons_resolve() {
    let session = boot(&MemoryPrefsStore::default(), DESKTOP);
    let registry = session.registry();
    let menu: Vec<&str> = registry
        .start_menu_windows()
        .into_iter()
        .map(WindowId::as_str)
        .collect();
    assert_eq!(menu, vec!["editor", "paint", "resume"]);
    assert_eq!(registry.desktop_icons().len(), 1);

    block_on(session.toggle_start_menu());
    assert!(session.state().start_menu_open);
    block_on(session.open_window("paint"));
    assert!(!session.state().start_menu_open);
}
