//! Browser environment queries: page query string and viewport size.

/// Viewport size used when the browser window cannot be queried.
pub const FALLBACK_VIEWPORT: (i32, i32) = (1024, 768);

/// Returns the current page query string (including the leading `?`), or an empty string.
pub fn current_query_string() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}

/// Returns the browser window's inner `(width, height)` in CSS pixels.
pub fn viewport_size() -> (i32, i32) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return FALLBACK_VIEWPORT;
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .map(|value| value as i32)
            .unwrap_or(FALLBACK_VIEWPORT.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .map(|value| value as i32)
            .unwrap_or(FALLBACK_VIEWPORT.1);
        (width, height)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        FALLBACK_VIEWPORT
    }
}
