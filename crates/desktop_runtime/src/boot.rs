//! Query-string boot flags read once when the session starts.

use serde::{Deserialize, Serialize};

/// Switches that shorten the boot sequence, mainly for returning visitors and automated runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootFlags {
    /// Go straight to the desktop without the boot screen.
    pub skip_boot: bool,
    /// Do not open the welcome window after boot.
    pub skip_welcome: bool,
    /// Disable window entrance animations.
    pub skip_animations: bool,
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "" | "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

impl BootFlags {
    /// Parses flags from a `?key=value&...` query string.
    ///
    /// A bare key (`?skip-boot`) enables the flag. Unrecognised values leave it unchanged.
    pub fn from_query(query: &str) -> Self {
        let mut flags = Self::default();
        for pair in query
            .trim_start_matches('?')
            .split('&')
            .filter(|part| !part.is_empty())
        {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let Some(enabled) = parse_flag(value) else {
                continue;
            };
            match key {
                "skip-boot" => flags.skip_boot = enabled,
                "skip-welcome" => flags.skip_welcome = enabled,
                "skip-animations" => flags.skip_animations = enabled,
                _ => {}
            }
        }
        flags
    }

    /// Reads flags from the current page URL; all off outside the browser.
    pub fn from_current_location() -> Self {
        Self::from_query(&platform_host_web::current_query_string())
    }
}
