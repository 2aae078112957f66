//! Icon asset lookup for the closed [`IconKind`] catalog.
//!
//! The runtime never renders icons itself; it hands renderers a stable token and an asset path.
//! Every kind resolves to an asset, with [`IconKind::Generic`] as the fallback for anything a
//! host catalog names that the shell does not know.

use desktop_app_contract::IconKind;

/// Root under which icon sprites are served.
pub const ICON_BASE_PATH: &str = "/icons";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
/// Icon sizes the retro shell ships sprites for.
pub enum IconSize {
    /// 16px (taskbar buttons, window title bars, start-menu rows).
    #[default]
    Small,
    /// 32px (desktop shortcuts, top-level start-menu entries).
    Large,
}

impl IconSize {
    pub const fn px(self) -> u16 {
        match self {
            Self::Small => 16,
            Self::Large => 32,
        }
    }
}

/// Stable token used for CSS hooks and asset names.
pub const fn icon_token(kind: IconKind) -> &'static str {
    match kind {
        IconKind::Computer => "computer",
        IconKind::Folder => "folder",
        IconKind::Document => "document",
        IconKind::Notepad => "notepad",
        IconKind::Calculator => "calculator",
        IconKind::Paint => "paint",
        IconKind::Terminal => "terminal",
        IconKind::MediaPlayer => "media-player",
        IconKind::VideoPlayer => "video-player",
        IconKind::Browser => "browser",
        IconKind::Mail => "mail",
        IconKind::Help => "help",
        IconKind::Settings => "settings",
        IconKind::RecycleBin => "recycle-bin",
        IconKind::Generic => "generic",
    }
}

/// Resolves a free-form icon name to a kind, falling back to [`IconKind::Generic`].
///
/// Accepts the canonical tokens plus a few aliases older catalogs used.
pub fn icon_kind_from_token(raw: &str) -> IconKind {
    match raw.trim().to_ascii_lowercase().as_str() {
        "computer" | "my-computer" => IconKind::Computer,
        "folder" | "explorer" => IconKind::Folder,
        "document" | "text" | "txt" => IconKind::Document,
        "notepad" => IconKind::Notepad,
        "calculator" | "calc" => IconKind::Calculator,
        "paint" => IconKind::Paint,
        "terminal" | "msdos" | "dos" => IconKind::Terminal,
        "media-player" | "winamp" | "music" => IconKind::MediaPlayer,
        "video-player" | "video" => IconKind::VideoPlayer,
        "browser" | "internet" => IconKind::Browser,
        "mail" | "email" => IconKind::Mail,
        "help" => IconKind::Help,
        "settings" | "control-panel" => IconKind::Settings,
        "recycle-bin" | "trash" => IconKind::RecycleBin,
        _ => IconKind::Generic,
    }
}

/// Serde adapter for catalog icon fields that accepts aliases as well as canonical tokens.
///
/// Use with `#[serde(with = "crate::icons::icon_name")]`.
pub mod icon_name {
    use desktop_app_contract::IconKind;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::icon_kind_from_token;

    pub fn serialize<S: Serializer>(kind: &IconKind, serializer: S) -> Result<S::Ok, S::Error> {
        kind.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<IconKind, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(icon_kind_from_token(&raw))
    }
}

/// Asset path of the sprite for `kind` at `size`.
pub fn icon_asset_path(kind: IconKind, size: IconSize) -> String {
    format!("{ICON_BASE_PATH}/{}-{}.png", icon_token(kind), size.px())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tokens_match_serde_names() {
        for kind in [
            IconKind::Computer,
            IconKind::MediaPlayer,
            IconKind::RecycleBin,
            IconKind::Generic,
        ] {
            let serialized = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(serialized, format!("\"{}\"", icon_token(kind)));
        }
    }

    #[test]
    fn aliases_and_unknown_names_resolve() {
        assert_eq!(icon_kind_from_token(" Winamp "), IconKind::MediaPlayer);
        assert_eq!(icon_kind_from_token("trash"), IconKind::RecycleBin);
        assert_eq!(icon_kind_from_token("minesweeper"), IconKind::Generic);
    }

    #[test]
    fn asset_paths_include_size() {
        assert_eq!(
            icon_asset_path(IconKind::Notepad, IconSize::Large),
            "/icons/notepad-32.png"
        );
        assert_eq!(
            icon_asset_path(IconKind::Generic, IconSize::default()),
            "/icons/generic-16.png"
        );
    }
}
