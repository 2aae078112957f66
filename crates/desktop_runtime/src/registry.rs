//! Static catalog of openable windows, start-menu tree, and desktop shortcuts.
//!
//! The host builds the catalog (in code or from JSON) and hands it to the session; the window
//! manager only ever reads it.

use std::collections::BTreeSet;

use desktop_app_contract::{AvailableApp, IconKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{LayoutHints, WindowDefinition, WindowId};

const HELP_WINDOW_SUFFIX: &str = "-help";
const HELP_WINDOW_WIDTH: i32 = 420;
const HELP_WINDOW_HEIGHT: i32 = 320;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StartMenuEntry {
    Window {
        id: WindowId,
    },
    Folder {
        label: String,
        #[serde(default = "folder_icon", with = "crate::icons::icon_name")]
        icon: IconKind,
        #[serde(default)]
        children: Vec<StartMenuEntry>,
    },
    Separator,
}

fn folder_icon() -> IconKind {
    IconKind::Folder
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("window catalog is malformed: {0}")]
    Malformed(String),
    #[error("window id `{0}` is defined more than once")]
    DuplicateId(String),
    #[error("`{0}` is referenced but has no definition")]
    UnknownReference(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowRegistry {
    definitions: Vec<WindowDefinition>,
    #[serde(default)]
    start_menu: Vec<StartMenuEntry>,
    #[serde(default)]
    desktop_icons: Vec<WindowId>,
}

impl WindowRegistry {
    pub fn new(definitions: Vec<WindowDefinition>) -> Self {
        Self {
            definitions,
            start_menu: Vec::new(),
            desktop_icons: Vec::new(),
        }
    }

    pub fn with_start_menu(mut self, start_menu: Vec<StartMenuEntry>) -> Self {
        self.start_menu = start_menu;
        self
    }

    pub fn with_desktop_icons(mut self, desktop_icons: Vec<WindowId>) -> Self {
        self.desktop_icons = desktop_icons;
        self
    }

    /// Parses and validates a JSON window catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] for malformed JSON, duplicate ids, or menu/desktop entries
    /// that reference an undefined window.
    pub fn from_json(raw: &str) -> Result<Self, RegistryError> {
        let registry: Self =
            serde_json::from_str(raw).map_err(|e| RegistryError::Malformed(e.to_string()))?;
        registry.validate()?;
        Ok(registry)
    }

    /// Checks id uniqueness and that every menu/desktop reference resolves.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut seen = BTreeSet::new();
        for definition in &self.definitions {
            if !seen.insert(definition.id.geometry_key()) {
                return Err(RegistryError::DuplicateId(definition.id.0.clone()));
            }
        }

        let mut references: Vec<&WindowId> = self.desktop_icons.iter().collect();
        collect_menu_windows(&self.start_menu, &mut references);
        match references.into_iter().find(|id| self.definition(id).is_none()) {
            Some(missing) => Err(RegistryError::UnknownReference(missing.0.clone())),
            None => Ok(()),
        }
    }

    pub fn definition(&self, window_id: &WindowId) -> Option<&WindowDefinition> {
        self.definitions.iter().find(|d| &d.id == window_id)
    }

    pub fn definitions(&self) -> &[WindowDefinition] {
        &self.definitions
    }

    pub fn start_menu(&self) -> &[StartMenuEntry] {
        &self.start_menu
    }

    /// Window ids reachable from the start menu, depth first.
    pub fn start_menu_windows(&self) -> Vec<&WindowId> {
        let mut out = Vec::new();
        collect_menu_windows(&self.start_menu, &mut out);
        out
    }

    pub fn desktop_icons(&self) -> Vec<&WindowDefinition> {
        self.desktop_icons
            .iter()
            .filter_map(|id| self.definition(id))
            .collect()
    }

    pub fn available_apps(&self) -> Vec<AvailableApp> {
        self.definitions
            .iter()
            .map(|d| AvailableApp {
                id: d.id.0.clone(),
                title: d.title.clone(),
                icon: d.icon,
            })
            .collect()
    }

    /// Builds the ephemeral help window for `window_id`, when its definition carries help.
    pub fn help_definition(&self, window_id: &WindowId) -> Option<WindowDefinition> {
        let definition = self.definition(window_id)?;
        let help = definition.help_content.clone()?;
        Some(WindowDefinition {
            id: WindowId(format!("{}{HELP_WINDOW_SUFFIX}", definition.id.0)),
            title: format!("{} Help", definition.title),
            icon: IconKind::Help,
            content: help,
            help_content: None,
            layout: LayoutHints {
                can_maximize: false,
                width: Some(HELP_WINDOW_WIDTH),
                height: Some(HELP_WINDOW_HEIGHT),
                ..LayoutHints::default()
            },
        })
    }
}

fn collect_menu_windows<'a>(entries: &'a [StartMenuEntry], out: &mut Vec<&'a WindowId>) {
    for entry in entries {
        match entry {
            StartMenuEntry::Window { id } => out.push(id),
            StartMenuEntry::Folder { children, .. } => collect_menu_windows(children, out),
            StartMenuEntry::Separator => {}
        }
    }
}
