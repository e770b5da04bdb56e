//! Persisted plugin settings.
//!
//! The record is stored as a flat JSON object with camelCase keys. Loading
//! is a shallow merge over [`Settings::default`]: keys present in the saved
//! record win, missing keys inherit the default, and nested values such as
//! `editors` are replaced wholesale. Keys this crate does not know about are
//! kept in `extra` so a load/save cycle does not drop them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::editor::EditorKind;

pub const DEFAULT_CODE_BINARY_PATH: &str =
    "/Applications/Visual Studio Code.app/Contents/Resources/app/bin/code";
pub const DEFAULT_GVIM_BINARY_PATH: &str = "/usr/local/bin/gvim";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("unknown setting `{0}`")]
    UnknownKey(String),

    #[error("invalid value `{value}` for setting `{key}`")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorDescriptor {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub code_binary_path: String,
    pub gvim_binary_path: String,
    /// Persisted but not consulted when launching.
    pub editors: Vec<EditorDescriptor>,
    /// Forward shell failures to the host notifier instead of only logging them.
    pub notify_on_failure: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            code_binary_path: DEFAULT_CODE_BINARY_PATH.to_string(),
            gvim_binary_path: DEFAULT_GVIM_BINARY_PATH.to_string(),
            editors: vec![EditorDescriptor {
                name: "Visual Studio Code (vscode)".to_string(),
                path: DEFAULT_CODE_BINARY_PATH.to_string(),
            }],
            notify_on_failure: false,
            extra: Map::new(),
        }
    }
}

impl Settings {
    pub fn binary_path(&self, editor: EditorKind) -> &str {
        match editor {
            EditorKind::Terminal => &self.gvim_binary_path,
            EditorKind::Gui => &self.code_binary_path,
        }
    }

    /// Updates one field from its persisted key and a textual value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        match key {
            "codeBinaryPath" => self.code_binary_path = value.to_string(),
            "gvimBinaryPath" => self.gvim_binary_path = value.to_string(),
            "notifyOnFailure" => {
                self.notify_on_failure =
                    value.trim().parse::<bool>().map_err(|_| SettingsError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?
            }
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// A saved record that may be missing any key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSettings {
    pub code_binary_path: Option<String>,
    pub gvim_binary_path: Option<String>,
    pub editors: Option<Vec<EditorDescriptor>>,
    pub notify_on_failure: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn merge_with_defaults(partial: PartialSettings) -> Settings {
    let defaults = Settings::default();
    Settings {
        code_binary_path: partial.code_binary_path.unwrap_or(defaults.code_binary_path),
        gvim_binary_path: partial.gvim_binary_path.unwrap_or(defaults.gvim_binary_path),
        editors: partial.editors.unwrap_or(defaults.editors),
        notify_on_failure: partial.notify_on_failure.unwrap_or(defaults.notify_on_failure),
        extra: partial.extra,
    }
}

/// Parses a saved record. `null` reads as "nothing saved yet".
pub fn parse_partial(text: &str) -> Result<Option<PartialSettings>, SettingsError> {
    serde_json::from_str(text).map_err(SettingsError::Parse)
}

/// Host persistence for the settings record.
pub trait SettingsStore {
    /// `Ok(None)` on first run.
    fn load(&self) -> Result<Option<PartialSettings>, SettingsError>;

    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Stores the record as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/open-in-editor/data.json`, if the platform has a config dir.
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("open-in-editor").join("data.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<PartialSettings>, SettingsError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        parse_partial(&text)
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(settings).map_err(SettingsError::Serialize)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        log::debug!("saved settings to {}", self.path.display());
        Ok(())
    }
}
