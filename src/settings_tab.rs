use std::cell::RefCell;

use crate::settings::{
    Settings, SettingsError, SettingsStore, DEFAULT_CODE_BINARY_PATH, DEFAULT_GVIM_BINARY_PATH,
};

pub const TITLE: &str = "Open In Editor";

/// One labelled text input bound to a persisted key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSetting {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub value: String,
}

/// Rendering primitives the host provides for a settings page.
pub trait SettingsUi {
    fn heading(&mut self, text: &str);

    /// Edits are reported back through [`SettingsTab::on_change`].
    fn text(&mut self, setting: TextSetting);
}

pub struct SettingsTab<'a> {
    settings: &'a RefCell<Settings>,
    store: &'a dyn SettingsStore,
}

impl<'a> SettingsTab<'a> {
    pub fn new(settings: &'a RefCell<Settings>, store: &'a dyn SettingsStore) -> Self {
        Self { settings, store }
    }

    pub fn display(&self, ui: &mut dyn SettingsUi) {
        let settings = self.settings.borrow();
        ui.heading(TITLE);
        ui.text(TextSetting {
            key: "codeBinaryPath",
            name: "VSCode binary path",
            description: "Absolute path to `code` on your system",
            placeholder: DEFAULT_CODE_BINARY_PATH,
            value: settings.code_binary_path.clone(),
        });
        ui.text(TextSetting {
            key: "gvimBinaryPath",
            name: "gVim binary path",
            description: "Absolute path to `gvim` on your system",
            placeholder: DEFAULT_GVIM_BINARY_PATH,
            value: settings.gvim_binary_path.clone(),
        });
    }

    /// Applies an edit and persists the whole record.
    pub fn on_change(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        log::debug!("setting {key} changed to {value:?}");
        self.settings.borrow_mut().set(key, value)?;
        self.store.save(&self.settings.borrow())
    }
}
