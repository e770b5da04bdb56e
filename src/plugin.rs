//! Lifecycle adapter between a host application and the launcher.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::dispatcher::{CommandRegistry, Dispatcher};
use crate::launcher::{Launcher, Notifier};
use crate::settings::{merge_with_defaults, Settings, SettingsError, SettingsStore};
use crate::settings_tab::SettingsTab;
use crate::shell::ShellRunner;
use crate::workspace::Workspace;

/// Capabilities the host lends the plugin while it is active.
pub struct HostServices {
    pub workspace: Rc<dyn Workspace>,
    pub shell: Rc<dyn ShellRunner>,
    pub notifier: Option<Arc<dyn Notifier>>,
}

pub struct OpenInEditorPlugin {
    store: Box<dyn SettingsStore>,
    settings: Rc<RefCell<Settings>>,
    dispatcher: Option<Dispatcher>,
}

impl OpenInEditorPlugin {
    pub fn new(store: Box<dyn SettingsStore>) -> Self {
        Self {
            store,
            settings: Rc::new(RefCell::new(Settings::default())),
            dispatcher: None,
        }
    }

    /// Loads settings and registers the editor commands.
    pub fn activate(
        &mut self,
        host: HostServices,
        registry: &mut dyn CommandRegistry,
    ) -> Result<(), SettingsError> {
        let saved = self.store.load()?;
        *self.settings.borrow_mut() = merge_with_defaults(saved.unwrap_or_default());

        let mut launcher = Launcher::new(host.workspace, host.shell, Rc::clone(&self.settings));
        if let Some(notifier) = host.notifier {
            launcher = launcher.with_notifier(notifier);
        }
        let dispatcher = Dispatcher::new(Rc::new(launcher));
        dispatcher.register(registry);
        self.dispatcher = Some(dispatcher);

        log::debug!("open-in-editor activated");
        Ok(())
    }

    /// Disables every registered command; the host may still hold them.
    pub fn deactivate(&mut self) {
        if let Some(dispatcher) = self.dispatcher.take() {
            dispatcher.deactivate();
        }
    }

    pub fn is_active(&self) -> bool {
        self.dispatcher.is_some()
    }

    pub fn dispatcher(&self) -> Option<&Dispatcher> {
        self.dispatcher.as_ref()
    }

    pub fn settings(&self) -> Settings {
        self.settings.borrow().clone()
    }

    pub fn settings_tab(&self) -> SettingsTab<'_> {
        SettingsTab::new(&self.settings, self.store.as_ref())
    }
}
