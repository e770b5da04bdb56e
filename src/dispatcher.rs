use std::cell::Cell;
use std::rc::Rc;

use crate::editor::EditorKind;
use crate::launcher::{LaunchOutcome, Launcher};

pub type CommandCallback = Box<dyn Fn()>;

/// A user-invocable action bound to one editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub editor: EditorKind,
}

pub const COMMANDS: [CommandSpec; 2] = [
    CommandSpec {
        id: "open-in-other-editor-gvim",
        name: "Open current active file in gVim",
        editor: EditorKind::Terminal,
    },
    CommandSpec {
        id: "open-in-other-editor-vscode",
        name: "Open current active file in VScode",
        editor: EditorKind::Gui,
    },
];

pub fn command_for(editor: EditorKind) -> &'static CommandSpec {
    match editor {
        EditorKind::Terminal => &COMMANDS[0],
        EditorKind::Gui => &COMMANDS[1],
    }
}

/// Host facility that surfaces commands to the user (e.g. a command palette).
pub trait CommandRegistry {
    fn add_command(&mut self, id: &str, name: &str, callback: CommandCallback);
}

/// Binds the command table to a launcher.
///
/// Registered callbacks outlive the dispatcher inside the host's registry,
/// so they share an `active` flag and turn into no-ops after [`deactivate`].
///
/// [`deactivate`]: Dispatcher::deactivate
pub struct Dispatcher {
    launcher: Rc<Launcher>,
    active: Rc<Cell<bool>>,
}

impl Dispatcher {
    pub fn new(launcher: Rc<Launcher>) -> Self {
        Self {
            launcher,
            active: Rc::new(Cell::new(true)),
        }
    }

    pub fn register(&self, registry: &mut dyn CommandRegistry) {
        for spec in COMMANDS {
            let launcher = Rc::clone(&self.launcher);
            let active = Rc::clone(&self.active);
            registry.add_command(
                spec.id,
                spec.name,
                Box::new(move || {
                    if !active.get() {
                        log::debug!("ignoring {}, plugin is not active", spec.id);
                        return;
                    }
                    launcher.open(spec.editor);
                }),
            );
        }
    }

    /// Runs the command registered under `id`, for hosts that route by id.
    pub fn dispatch(&self, id: &str) -> Option<LaunchOutcome> {
        if !self.active.get() {
            return None;
        }
        COMMANDS
            .iter()
            .find(|spec| spec.id == id)
            .map(|spec| self.launcher.open(spec.editor))
    }

    pub fn deactivate(&self) {
        self.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}
