//! Turns "open the active document in editor X" into one shell execution.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::editor::EditorKind;
use crate::settings::Settings;
use crate::shell::{build_command, Completion, ShellRunner};
use crate::workspace::{resolve_absolute_path, Workspace};

/// Host facility for user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// What [`Launcher::open`] did. Command callbacks ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    NoActiveFile,
    Submitted { command: String },
}

pub struct Launcher {
    workspace: Rc<dyn Workspace>,
    shell: Rc<dyn ShellRunner>,
    settings: Rc<RefCell<Settings>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Launcher {
    pub fn new(
        workspace: Rc<dyn Workspace>,
        shell: Rc<dyn ShellRunner>,
        settings: Rc<RefCell<Settings>>,
    ) -> Self {
        Self {
            workspace,
            shell,
            settings,
            notifier: None,
        }
    }

    /// Only consulted when `notifyOnFailure` is set.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn open(&self, editor: EditorKind) -> LaunchOutcome {
        let Some(file) = self.workspace.active_file() else {
            warn!("no active file in workspace");
            return LaunchOutcome::NoActiveFile;
        };
        let path = resolve_absolute_path(self.workspace.as_ref(), &file);
        debug!("resolved active file to {path}");

        let (command, notify) = {
            let settings = self.settings.borrow();
            let program = settings.binary_path(editor);
            (
                build_command(self.workspace.platform(), program, &path),
                settings.notify_on_failure,
            )
        };

        let notifier = if notify { self.notifier.clone() } else { None };
        self.shell.submit(
            command.clone(),
            Box::new(move |completion| report(completion, notifier.as_deref())),
        );
        LaunchOutcome::Submitted { command }
    }
}

fn report(completion: Completion, notifier: Option<&dyn Notifier>) {
    match &completion.error {
        Some(err) => {
            error!(
                "run cmd err: {err}, command: {}, stdout: {}, stderr: {}",
                completion.command, completion.stdout, completion.stderr
            );
            if let Some(notifier) = notifier {
                notifier.notify(&format!("Failed to open file in editor: {err}"));
            }
        }
        None => info!("run cmd output: {}", completion.command),
    }
}
