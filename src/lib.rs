// src/lib.rs
use std::rc::Rc;

use zed_extension_api as zed;
use zed::{SlashCommand, SlashCommandOutput, Worktree, Result};

pub mod dispatcher;
pub mod editor;
pub mod launcher;
pub mod plugin;
pub mod settings;
pub mod settings_tab;
pub mod shell;
pub mod workspace;
pub mod zed_host;

pub use dispatcher::{CommandCallback, CommandRegistry, CommandSpec, Dispatcher, COMMANDS};
pub use editor::EditorKind;
pub use launcher::{LaunchOutcome, Launcher, Notifier};
pub use plugin::{HostServices, OpenInEditorPlugin};
pub use settings::{
    merge_with_defaults, JsonFileStore, PartialSettings, Settings, SettingsError, SettingsStore,
};
pub use settings_tab::{SettingsTab, SettingsUi, TextSetting};
pub use shell::{build_command, Completion, ShellError, ShellRunner, SystemShell};
pub use workspace::{join_vault_path, ActiveFile, Platform, Workspace};

struct OpenInEditorExtension;

impl zed::Extension for OpenInEditorExtension {
    fn new() -> Self {
        OpenInEditorExtension
    }

    fn run_slash_command(
        &self,
        command: SlashCommand,
        args: Vec<String>,
        worktree: Option<&Worktree>,
    ) -> Result<SlashCommandOutput> {
        // Only respond to our own slash commands
        let editor = zed_host::editor_for_slash_command(&command.name)
            .ok_or_else(|| format!("unknown slash command: {}", command.name))?;
        let worktree = worktree.ok_or("no worktree is open")?;

        let settings = zed_host::settings_from_text(
            worktree.read_text_file(zed_host::SETTINGS_FILE).ok().as_deref(),
        );
        let platform = zed_host::host_platform();
        let workspace = zed_host::ZedWorkspace {
            root: worktree.root_path(),
            active: zed_host::active_file_from_args(&args),
            platform,
        };
        let notifier = zed_host::notifier();
        let launcher = Launcher::new(
            Rc::new(workspace),
            Rc::new(zed_host::ZedShell { platform }),
            Rc::new(std::cell::RefCell::new(settings)),
        )
        .with_notifier(notifier.clone());

        let text = match launcher.open(editor) {
            LaunchOutcome::NoActiveFile => String::new(),
            LaunchOutcome::Submitted { command } => command,
        };

        let failures = notifier.take();
        if !failures.is_empty() {
            return Err(failures.join("\n"));
        }

        Ok(SlashCommandOutput {
            text,
            sections: Vec::new(),
        })
    }
}

zed::register_extension!(OpenInEditorExtension);
