//! Host services backed by the Zed extension API.
//!
//! Zed does not tell extensions which buffer is focused, so the slash command
//! argument stands in for the active document.

use std::sync::{Arc, Mutex};

use zed_extension_api::{self as zed, process::Command};

use crate::editor::EditorKind;
use crate::launcher::Notifier;
use crate::settings::{merge_with_defaults, parse_partial, Settings};
use crate::shell::{Completion, OnComplete, ShellError, ShellRunner};
use crate::workspace::{ActiveFile, Platform, Workspace};

pub const SETTINGS_FILE: &str = ".zed/open-in-editor.json";

pub fn editor_for_slash_command(name: &str) -> Option<EditorKind> {
    match name {
        "open-in-gvim" => Some(EditorKind::Terminal),
        "open-in-vscode" => Some(EditorKind::Gui),
        _ => None,
    }
}

pub fn host_platform() -> Platform {
    match zed::current_platform() {
        (zed::Os::Windows, _) => Platform::Windows,
        _ => Platform::Unix,
    }
}

/// Reads worktree settings; anything unreadable falls back to the defaults.
pub fn settings_from_text(text: Option<&str>) -> Settings {
    let partial = match text.map(parse_partial) {
        Some(Ok(partial)) => partial.unwrap_or_default(),
        Some(Err(err)) => {
            log::warn!("ignoring {SETTINGS_FILE}: {err}");
            Default::default()
        }
        None => Default::default(),
    };
    merge_with_defaults(partial)
}

/// Joins slash command arguments back into the relative path they were split from.
pub fn active_file_from_args(args: &[String]) -> Option<ActiveFile> {
    let path = args.join(" ");
    let path = path.trim();
    (!path.is_empty()).then(|| ActiveFile::new(path))
}

pub struct ZedWorkspace {
    pub root: String,
    pub active: Option<ActiveFile>,
    pub platform: Platform,
}

impl Workspace for ZedWorkspace {
    fn active_file(&self) -> Option<ActiveFile> {
        self.active.clone()
    }

    fn vault_root(&self) -> String {
        self.root.clone()
    }

    fn platform(&self) -> Platform {
        self.platform
    }
}

/// Runs the command through the extension's process capability. The sandbox
/// only offers a blocking call, so completion is reported before `submit`
/// returns.
pub struct ZedShell {
    pub platform: Platform,
}

/// Argument vector that runs `command` through the platform shell.
///
/// Zed quotes each argument with the usual Windows rules before starting
/// `cmd.exe`, which would turn the quotes around the document path into
/// `\"`. So on Windows the command is split into words instead, quotes are
/// removed from each word, and re-quoting happens only where a word holds
/// whitespace, which gives back `"<path>"` for paths with spaces.
pub fn shell_invocation(platform: Platform, command: &str) -> (&'static str, Vec<String>) {
    match platform {
        Platform::Unix => ("sh", vec!["-c".to_string(), command.to_string()]),
        Platform::Windows => {
            let mut args: Vec<String> = ["/d", "/s", "/c"].map(String::from).to_vec();
            args.extend(cmd_words(command));
            ("cmd.exe", args)
        }
    }
}

/// Splits on whitespace outside double quotes and drops the quotes.
fn cmd_words(command: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut quoted = false;
    let mut in_word = false;
    for c in command.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            c => {
                word.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(word);
    }
    words
}

impl ShellRunner for ZedShell {
    fn submit(&self, command: String, on_complete: OnComplete) {
        let (program, args) = shell_invocation(self.platform, &command);
        let result = Command::new(program).args(args).output();

        let completion = match result {
            Ok(output) => Completion {
                error: match output.status {
                    Some(0) => None,
                    Some(code) => Some(ShellError::Exit(code)),
                    None => Some(ShellError::Terminated),
                },
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                command,
            },
            Err(err) => Completion {
                command,
                error: Some(ShellError::Host(err)),
                stdout: String::new(),
                stderr: String::new(),
            },
        };
        on_complete(completion);
    }
}

/// Collects notifications so they can be returned as the slash command error.
#[derive(Default)]
pub struct ZedNotifier {
    messages: Mutex<Vec<String>>,
}

impl ZedNotifier {
    pub fn take(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(mut messages) => std::mem::take(&mut *messages),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for ZedNotifier {
    fn notify(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

pub fn notifier() -> Arc<ZedNotifier> {
    Arc::new(ZedNotifier::default())
}
