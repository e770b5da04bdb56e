//! Building and running the editor launch command through the OS shell.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::workspace::Platform;

/// Builds the shell command line that opens `file_path` with `program`.
///
/// The path is wrapped in double quotes and nothing else is escaped, so a
/// quote or shell metacharacter in either argument reaches the shell as is.
pub fn build_command(platform: Platform, program: &str, file_path: &str) -> String {
    match platform {
        // The shell may start on a different drive than the binary or file.
        Platform::Windows => format!("cd /d && {program} \"{file_path}\""),
        Platform::Unix => format!("{program} \"{file_path}\""),
    }
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to start shell: {0}")]
    Spawn(#[from] io::Error),

    #[error("command exited with status {0}")]
    Exit(i32),

    #[error("command terminated by signal")]
    Terminated,

    #[error("{0}")]
    Host(String),
}

/// Result of one shell execution, delivered to the completion callback.
#[derive(Debug)]
pub struct Completion {
    pub command: String,
    pub error: Option<ShellError>,
    pub stdout: String,
    pub stderr: String,
}

impl Completion {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    fn spawn_failed(command: String, err: io::Error) -> Self {
        Self {
            command,
            error: Some(ShellError::Spawn(err)),
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

pub type OnComplete = Box<dyn FnOnce(Completion) + Send + 'static>;

/// Asynchronous execution of a command line by the OS shell.
pub trait ShellRunner {
    /// Starts `command` and returns without waiting for it. `on_complete`
    /// runs once the shell has exited or failed to start.
    fn submit(&self, command: String, on_complete: OnComplete);
}

/// Runs commands with `/bin/sh -c` (Unix) or `%ComSpec% /d /s /c` (Windows).
///
/// Each child is reaped on its own thread which then calls the completion
/// callback. The handles are kept only so a short-lived host can [`wait`]
/// before exiting.
///
/// [`wait`]: SystemShell::wait
#[derive(Debug, Default)]
pub struct SystemShell {
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl SystemShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until every submitted command has completed.
    pub fn wait(&self) {
        let handles = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for handle in handles {
            if handle.join().is_err() {
                log::error!("shell completion thread panicked");
            }
        }
    }

    fn track(&self, handle: JoinHandle<()>) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(handle),
            Err(poisoned) => poisoned.into_inner().push(handle),
        }
    }
}

impl ShellRunner for SystemShell {
    fn submit(&self, command: String, on_complete: OnComplete) {
        let child = match shell_command(&command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                on_complete(Completion::spawn_failed(command, err));
                return;
            }
        };

        let spawned = thread::Builder::new()
            .name("open-in-editor-shell".into())
            .spawn(move || on_complete(collect(command, child)));
        match spawned {
            Ok(handle) => self.track(handle),
            Err(err) => log::error!("failed to start completion thread: {err}"),
        }
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let comspec = std::env::var_os("ComSpec").unwrap_or_else(|| "cmd.exe".into());
    let mut cmd = Command::new(comspec);
    cmd.args(["/d", "/s", "/c"]).raw_arg(format!("\"{command}\""));
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(command);
    cmd
}

fn collect(command: String, mut child: Child) -> Completion {
    // stderr is drained on a helper thread so a chatty child cannot block on
    // a full pipe while we read stdout.
    let stderr_reader = child.stderr.take().map(|mut stderr| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            buf
        })
    });
    let mut stdout = Vec::new();
    if let Some(mut out) = child.stdout.take() {
        let _ = out.read_to_end(&mut stdout);
    }
    let stderr = stderr_reader
        .and_then(|reader| reader.join().ok())
        .unwrap_or_default();

    let error = match child.wait() {
        Ok(status) if status.success() => None,
        Ok(status) => Some(match status.code() {
            Some(code) => ShellError::Exit(code),
            None => ShellError::Terminated,
        }),
        Err(err) => Some(ShellError::Spawn(err)),
    };

    Completion {
        command,
        error,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }
}
