//! What a launch writes to the log. Kept in its own test binary because it
//! installs the global logger; records are filtered by thread so tests can
//! run in parallel.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

use log::{Level, Log, Metadata, Record};
use open_in_editor::{
    ActiveFile, Completion, EditorKind, LaunchOutcome, Launcher, Platform, Settings, ShellError,
    ShellRunner, Workspace,
};
use open_in_editor::shell::OnComplete;

struct CapturingLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records.lock().unwrap().push((
            thread::current().id(),
            record.level(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};

fn install_logger() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
    });
}

fn records_at(level: Level) -> Vec<String> {
    let me = thread::current().id();
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(thread, l, _)| *thread == me && *l == level)
        .map(|(_, _, message)| message.clone())
        .collect()
}

struct EmptyWorkspace;

impl Workspace for EmptyWorkspace {
    fn active_file(&self) -> Option<ActiveFile> {
        None
    }

    fn vault_root(&self) -> String {
        "/vault".into()
    }
}

#[derive(Default)]
struct CountingShell {
    calls: RefCell<usize>,
}

impl ShellRunner for CountingShell {
    fn submit(&self, command: String, on_complete: OnComplete) {
        *self.calls.borrow_mut() += 1;
        on_complete(Completion {
            command,
            error: None,
            stdout: String::new(),
            stderr: String::new(),
        });
    }
}

#[test]
fn no_active_file_logs_one_warning_and_spawns_nothing() {
    install_logger();

    let shell = Rc::new(CountingShell::default());
    let launcher = Launcher::new(
        Rc::new(EmptyWorkspace),
        shell.clone(),
        Rc::new(RefCell::new(Settings::default())),
    );

    for editor in EditorKind::ALL {
        assert_eq!(launcher.open(editor), LaunchOutcome::NoActiveFile);
    }

    assert_eq!(*shell.calls.borrow(), 0);
    assert_eq!(
        records_at(Level::Warn),
        vec!["no active file in workspace", "no active file in workspace"]
    );
}

struct OpenNote;

impl Workspace for OpenNote {
    fn active_file(&self) -> Option<ActiveFile> {
        Some(ActiveFile::new("notes/a.md"))
    }

    fn vault_root(&self) -> String {
        "/vault".into()
    }

    fn platform(&self) -> Platform {
        Platform::Unix
    }
}

/// Behaves like a shell that could not be started at all.
struct MissingShell;

impl ShellRunner for MissingShell {
    fn submit(&self, command: String, on_complete: OnComplete) {
        on_complete(Completion {
            command,
            error: Some(ShellError::Spawn(io::Error::new(
                io::ErrorKind::NotFound,
                "/bin/sh not found",
            ))),
            stdout: String::new(),
            stderr: String::new(),
        });
    }
}

#[test]
fn spawn_failure_is_logged_with_the_command() {
    install_logger();

    let launcher = Launcher::new(
        Rc::new(OpenNote),
        Rc::new(MissingShell),
        Rc::new(RefCell::new(Settings::default())),
    );
    launcher.open(EditorKind::Terminal);

    let errors = records_at(Level::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("failed to start shell: /bin/sh not found"));
    assert!(errors[0].contains(r#"/usr/local/bin/gvim "/vault/notes/a.md""#));
    assert!(records_at(Level::Info).is_empty());
}

#[test]
fn success_is_logged_with_the_command() {
    install_logger();

    let launcher = Launcher::new(
        Rc::new(OpenNote),
        Rc::new(CountingShell::default()),
        Rc::new(RefCell::new(Settings::default())),
    );
    launcher.open(EditorKind::Terminal);

    assert_eq!(
        records_at(Level::Info),
        vec![r#"run cmd output: /usr/local/bin/gvim "/vault/notes/a.md""#]
    );
    assert!(records_at(Level::Error).is_empty());
}
