use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::rc::Rc;

use open_in_editor::shell::OnComplete;
use open_in_editor::{
    ActiveFile, CommandCallback, CommandRegistry, Completion, HostServices, JsonFileStore,
    OpenInEditorPlugin, Platform, SettingsStore, ShellRunner, Workspace,
};

struct Vault {
    active: Option<&'static str>,
}

impl Workspace for Vault {
    fn active_file(&self) -> Option<ActiveFile> {
        self.active.map(ActiveFile::new)
    }

    fn vault_root(&self) -> String {
        "/vault".into()
    }

    fn platform(&self) -> Platform {
        Platform::Unix
    }
}

#[derive(Default)]
struct RecordingShell {
    submitted: RefCell<Vec<String>>,
}

impl ShellRunner for RecordingShell {
    fn submit(&self, command: String, on_complete: OnComplete) {
        self.submitted.borrow_mut().push(command.clone());
        on_complete(Completion {
            command,
            error: None,
            stdout: String::new(),
            stderr: String::new(),
        });
    }
}

#[derive(Default)]
struct Palette {
    commands: BTreeMap<String, CommandCallback>,
}

impl CommandRegistry for Palette {
    fn add_command(&mut self, id: &str, _name: &str, callback: CommandCallback) {
        self.commands.insert(id.to_string(), callback);
    }
}

fn activate(
    store: JsonFileStore,
    active: Option<&'static str>,
) -> (OpenInEditorPlugin, Palette, Rc<RecordingShell>) {
    let shell = Rc::new(RecordingShell::default());
    let mut palette = Palette::default();
    let mut plugin = OpenInEditorPlugin::new(Box::new(store));
    plugin
        .activate(
            HostServices {
                workspace: Rc::new(Vault { active }),
                shell: shell.clone(),
                notifier: None,
            },
            &mut palette,
        )
        .unwrap();
    (plugin, palette, shell)
}

#[test]
fn saved_partial_settings_drive_the_launch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, r#"{"codeBinaryPath": "/bin/code", "pluginVersion": 3}"#).unwrap();

    let (plugin, palette, shell) = activate(JsonFileStore::new(&path), Some("notes/a.md"));
    (palette.commands["open-in-other-editor-vscode"])();
    (palette.commands["open-in-other-editor-gvim"])();

    assert_eq!(
        *shell.submitted.borrow(),
        vec![
            r#"/bin/code "/vault/notes/a.md""#,
            r#"/usr/local/bin/gvim "/vault/notes/a.md""#,
        ]
    );
    assert_eq!(plugin.settings().gvim_binary_path, "/usr/local/bin/gvim");
}

#[test]
fn settings_edit_round_trips_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data.json");

    let (plugin, _palette, _shell) = activate(JsonFileStore::new(&path), None);
    plugin
        .settings_tab()
        .on_change("gvimBinaryPath", "/opt/homebrew/bin/gvim")
        .unwrap();
    drop(plugin);

    let (reloaded, _palette, _shell) = activate(JsonFileStore::new(&path), None);
    assert_eq!(reloaded.settings().gvim_binary_path, "/opt/homebrew/bin/gvim");

    let saved = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(saved.gvim_binary_path.as_deref(), Some("/opt/homebrew/bin/gvim"));
}

#[test]
fn unknown_keys_survive_an_edit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

    let (plugin, _palette, _shell) = activate(JsonFileStore::new(&path), None);
    plugin.settings_tab().on_change("codeBinaryPath", "/bin/code").unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["theme"], "dark");
    assert_eq!(json["codeBinaryPath"], "/bin/code");
}

#[test]
fn corrupt_settings_fail_activation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, "{ nope").unwrap();

    let mut plugin = OpenInEditorPlugin::new(Box::new(JsonFileStore::new(&path)));
    let result = plugin.activate(
        HostServices {
            workspace: Rc::new(Vault { active: None }),
            shell: Rc::new(RecordingShell::default()),
            notifier: None,
        },
        &mut Palette::default(),
    );

    assert!(result.is_err());
    assert!(!plugin.is_active());
}

#[test]
fn quotes_in_document_names_pass_through_unescaped() {
    let dir = tempfile::tempdir().unwrap();
    let (plugin, _palette, shell) = activate(
        JsonFileStore::new(dir.path().join("data.json")),
        Some(r#"say "hi".md"#),
    );

    plugin
        .dispatcher()
        .unwrap()
        .dispatch("open-in-other-editor-gvim");

    assert_eq!(
        *shell.submitted.borrow(),
        vec![r#"/usr/local/bin/gvim "/vault/say "hi".md""#]
    );
}

#[test]
fn deactivated_plugin_dispatches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (mut plugin, palette, shell) =
        activate(JsonFileStore::new(dir.path().join("data.json")), Some("a.md"));

    assert!(plugin.is_active());
    plugin.deactivate();
    assert!(plugin.dispatcher().is_none());

    (palette.commands["open-in-other-editor-gvim"])();
    (palette.commands["open-in-other-editor-vscode"])();
    assert!(shell.submitted.borrow().is_empty());
}

#[test]
fn edit_after_failed_activation_replaces_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, "{ nope").unwrap();

    let mut plugin = OpenInEditorPlugin::new(Box::new(JsonFileStore::new(&path)));
    let activated = plugin.activate(
        HostServices {
            workspace: Rc::new(Vault { active: None }),
            shell: Rc::new(RecordingShell::default()),
            notifier: None,
        },
        &mut Palette::default(),
    );
    assert!(activated.is_err());

    plugin.settings_tab().on_change("codeBinaryPath", "/bin/code").unwrap();

    let (reloaded, _palette, _shell) = activate(JsonFileStore::new(&path), None);
    let settings = reloaded.settings();
    assert_eq!(settings.code_binary_path, "/bin/code");
    assert_eq!(settings.gvim_binary_path, "/usr/local/bin/gvim");
}
