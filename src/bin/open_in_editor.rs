// src/bin/open_in_editor.rs
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::{
    collections::BTreeMap,
    path::PathBuf,
    rc::Rc,
    sync::Arc,
};

use open_in_editor::{
    dispatcher, ActiveFile, CommandCallback, CommandRegistry, EditorKind, HostServices,
    JsonFileStore, Notifier, OpenInEditorPlugin, SettingsUi, SystemShell, TextSetting, Workspace,
};

#[derive(Parser)]
#[command(name = "open-in-editor", version, about = "Open a vault document in gVim or VS Code")]
struct Cli {
    /// Settings file (defaults to <config dir>/open-in-editor/data.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Open a document in the given editor (`gvim` or `code`)
    Open {
        editor: EditorKind,
        /// Vault root directory
        #[arg(long)]
        vault: Option<PathBuf>,
        /// Document path relative to the vault root
        #[arg(long)]
        file: Option<String>,
    },
    /// List the registered commands
    Commands,
    /// Show the settings panel, or change one value
    Settings {
        #[command(subcommand)]
        action: Option<SettingsCmd>,
    },
    /// Report whether the configured editor binaries can be found
    Check,
}

#[derive(Subcommand)]
enum SettingsCmd {
    Set { key: String, value: String },
}

struct CliWorkspace {
    vault: PathBuf,
    file: Option<String>,
}

impl Workspace for CliWorkspace {
    fn active_file(&self) -> Option<ActiveFile> {
        self.file.clone().map(ActiveFile::new)
    }

    fn vault_root(&self) -> String {
        self.vault.display().to_string()
    }
}

#[derive(Default)]
struct Palette {
    commands: BTreeMap<String, (String, CommandCallback)>,
}

impl CommandRegistry for Palette {
    fn add_command(&mut self, id: &str, name: &str, callback: CommandCallback) {
        self.commands.insert(id.to_string(), (name.to_string(), callback));
    }
}

struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("❌ {message}");
    }
}

struct TextPanel;

impl SettingsUi for TextPanel {
    fn heading(&mut self, text: &str) {
        println!("{text}\n");
    }

    fn text(&mut self, setting: TextSetting) {
        println!("{} ({})", setting.name, setting.key);
        println!("  {}", setting.description);
        println!("  value:       {}", setting.value);
        println!("  placeholder: {}\n", setting.placeholder);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let settings_path = match cli.settings {
        Some(path) => path,
        None => JsonFileStore::default_location()
            .context("no config directory on this platform, pass --settings")?,
    };
    log::debug!("using settings at {}", settings_path.display());

    let mut plugin = OpenInEditorPlugin::new(Box::new(JsonFileStore::new(settings_path)));

    let workspace = match &cli.command {
        Cmd::Open { vault, file, .. } => {
            let vault = match vault {
                Some(vault) => vault.clone(),
                None => std::env::current_dir().context("failed to read current directory")?,
            };
            let vault = dunce::canonicalize(&vault)
                .with_context(|| format!("vault {} is not accessible", vault.display()))?;
            CliWorkspace { vault, file: file.clone() }
        }
        _ => CliWorkspace { vault: PathBuf::from("."), file: None },
    };
    let shell = Rc::new(SystemShell::new());
    let mut palette = Palette::default();
    if let Err(err) = activate(&mut plugin, &mut palette, workspace, shell.clone()) {
        // `settings set` is the way out of a broken file, so it starts from defaults.
        if !matches!(cli.command, Cmd::Settings { action: Some(_) }) {
            return Err(err);
        }
        log::warn!("{err:#}; the file will be rewritten from defaults plus this change");
    }

    match cli.command {
        Cmd::Open { editor, .. } => {
            let spec = dispatcher::command_for(editor);
            let Some((_, callback)) = palette.commands.get(spec.id) else {
                bail!("command {} was not registered", spec.id);
            };
            callback();

            // Outlive the child so its output pipes stay open and its
            // completion is logged. The launch itself does not wait.
            shell.wait();
        }
        Cmd::Commands => {
            for (id, (name, _)) in &palette.commands {
                println!("{id}\t{name}");
            }
        }
        Cmd::Settings { action } => {
            let tab = plugin.settings_tab();
            match action {
                None => tab.display(&mut TextPanel),
                Some(SettingsCmd::Set { key, value }) => {
                    tab.on_change(&key, &value)
                        .with_context(|| format!("failed to update {key}"))?;
                    println!("✅ {key} = {value}");
                }
            }
        }
        Cmd::Check => {
            let settings = plugin.settings();
            for editor in EditorKind::ALL {
                let configured = settings.binary_path(editor);
                match which::which(configured) {
                    Ok(path) => println!("✅ {editor}: {}", path.display()),
                    Err(e) => println!("❌ {editor}: {configured} ({e})"),
                }
            }
        }
    }

    plugin.deactivate();
    Ok(())
}

fn activate(
    plugin: &mut OpenInEditorPlugin,
    palette: &mut Palette,
    workspace: CliWorkspace,
    shell: Rc<SystemShell>,
) -> Result<()> {
    let notifier: Arc<dyn Notifier> = Arc::new(StderrNotifier);
    plugin
        .activate(
            HostServices {
                workspace: Rc::new(workspace),
                shell,
                notifier: Some(notifier),
            },
            palette,
        )
        .context("failed to load settings")
}
