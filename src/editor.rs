use std::fmt;
use std::str::FromStr;

/// The external editors a document can be handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKind {
    /// gVim, configured through `gvimBinaryPath`.
    Terminal,
    /// VS Code, configured through `codeBinaryPath`.
    Gui,
}

impl EditorKind {
    pub const ALL: [EditorKind; 2] = [EditorKind::Terminal, EditorKind::Gui];

    pub fn display_name(self) -> &'static str {
        match self {
            EditorKind::Terminal => "gVim",
            EditorKind::Gui => "VScode",
        }
    }

    /// Key of the persisted setting holding this editor's binary.
    pub fn settings_key(self) -> &'static str {
        match self {
            EditorKind::Terminal => "gvimBinaryPath",
            EditorKind::Gui => "codeBinaryPath",
        }
    }
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown editor `{0}` (expected `gvim` or `code`)")]
pub struct UnknownEditor(pub String);

impl FromStr for EditorKind {
    type Err = UnknownEditor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gvim" | "vim" | "terminal" => Ok(EditorKind::Terminal),
            "code" | "vscode" | "gui" => Ok(EditorKind::Gui),
            _ => Err(UnknownEditor(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_editor_aliases() {
        assert_eq!("gvim".parse(), Ok(EditorKind::Terminal));
        assert_eq!("VSCode".parse(), Ok(EditorKind::Gui));
        assert_eq!("code".parse(), Ok(EditorKind::Gui));
        assert!("emacs".parse::<EditorKind>().is_err());
    }

    #[test]
    fn settings_keys_match_persisted_layout() {
        assert_eq!(EditorKind::Terminal.settings_key(), "gvimBinaryPath");
        assert_eq!(EditorKind::Gui.settings_key(), "codeBinaryPath");
    }
}
