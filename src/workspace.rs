//! Host workspace access and vault path resolution.
//!
//! Documents are addressed by their path relative to the vault root. The
//! launcher needs an absolute filesystem path, so the two are joined here
//! with the rules of the platform the host runs on. Joining is done on
//! strings rather than `Path` so both rule sets can be exercised on any
//! machine.

/// Operating system family the shell command is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    pub fn separator(self) -> char {
        match self {
            Platform::Unix => '/',
            Platform::Windows => '\\',
        }
    }

    fn is_separator(self, c: char) -> bool {
        match self {
            Platform::Unix => c == '/',
            Platform::Windows => c == '/' || c == '\\',
        }
    }
}

/// The document currently focused in the host workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFile {
    path: String,
}

impl ActiveFile {
    /// `path` is relative to the vault root.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Read-only view of the host workspace.
pub trait Workspace {
    /// `None` when no document is open.
    fn active_file(&self) -> Option<ActiveFile>;

    /// Absolute path of the vault root directory.
    fn vault_root(&self) -> String;

    fn platform(&self) -> Platform {
        Platform::current()
    }
}

pub fn resolve_absolute_path(workspace: &dyn Workspace, file: &ActiveFile) -> String {
    join_vault_path(workspace.platform(), &workspace.vault_root(), file.path())
}

/// Joins `root` and `relative` and normalizes the result.
///
/// Empty segments and `.` are dropped, `..` pops the previous segment (it is
/// kept only when it would climb above a relative start). On Windows both
/// separators are accepted and the result uses `\`; drive (`C:\`) and UNC
/// (`\\server\share\`) roots are preserved. A trailing separator survives.
pub fn join_vault_path(platform: Platform, root: &str, relative: &str) -> String {
    let joined = match (root.is_empty(), relative.is_empty()) {
        (true, true) => return ".".to_string(),
        (false, true) => root.to_string(),
        (true, false) => relative.to_string(),
        (false, false) => format!("{root}{}{relative}", platform.separator()),
    };
    normalize(platform, &joined)
}

fn normalize(platform: Platform, path: &str) -> String {
    let sep = platform.separator();
    let (prefix, absolute, rest) = split_root(platform, path);
    let trailing = rest.ends_with(|c: char| platform.is_separator(c));

    let mut parts: Vec<&str> = Vec::new();
    for segment in rest.split(|c: char| platform.is_separator(c)) {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let mut out = prefix;
    out.push_str(&parts.join(&sep.to_string()));
    if trailing && !parts.is_empty() {
        out.push(sep);
    }
    if out.is_empty() {
        out.push('.');
    }
    out
}

/// Splits off the root of `path`: the normalized prefix, whether it is
/// absolute, and the remainder.
fn split_root(platform: Platform, path: &str) -> (String, bool, &str) {
    let starts_with_sep = path.starts_with(|c: char| platform.is_separator(c));
    if platform == Platform::Unix {
        return if starts_with_sep {
            ("/".to_string(), true, &path[1..])
        } else {
            (String::new(), false, path)
        };
    }

    let bytes = path.as_bytes();
    let is_sep = |b: u8| b == b'/' || b == b'\\';

    if bytes.len() > 2 && is_sep(bytes[0]) && is_sep(bytes[1]) && !is_sep(bytes[2]) {
        if let Some(unc) = split_unc(&path[2..]) {
            return unc;
        }
    }

    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        let drive = &path[..2];
        return if bytes.len() > 2 && is_sep(bytes[2]) {
            (format!("{drive}\\"), true, &path[3..])
        } else {
            (drive.to_string(), false, &path[2..])
        };
    }

    if starts_with_sep {
        ("\\".to_string(), true, &path[1..])
    } else {
        (String::new(), false, path)
    }
}

fn split_unc(after_slashes: &str) -> Option<(String, bool, &str)> {
    let is_sep = |c: char| c == '/' || c == '\\';
    let server_end = after_slashes.find(is_sep)?;
    let server = &after_slashes[..server_end];
    let tail = after_slashes[server_end..].trim_start_matches(is_sep);
    let share_end = tail.find(is_sep).unwrap_or(tail.len());
    let share = &tail[..share_end];
    if share.is_empty() {
        return None;
    }
    Some((format!("\\\\{server}\\{share}\\"), true, &tail[share_end..]))
}
