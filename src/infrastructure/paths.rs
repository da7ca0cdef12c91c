//! Path handling for the Zellij plugin sandbox.
//!
//! Inside the sandbox `/data` is the plugin's private persistent directory and
//! `/host` is the host directory Zellij was started from. User-supplied paths
//! with a leading `~` are mapped onto `/host`.

use std::path::{Path, PathBuf};

/// Plugin data mount.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// File holding the persisted session (token and user profile).
pub const SESSION_FILE: &str = "galleria-session.json";

/// File receiving exported spans.
pub const SPAN_FILE: &str = "galleria-spans.jsonl";

/// Maps a configured path into the sandbox.
///
/// ```
/// use galleria::infrastructure::resolve_path;
/// use std::path::PathBuf;
///
/// assert_eq!(resolve_path("~/themes/ink.toml"), PathBuf::from("/host/themes/ink.toml"));
/// assert_eq!(resolve_path("/data/ink.toml"), PathBuf::from("/data/ink.toml"));
/// ```
#[must_use]
pub fn resolve_path(path: &str) -> PathBuf {
    let path = path.trim();
    if let Some(rest) = path.strip_prefix("~/") {
        Path::new("/host").join(rest)
    } else if path == "~" {
        PathBuf::from("/host")
    } else {
        PathBuf::from(path)
    }
}

#[must_use]
pub fn session_file(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE)
}

#[must_use]
pub fn span_file(data_dir: &Path) -> PathBuf {
    data_dir.join(SPAN_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_maps_to_host() {
        assert_eq!(resolve_path("~"), PathBuf::from("/host"));
        assert_eq!(resolve_path(" ~/a/b "), PathBuf::from("/host/a/b"));
        assert_eq!(resolve_path("relative/x"), PathBuf::from("relative/x"));
    }

    #[test]
    fn files_live_in_data_dir() {
        let dir = Path::new(DEFAULT_DATA_DIR);
        assert_eq!(session_file(dir), PathBuf::from("/data/galleria-session.json"));
        assert_eq!(span_file(dir), PathBuf::from("/data/galleria-spans.jsonl"));
    }
}
