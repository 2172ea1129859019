use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "nexus_terminal";
const NOTES_FILE: &str = "notes.txt";

/// Scratchpad file next to the settings blob. `None` when no home directory
/// can be resolved, in which case notes simply do not persist.
pub fn notes_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CONFIG_DIR).join(NOTES_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR)
            .join(NOTES_FILE),
    )
}

pub fn load_note(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

pub fn save_note(path: &Path, text: &str) {
    let Some(dir) = path.parent() else {
        return;
    };
    let _ = fs::create_dir_all(dir);
    let tmp = path.with_extension("txt.tmp");
    if fs::write(&tmp, text).is_ok() {
        let _ = fs::rename(&tmp, path);
    }
}
