use std::path::{Path, PathBuf};

pub const SETTINGS_DIR_NAME: &str = "debate_chat";
pub const SECRETS_FILE_NAME: &str = "secrets.json";
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";
pub const LOG_FILE_NAME: &str = "debate-chat.log";

/// Resolves the settings directory.
///
/// An explicit override wins; otherwise the platform config directory is
/// used. Returns `None` when the platform has no config directory.
#[must_use]
pub fn settings_root(override_dir: Option<&Path>) -> Option<PathBuf> {
    match override_dir {
        Some(dir) => Some(dir.to_path_buf()),
        None => dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR_NAME)),
    }
}
