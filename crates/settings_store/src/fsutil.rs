use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SettingsStoreError;

/// Reads a JSON file, returning `None` when it does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SettingsStoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(SettingsStoreError::io("reading settings file", path, source)),
    };

    if raw.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| SettingsStoreError::json_parse(path, source))
}

/// Writes `value` as pretty JSON through a sibling temp file and a rename.
///
/// With `private` set, the file is created owner-read/write only on unix.
pub(crate) fn write_json<T: Serialize>(
    path: &Path,
    value: &T,
    private: bool,
) -> Result<(), SettingsStoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| SettingsStoreError::io("creating settings directory", parent, source))?;
    }

    let mut encoded = serde_json::to_vec_pretty(value)
        .map_err(|source| SettingsStoreError::json_serialize(path, source))?;
    encoded.push(b'\n');

    let temp_path = path.with_extension("json.tmp");
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if private {
            options.mode(0o600);
        }
    }
    #[cfg(not(unix))]
    let _ = private;

    let mut file = options
        .open(&temp_path)
        .map_err(|source| SettingsStoreError::io("creating temporary settings file", &temp_path, source))?;
    file.write_all(&encoded)
        .and_then(|()| file.sync_all())
        .map_err(|source| SettingsStoreError::io("writing temporary settings file", &temp_path, source))?;
    drop(file);

    fs::rename(&temp_path, path)
        .map_err(|source| SettingsStoreError::io("replacing settings file", path, source))
}
