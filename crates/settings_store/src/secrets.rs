use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use completion_provider::{sanitize_credential, CredentialSource};
use serde::{Deserialize, Serialize};

use crate::error::SettingsStoreError;
use crate::fsutil::{read_json, write_json};
use crate::paths::SECRETS_FILE_NAME;

/// Secret entry holding the completion API key.
pub const API_KEY_ENTRY: &str = "completion_api_key";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Named secrets persisted in `secrets.json` under the settings directory.
pub struct SecretStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStore")
            .field("path", &self.path)
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SecretStore {
    /// Loads the store rooted at `settings_dir`. A missing file is an empty store.
    pub fn open(settings_dir: &Path) -> Result<Self, SettingsStoreError> {
        let path = settings_dir.join(SECRETS_FILE_NAME);
        let file: SecretsFile = read_json(&path)?.unwrap_or_default();

        Ok(Self {
            path,
            entries: file.entries,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the trimmed secret for `entry`; blank values count as absent.
    #[must_use]
    pub fn get(&self, entry: &str) -> Option<String> {
        self.entries
            .get(entry)
            .and_then(|value| sanitize_credential(value))
    }

    /// Stores `value` under `entry` and writes the file immediately.
    pub fn set(&mut self, entry: &str, value: &str) -> Result<(), SettingsStoreError> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(SettingsStoreError::BlankEntryName);
        }
        let Some(value) = sanitize_credential(value) else {
            return Err(SettingsStoreError::BlankSecret {
                entry: entry.to_string(),
            });
        };

        self.entries.insert(entry.to_string(), value);
        self.persist()?;
        tracing::debug!(entry, path = %self.path.display(), "stored secret entry");
        Ok(())
    }

    /// Removes `entry`; returns whether it was present.
    pub fn remove(&mut self, entry: &str) -> Result<bool, SettingsStoreError> {
        if self.entries.remove(entry).is_none() {
            return Ok(false);
        }

        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), SettingsStoreError> {
        let file = SecretsFile {
            entries: self.entries.clone(),
        };
        write_json(&self.path, &file, true)
    }
}

/// Credential source that re-reads the secret store on every lookup, so a
/// key stored mid-session is picked up by the next turn.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    settings_dir: PathBuf,
    entry: String,
}

impl StoredCredential {
    #[must_use]
    pub fn new(settings_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings_dir: settings_dir.into(),
            entry: API_KEY_ENTRY.to_string(),
        }
    }
}

impl CredentialSource for StoredCredential {
    fn api_key(&self) -> Option<String> {
        match SecretStore::open(&self.settings_dir) {
            Ok(store) => store.get(&self.entry),
            Err(error) => {
                tracing::warn!(%error, "secret store unreadable; treating credential as absent");
                None
            }
        }
    }
}
