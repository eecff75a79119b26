use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::SettingsStoreError;
use crate::fsutil::{read_json, write_json};
use crate::paths::PREFERENCES_FILE_NAME;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    disclaimer_acknowledged_at: Option<String>,
}

/// Persisted user preferences (`preferences.json`).
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    file: PreferencesFile,
}

impl Preferences {
    /// Loads preferences rooted at `settings_dir`. A missing file yields defaults.
    pub fn load(settings_dir: &Path) -> Result<Self, SettingsStoreError> {
        let path = settings_dir.join(PREFERENCES_FILE_NAME);
        let file = read_json(&path)?.unwrap_or_default();
        Ok(Self { path, file })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once the disclaimer has been acknowledged with a valid timestamp.
    #[must_use]
    pub fn has_shown_disclaimer(&self) -> bool {
        self.file
            .disclaimer_acknowledged_at
            .as_deref()
            .is_some_and(|value| OffsetDateTime::parse(value, &Rfc3339).is_ok())
    }

    #[must_use]
    pub fn disclaimer_acknowledged_at(&self) -> Option<&str> {
        self.file.disclaimer_acknowledged_at.as_deref()
    }

    /// Records the acknowledgement with the current UTC time and saves.
    pub fn mark_disclaimer_shown(&mut self) -> Result<(), SettingsStoreError> {
        let now = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(SettingsStoreError::ClockFormat)?;
        self.file.disclaimer_acknowledged_at = Some(now);
        self.save()
    }

    pub fn save(&self) -> Result<(), SettingsStoreError> {
        write_json(&self.path, &self.file, false)
    }
}
