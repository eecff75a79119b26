//! On-disk settings for the debate chat program: the API key secret store
//! and the small preferences file holding the disclaimer flag.

mod error;
mod fsutil;
mod paths;
mod preferences;
mod secrets;

pub use error::SettingsStoreError;
pub use paths::{
    settings_root, LOG_FILE_NAME, PREFERENCES_FILE_NAME, SECRETS_FILE_NAME, SETTINGS_DIR_NAME,
};
pub use preferences::Preferences;
pub use secrets::{SecretStore, StoredCredential, API_KEY_ENTRY};
