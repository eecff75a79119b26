use std::fs;

use completion_provider::CredentialSource;
use settings_store::{
    Preferences, SecretStore, SettingsStoreError, StoredCredential, API_KEY_ENTRY,
    PREFERENCES_FILE_NAME, SECRETS_FILE_NAME,
};
use tempfile::TempDir;

fn settings_dir() -> TempDir {
    tempfile::tempdir().expect("tempdir should be created")
}

#[test]
fn missing_secret_file_is_an_empty_store() {
    let dir = settings_dir();
    let store = SecretStore::open(dir.path()).expect("missing file should open");

    assert_eq!(store.get(API_KEY_ENTRY), None);
    assert!(!store.path().exists());
}

#[test]
fn stored_secret_round_trips_through_disk_trimmed() {
    let dir = settings_dir();
    let mut store = SecretStore::open(dir.path()).expect("store should open");
    store
        .set(API_KEY_ENTRY, "  gsk_test_key \n")
        .expect("secret should be stored");

    let reopened = SecretStore::open(dir.path()).expect("store should reopen");
    assert_eq!(reopened.get(API_KEY_ENTRY).as_deref(), Some("gsk_test_key"));
}

#[cfg(unix)]
#[test]
fn secret_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = settings_dir();
    let mut store = SecretStore::open(dir.path()).expect("store should open");
    store.set(API_KEY_ENTRY, "key").expect("secret should be stored");

    let mode = fs::metadata(dir.path().join(SECRETS_FILE_NAME))
        .expect("secret file metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn blank_secret_is_rejected_and_nothing_is_written() {
    let dir = settings_dir();
    let mut store = SecretStore::open(dir.path()).expect("store should open");

    let error = store
        .set(API_KEY_ENTRY, "   ")
        .expect_err("blank secret should fail");
    assert!(matches!(error, SettingsStoreError::BlankSecret { .. }));
    assert!(!dir.path().join(SECRETS_FILE_NAME).exists());
}

#[test]
fn remove_reports_presence() {
    let dir = settings_dir();
    let mut store = SecretStore::open(dir.path()).expect("store should open");
    store.set(API_KEY_ENTRY, "key").expect("secret should be stored");

    assert!(store.remove(API_KEY_ENTRY).expect("remove should succeed"));
    assert!(!store.remove(API_KEY_ENTRY).expect("second remove should succeed"));
    assert_eq!(
        SecretStore::open(dir.path())
            .expect("store should reopen")
            .get(API_KEY_ENTRY),
        None
    );
}

#[test]
fn corrupt_secret_file_reports_parse_error() {
    let dir = settings_dir();
    fs::write(dir.path().join(SECRETS_FILE_NAME), "{not json").expect("fixture written");

    let error = SecretStore::open(dir.path()).expect_err("corrupt file should fail");
    assert!(matches!(error, SettingsStoreError::JsonParse { .. }));
}

#[test]
fn stored_credential_sees_keys_written_after_creation() {
    let dir = settings_dir();
    let credential = StoredCredential::new(dir.path());
    assert_eq!(credential.api_key(), None);

    let mut store = SecretStore::open(dir.path()).expect("store should open");
    store.set(API_KEY_ENTRY, "late-key").expect("secret should be stored");

    assert_eq!(credential.api_key().as_deref(), Some("late-key"));
}

#[test]
fn stored_credential_treats_corrupt_store_as_absent() {
    let dir = settings_dir();
    fs::write(dir.path().join(SECRETS_FILE_NAME), "{\"entries\": 42}").expect("fixture written");

    assert_eq!(StoredCredential::new(dir.path()).api_key(), None);
}

#[test]
fn disclaimer_flag_is_persisted_once_set() {
    let dir = settings_dir();
    let mut preferences = Preferences::load(dir.path()).expect("defaults should load");
    assert!(!preferences.has_shown_disclaimer());

    preferences
        .mark_disclaimer_shown()
        .expect("flag should be saved");

    let reloaded = Preferences::load(dir.path()).expect("preferences should reload");
    assert!(reloaded.has_shown_disclaimer());
    assert!(reloaded.disclaimer_acknowledged_at().is_some());
}

#[test]
fn invalid_disclaimer_timestamp_counts_as_not_shown() {
    let dir = settings_dir();
    fs::write(
        dir.path().join(PREFERENCES_FILE_NAME),
        r#"{"disclaimer_acknowledged_at":"yesterday"}"#,
    )
    .expect("fixture written");

    let preferences = Preferences::load(dir.path()).expect("preferences should load");
    assert!(!preferences.has_shown_disclaimer());
}

#[test]
fn preferences_are_written_into_nested_missing_directory() {
    let dir = settings_dir();
    let nested = dir.path().join("a").join("b");
    let mut preferences = Preferences::load(&nested).expect("defaults should load");
    preferences
        .mark_disclaimer_shown()
        .expect("flag should be saved");

    assert!(nested.join(PREFERENCES_FILE_NAME).exists());
}
