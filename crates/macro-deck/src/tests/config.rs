#![allow(clippy::unwrap_used)]

use crate::{AppError, config::Config, tests::support::TempDir};

use macro_deck_core::{DEFAULT_BANNER_TIMEOUT, WindowPolicy, WindowSize};

use std::{fs, time::Duration};

/// WHAT: Missing config file is created with defaults
/// WHY: First launch must work without any setup
#[test]
fn given_missing_file_when_loading_then_defaults_written() {
    // Given: An empty directory
    let dir = TempDir::new();
    fs::create_dir_all(&dir.path).unwrap();
    let path = dir.path.join("config.toml");

    // When: Loading
    let config = Config::load_from(&path).unwrap();

    // Then: Defaults returned and persisted
    assert_eq!(config, Config::default());
    assert!(path.exists());
    assert_eq!(Config::load_from(&path).unwrap(), config);
}

/// WHAT: Default window settings match the built-in policy
/// WHY: An untouched config must behave exactly like no config
#[test]
fn given_default_config_when_building_policy_then_matches_default_policy() {
    let config = Config::default();

    assert_eq!(config.window.policy(), WindowPolicy::default());
    assert_eq!(config.notifications.banner_timeout(), DEFAULT_BANNER_TIMEOUT);
}

/// WHAT: Partial files fill in the missing fields
/// WHY: Users only write the settings they change
#[test]
fn given_partial_file_when_loading_then_missing_fields_defaulted() {
    // Given: Only the debounce and compact size set
    let dir = TempDir::new();
    fs::create_dir_all(&dir.path).unwrap();
    let path = dir.path.join("config.toml");
    fs::write(
        &path,
        "[window]\ndebounce_ms = 50\ncompact_size = { width = 300, height = 120 }\n",
    )
    .unwrap();

    // When: Loading
    let config = Config::load_from(&path).unwrap();

    // Then: Set values applied, the rest default
    let policy = config.window.policy();
    assert_eq!(policy.debounce, Duration::from_millis(50));
    assert_eq!(policy.compact_size, WindowSize::new(300, 120));
    assert_eq!(policy.normal_size, WindowSize::new(1000, 700));
    assert_eq!(config.logging, Config::default().logging);
    assert_eq!(config.storage.data_dir, None);
}

/// WHAT: Saved config reloads unchanged
/// WHY: Atomic save must write a complete file
#[test]
fn given_custom_config_when_saved_then_reloads_equal() {
    // Given: A customized config
    let dir = TempDir::new();
    fs::create_dir_all(&dir.path).unwrap();
    let path = dir.path.join("config.toml");
    let mut config = Config::default();
    config.notifications.banner_timeout_ms = 1500;
    config.storage.data_dir = Some(dir.path.join("data"));
    config.logging.filter = "macro_deck=info".to_string();

    // When: Saving and loading
    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();

    // Then: Same values, no temp file left behind
    assert_eq!(loaded, config);
    assert_eq!(loaded.data_dir().unwrap(), dir.path.join("data"));
    assert!(!path.with_extension("toml.tmp").exists());
}

/// WHAT: Malformed config is an error
/// WHY: Silently replacing it with defaults would discard the user's edits
#[test]
fn given_malformed_file_when_loading_then_config_error() {
    // Given: Invalid TOML
    let dir = TempDir::new();
    fs::create_dir_all(&dir.path).unwrap();
    let path = dir.path.join("config.toml");
    fs::write(&path, "[window\n").unwrap();

    // When: Loading
    let result = Config::load_from(&path);

    // Then: Config error
    assert!(matches!(result, Err(AppError::Config { .. })));
}
