//! Integration tests for Settings loading from an explicit config file.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE (global defines the real baseline)
//! - Global → Local: UNION with negation support
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use curriculum_tree::application::ApplicationError;
use curriculum_tree::config::{local_config_path, Settings, SubjectScope};
use curriculum_tree::domain::DuplicatePolicy;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = local_config_path(dir.path());
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[load]
strict_root = false
subject_scope = "graph"
duplicate_keys = "reject"

[render]
output_dir = "site/docs"
secondary_only = true
"#,
    );

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    assert!(!settings.load.strict_root);
    assert_eq!(settings.load.subject_scope, SubjectScope::Graph);
    assert_eq!(settings.load.duplicate_keys, DuplicatePolicy::Reject);
    assert_eq!(settings.render.output_dir, PathBuf::from("site/docs"));
    assert!(settings.render.secondary_only);
}

#[test]
fn given_partial_config_when_load_then_unset_keys_keep_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[render]
exclude_subjects = ["Latin", "Design and Technologies"]
"#,
    );

    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    assert!(settings.load.strict_root);
    assert_eq!(settings.load.subject_scope, SubjectScope::LearningArea);
    assert_eq!(
        settings.render.exclude_subjects,
        vec!["Design and Technologies".to_string(), "Latin".to_string()],
        "arrays are sorted after merging"
    );
}

#[test]
fn given_negated_subject_when_load_then_not_excluded() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[render]
exclude_subjects = ["Latin", "!Latin"]
"#,
    );

    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    assert!(settings.render.exclude_subjects.is_empty());
}

#[test]
fn given_unknown_scope_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[load]
subject_scope = "everywhere"
"#,
    );

    let result = Settings::load(Some(path.as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let result = Settings::load(Some(path.as_path()));

    match result {
        Err(ApplicationError::Config { message }) => {
            assert!(message.contains("absent.toml"), "message: {message}");
        }
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn given_loaded_settings_when_to_toml_then_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[load]
duplicate_keys = "reject"

[render]
exclude_subjects = ["Latin"]
"#,
    );
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    let dumped = dir.path().join("dumped.toml");
    fs::write(&dumped, settings.to_toml().unwrap()).unwrap();
    let reloaded = Settings::load(Some(dumped.as_path())).expect("reload settings");

    assert_eq!(settings, reloaded);
}
