//! Integration tests for Settings config loading with layered merge semantics.
//!
//! These tests only create project-local configs in temp directories, so
//! they exercise the local layer on top of whatever global config exists.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use measys::application::ApplicationError;
use measys::config::{local_config_path, RawSettings, Settings};
use measys::domain::SiblingOrder;

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"
document = "data/systems.json"
max_errors = 10
sibling_order = "attachment"
strict = true
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.document, PathBuf::from("data/systems.json"));
    assert_eq!(settings.max_errors, 10);
    assert_eq!(settings.sibling_order, SiblingOrder::Attachment);
    assert!(settings.strict);
}

#[test]
fn given_invalid_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "max_errors = \"many\"\n").unwrap();

    let result = Settings::load(Some(project.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_unknown_sibling_order_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "sibling_order = \"alphabetical\"\n",
    )
    .unwrap();

    assert!(Settings::load(Some(project.path())).is_err());
}

#[test]
fn given_template_when_parsed_then_all_settings_are_commented_out() {
    let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");

    assert!(raw.document.is_none());
    assert!(raw.max_errors.is_none());
    assert!(raw.sibling_order.is_none());
}
