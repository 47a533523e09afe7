//! Tests for command dispatch and exit codes

use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use measys::cli::{execute, Cli};
use measys::exitcode;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources/documents")
}

fn run(project: &Path, args: &[&str]) -> Result<i32, measys::cli::CliError> {
    let mut argv = vec!["measys", "-C", project.to_str().unwrap()];
    argv.extend_from_slice(args);
    execute(&Cli::try_parse_from(argv).expect("parse args"))
}

#[test]
fn given_fixture_project_when_validating_then_exit_ok() {
    let code = run(&fixtures(), &["validate"]).unwrap();
    assert_eq!(code, exitcode::OK);
}

#[test]
fn given_fixture_project_when_printing_tree_then_exit_ok() {
    let code = run(&fixtures(), &["tree", "--style", "tree", "--order", "attachment"]).unwrap();
    assert_eq!(code, exitcode::OK);
}

#[test]
fn given_failing_document_when_validating_then_exit_validation_failed() {
    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join("systems.json"),
        r#"{"systems": {"x": {"name": "X", "inherits": "x"}}, "dimensions": {}}"#,
    )
    .unwrap();
    let schema = fixtures().join("schema.json");

    let code = run(
        project.path(),
        &["validate", "--schema", schema.to_str().unwrap()],
    )
    .unwrap();

    assert_eq!(code, exitcode::VALIDATION_FAILED);
}

#[test]
fn given_missing_document_when_printing_tree_then_noinput() {
    let project = TempDir::new().unwrap();

    let err = run(project.path(), &["tree"]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_malformed_document_when_validating_then_dataerr() {
    let err = run(&fixtures(), &["validate", "malformed.json"]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_unresolved_system_when_strict_tree_then_dataerr() {
    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join("systems.json"),
        r#"{"systems": {"a": {"name": "A", "inherits": "gone"}}}"#,
    )
    .unwrap();

    let err = run(project.path(), &["tree", "--strict"]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert!(err.to_string().contains("'a' inherits from missing system 'gone'"));
}

#[test]
fn given_no_local_config_when_init_then_creates_it_once() {
    let project = TempDir::new().unwrap();

    let code = run(project.path(), &["config", "init"]).unwrap();
    assert_eq!(code, exitcode::OK);
    assert!(project.path().join(".measys.toml").exists());

    let err = run(project.path(), &["config", "init"]).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_missing_project_dir_when_running_then_usage_error() {
    let project = TempDir::new().unwrap();
    let missing = project.path().join("nope");

    let err = run(&missing, &["tree"]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}
