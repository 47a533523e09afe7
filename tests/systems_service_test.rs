//! Tests for SystemsService

use std::path::PathBuf;
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use measys::application::services::{count_line, SystemsService, TreeOptions, TreeStyle};
use measys::application::ApplicationError;
use measys::domain::{DomainError, SiblingOrder};
use measys::infrastructure::traits::RealFileSystem;
use measys::util::testing;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/documents")
        .join(name)
}

fn create_document(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("systems.json");
    std::fs::write(&path, content).expect("write document");
    path
}

#[fixture]
fn service() -> SystemsService {
    testing::init_test_setup();
    SystemsService::new(Arc::new(RealFileSystem))
}

#[rstest]
fn given_fixture_when_rendering_list_then_prints_indented_tree(service: SystemsService) {
    // Act
    let output = service
        .tree(&resource("systems.json"), &TreeOptions::default())
        .unwrap();

    // Assert
    let expected = concat!(
        "  - metric (Metric)\n",
        "    - si (International System of Units)\n",
        "    - cgs (Centimetre-gram-second) *(H)*\n",
        "  - imperial (Imperial)\n",
        "    - us (United States customary)\n",
        "      - us_survey (US survey) *(H)*\n",
    );
    assert_eq!(output.text, expected);
    assert_eq!(output.count, 6);
    assert_eq!(count_line(output.count), "System Count: 6");
}

#[rstest]
fn given_custom_indent_when_rendering_list_then_uses_it_per_level(service: SystemsService) {
    let temp = TempDir::new().unwrap();
    let path = create_document(
        &temp,
        r#"{"systems": {"a": {"name": "A"}, "b": {"name": "B", "inherits": "a"}}}"#,
    );
    let options = TreeOptions {
        indent: "\t".to_string(),
        ..TreeOptions::default()
    };

    let output = service.tree(&path, &options).unwrap();

    assert_eq!(output.text, "\t- a (A)\n\t\t- b (B)\n");
}

#[rstest]
fn given_tree_style_when_rendering_then_draws_box_tree(service: SystemsService) {
    let options = TreeOptions {
        style: TreeStyle::Tree,
        ..TreeOptions::default()
    };

    let output = service.tree(&resource("systems.json"), &options).unwrap();

    assert!(output.text.starts_with("systems\n"));
    assert!(output.text.contains("└── us_survey (US survey) *(H)*"));
    assert_eq!(output.count, 6);
}

#[rstest]
fn given_unresolved_system_when_not_strict_then_dropped_from_output(service: SystemsService) {
    let temp = TempDir::new().unwrap();
    let path = create_document(
        &temp,
        r#"{"systems": {"a": {"name": "A"}, "lost": {"name": "Lost", "inherits": "nowhere"}}}"#,
    );

    let output = service.tree(&path, &TreeOptions::default()).unwrap();

    assert_eq!(output.text, "  - a (A)\n");
    assert_eq!(output.count, 1);
}

#[rstest]
fn given_unresolved_system_when_strict_then_domain_error(service: SystemsService) {
    let temp = TempDir::new().unwrap();
    let path = create_document(
        &temp,
        r#"{"systems": {"a": {"name": "A"}, "lost": {"name": "Lost", "inherits": "nowhere"}}}"#,
    );

    let result = service.build(&path, SiblingOrder::Declaration, true);

    match result {
        Err(ApplicationError::Domain(DomainError::UnresolvedSystems(unresolved))) => {
            assert_eq!(unresolved.len(), 1);
            assert_eq!(unresolved[0].key, "lost");
        }
        other => panic!("expected unresolved systems error, got {other:?}"),
    }
}

#[rstest]
fn given_missing_file_when_building_then_not_found(service: SystemsService) {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.json");

    let result = service.tree(&missing, &TreeOptions::default());

    assert!(matches!(result, Err(ApplicationError::NotFound(p)) if p == missing));
}

#[rstest]
fn given_malformed_json_when_building_then_parse_error(service: SystemsService) {
    let result = service.tree(&resource("malformed.json"), &TreeOptions::default());

    assert!(matches!(result, Err(ApplicationError::Parse { .. })));
}
