//! JSON schema check backed by the `jsonschema` crate.

use std::path::Path;

use jsonschema::JSONSchema;
use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Violation;

/// A compiled schema document.
pub struct SchemaValidator {
    compiled: JSONSchema,
}

impl SchemaValidator {
    /// Compile `schema`; `path` is only used for error reporting.
    pub fn compile(path: &Path, schema: &Value) -> ApplicationResult<Self> {
        let compiled = JSONSchema::compile(schema).map_err(|e| ApplicationError::Schema {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self { compiled })
    }

    /// Validate `instance`, turning every schema error into a violation.
    pub fn validate(&self, instance: &Value) -> Vec<Violation> {
        let result = self.compiled.validate(instance);
        let violations: Vec<Violation> = match result {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|e| Violation::Schema {
                    path: e.instance_path.to_string(),
                    message: e.to_string(),
                })
                .collect(),
        };
        debug!("schema check: {} violation(s)", violations.len());
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_missing_required_field_when_validating_then_reports_path() {
        let schema = json!({
            "type": "object",
            "properties": {
                "systems": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "object",
                        "required": ["name"]
                    }
                }
            }
        });
        let validator = SchemaValidator::compile(Path::new("schema.json"), &schema).unwrap();

        let violations = validator.validate(&json!({"systems": {"si": {}}}));

        assert_eq!(violations.len(), 1);
        match &violations[0] {
            Violation::Schema { path, .. } => assert_eq!(path, "/systems/si"),
            other => panic!("unexpected violation: {other:?}"),
        }
    }

    #[test]
    fn given_invalid_schema_when_compiling_then_schema_error() {
        let schema = json!({"type": "no-such-type"});
        let result = SchemaValidator::compile(Path::new("bad.json"), &schema);
        assert!(matches!(result, Err(ApplicationError::Schema { .. })));
    }
}
