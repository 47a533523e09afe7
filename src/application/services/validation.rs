//! Document validation service
//!
//! Runs the named checks in a fixed order and stops at the first one that
//! reports violations.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::services::{DocumentLoader, SchemaValidator};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{rules, Document, Violation};
use crate::infrastructure::traits::FileSystem;

/// The validation checks, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    StrictParse,
    JsonSchema,
    SystemInherits,
    BaseUnits,
    Derived,
    UnitSystems,
}

impl Check {
    pub const ALL: [Check; 6] = [
        Check::StrictParse,
        Check::JsonSchema,
        Check::SystemInherits,
        Check::BaseUnits,
        Check::Derived,
        Check::UnitSystems,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Check::StrictParse => "Strict Parse",
            Check::JsonSchema => "JSON Schema",
            Check::SystemInherits => "MeasurementSystems Inherits",
            Check::BaseUnits => "Systems BaseUnit",
            Check::Derived => "Systems Derived",
            Check::UnitSystems => "Systems UnitMeasurementSystems",
        }
    }

    /// The consistency rule behind a check; parse and schema checks have none.
    pub fn rule(&self) -> Option<fn(&Document) -> Vec<Violation>> {
        match self {
            Check::StrictParse | Check::JsonSchema => None,
            Check::SystemInherits => Some(rules::check_system_inherits),
            Check::BaseUnits => Some(rules::check_base_units),
            Check::Derived => Some(rules::check_derived),
            Check::UnitSystems => Some(rules::check_unit_systems),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub check: Check,
    pub violations: Vec<Violation>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Results of the checks that ran; ends at the first failing check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub results: Vec<CheckResult>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.results.iter().all(CheckResult::passed)
    }

    /// The failing check, if any.
    pub fn failure(&self) -> Option<&CheckResult> {
        self.results.iter().find(|r| !r.passed())
    }

    /// Record a result; returns false once the run has to stop.
    fn record(&mut self, check: Check, violations: Vec<Violation>) -> bool {
        if violations.is_empty() {
            info!("{}: succeeded", check);
        } else {
            info!("{}: failed with {} violation(s)", check, violations.len());
        }
        let passed = violations.is_empty();
        self.results.push(CheckResult { check, violations });
        passed
    }
}

/// Service validating a document against a schema and the consistency rules.
pub struct ValidationService {
    loader: DocumentLoader,
}

impl ValidationService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            loader: DocumentLoader::new(fs),
        }
    }

    /// Validate `document` against `schema` and the consistency rules.
    ///
    /// Rule violations end up in the report. A document that is not valid
    /// JSON, a missing file or an unusable schema is an error instead.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self, document: &Path, schema: &Path) -> ApplicationResult<ValidationReport> {
        let mut report = ValidationReport::default();

        let content = self.loader.read(document)?;
        let instance = self.loader.parse_strict(document, &content)?;
        report.record(Check::StrictParse, Vec::new());

        let schema_text = self.loader.read(schema)?;
        let schema_value: serde_json::Value =
            serde_json::from_str(&schema_text).map_err(|e| ApplicationError::Schema {
                path: schema.to_path_buf(),
                message: e.to_string(),
            })?;
        let validator = SchemaValidator::compile(schema, &schema_value)?;
        if !report.record(Check::JsonSchema, validator.validate(&instance)) {
            return Ok(report);
        }

        let doc = Document::from_value(&instance)?;
        debug!(
            "validate: {} systems, {} dimensions",
            doc.systems.len(),
            doc.dimensions.len()
        );
        report.results.extend(Self::check_document(&doc).results);
        Ok(report)
    }

    /// Run only the consistency rules on an already loaded document.
    pub fn check_document(doc: &Document) -> ValidationReport {
        let mut report = ValidationReport::default();
        for check in Check::ALL {
            if let Some(rule) = check.rule() {
                if !report.record(check, rule(doc)) {
                    break;
                }
            }
        }
        report
    }
}
