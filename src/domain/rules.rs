//! Cross-referential consistency rules over a loaded document.
//!
//! Every rule is a pure function returning the violations it found, in
//! document order. An empty list means the rule passed.

use std::collections::HashSet;
use std::fmt;

use crate::domain::derived::{is_valid_operator, DerivedExpression, Token, DIMENSIONLESS};
use crate::domain::entities::Document;

/// A single rule violation, carrying the keys needed to locate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Reported by the JSON schema check
    Schema { path: String, message: String },
    UnknownParent { system: String, inherits: String },
    SelfInheritance { system: String },
    UnknownBaseUnit {
        dimension: String,
        base_unit: Option<String>,
        /// `inheritedUnits` target that does not exist
        missing_inherited: Option<String>,
    },
    UnknownInheritedUnits { dimension: String, inherited: String },
    UnknownOperator { dimension: String, operator: String },
    UnknownOperand { dimension: String, operand: String },
    UnknownUnitSystem {
        dimension: String,
        unit: String,
        system: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Schema { path, message } => {
                let path = if path.is_empty() { "/" } else { path };
                write!(f, "{path}: {message}")
            }
            Violation::UnknownParent { system, inherits } => {
                write!(f, "system '{system}' inherits from unknown system '{inherits}'")
            }
            Violation::SelfInheritance { system } => {
                write!(f, "system '{system}' should not inherit from itself")
            }
            Violation::UnknownBaseUnit {
                dimension,
                base_unit,
                missing_inherited,
            } => {
                match base_unit {
                    Some(unit) => write!(
                        f,
                        "dimension '{dimension}' has a baseUnit '{unit}' that does not match any known unit"
                    )?,
                    None => write!(f, "dimension '{dimension}' has no baseUnit")?,
                }
                if let Some(inherited) = missing_inherited {
                    write!(f, " (inheritedUnits '{inherited}' is not a dimension)")?;
                }
                Ok(())
            }
            Violation::UnknownInheritedUnits {
                dimension,
                inherited,
            } => write!(
                f,
                "dimension '{dimension}' inherits units from unknown dimension '{inherited}'"
            ),
            Violation::UnknownOperator {
                dimension,
                operator,
            } => write!(
                f,
                "unknown operation '{operator}' used in dimension.derived for {dimension}"
            ),
            Violation::UnknownOperand { dimension, operand } => write!(
                f,
                "unknown base dimension or placeholder '{operand}' used in dimension.derived for {dimension}"
            ),
            Violation::UnknownUnitSystem {
                dimension,
                unit,
                system,
            } => write!(f, "unknown system '{system}' in {dimension}:{unit}"),
        }
    }
}

/// Every `inherits` must name an existing system other than itself.
pub fn check_system_inherits(doc: &Document) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (key, system) in doc.systems.iter() {
        let Some(inherits) = system.inherits.as_deref() else {
            continue;
        };
        if !doc.systems.contains_key(inherits) {
            violations.push(Violation::UnknownParent {
                system: key.to_string(),
                inherits: inherits.to_string(),
            });
        }
        if key == inherits {
            violations.push(Violation::SelfInheritance {
                system: key.to_string(),
            });
        }
    }
    violations
}

/// `baseUnit` must be one of the dimension's own or inherited unit keys.
///
/// Each dimension yields at most one violation. A dangling `inheritedUnits`
/// is folded into the base-unit violation, or reported on its own when the
/// base unit still resolves through the dimension's own units.
pub fn check_base_units(doc: &Document) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (key, dimension) in doc.dimensions.iter() {
        let mut unit_keys: HashSet<&str> = dimension.units.keys().collect();
        let mut missing_inherited = None;
        if let Some(inherited) = dimension.inherited_units_key() {
            match doc.dimensions.get(inherited) {
                Some(source) => unit_keys.extend(source.units.keys()),
                None => missing_inherited = Some(inherited.to_string()),
            }
        }
        let resolved = dimension
            .base_unit
            .as_deref()
            .is_some_and(|unit| unit_keys.contains(unit));
        match (resolved, missing_inherited) {
            (false, missing_inherited) => violations.push(Violation::UnknownBaseUnit {
                dimension: key.to_string(),
                base_unit: dimension.base_unit.clone(),
                missing_inherited,
            }),
            (true, Some(inherited)) => violations.push(Violation::UnknownInheritedUnits {
                dimension: key.to_string(),
                inherited,
            }),
            (true, None) => {}
        }
    }
    violations
}

/// Derived expressions may only combine base dimensions (or `1`) with `*` and `/`.
pub fn check_derived(doc: &Document) -> Vec<Violation> {
    let base_dimensions: HashSet<&str> = doc
        .dimensions
        .iter()
        .filter(|(_, d)| d.is_base())
        .map(|(k, _)| k)
        .collect();

    let mut violations = Vec::new();
    for (key, dimension) in doc.dimensions.iter() {
        let Some(expression) = dimension.derived_expression() else {
            continue;
        };
        for token in DerivedExpression::parse(expression).tokens() {
            match *token {
                Token::Operator(op) if !is_valid_operator(op) => {
                    violations.push(Violation::UnknownOperator {
                        dimension: key.to_string(),
                        operator: op.to_string(),
                    })
                }
                Token::Operand(operand)
                    if operand != DIMENSIONLESS && !base_dimensions.contains(operand) =>
                {
                    violations.push(Violation::UnknownOperand {
                        dimension: key.to_string(),
                        operand: operand.to_string(),
                    })
                }
                _ => {}
            }
        }
    }
    violations
}

/// Every system listed by a unit must exist.
pub fn check_unit_systems(doc: &Document) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (dim_key, dimension) in doc.dimensions.iter() {
        for (unit_key, unit) in dimension.units.iter() {
            for system in &unit.systems {
                if !doc.systems.contains_key(system) {
                    violations.push(Violation::UnknownUnitSystem {
                        dimension: dim_key.to_string(),
                        unit: unit_key.to_string(),
                        system: system.clone(),
                    });
                }
            }
        }
    }
    violations
}
