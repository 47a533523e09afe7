//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::builder::Unresolved;

/// Domain errors represent violations of the dataset's structure.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid document: {message}")]
    InvalidDocument { message: String },

    #[error("{} system(s) could not be attached to the tree: {}", .0.len(), format_unresolved(.0))]
    UnresolvedSystems(Vec<Unresolved>),
}

fn format_unresolved(unresolved: &[Unresolved]) -> String {
    unresolved
        .iter()
        .map(|u| u.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
