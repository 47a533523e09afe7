//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod derived;
pub mod entities;
pub mod error;
pub mod rules;

pub use arena::{NodeData, SiblingOrder, TreeArena, TreeNode};
pub use builder::{Forest, TreeBuilder, Unresolved, UnresolvedReason};
pub use derived::DerivedExpression;
pub use entities::*;
pub use error::DomainError;
pub use rules::Violation;
