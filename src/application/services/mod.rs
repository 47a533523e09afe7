//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod loader;
mod schema;
mod systems;
mod validation;

pub use loader::DocumentLoader;
pub use schema::SchemaValidator;
pub use systems::{
    count_line, render_list, render_tree, SystemsService, TreeOptions, TreeOutput, TreeStyle,
};
pub use validation::{Check, CheckResult, ValidationReport, ValidationService};
