//! measys: validation and tree rendering of measurement-system datasets.
//!
//! Layers, innermost first:
//! - `domain`: entities, the systems tree builder and the consistency rules
//! - `application`: services loading documents and running checks
//! - `infrastructure`: filesystem boundary and service wiring
//! - `cli`: argument parsing, dispatch and terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
