//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::TreeStyle;
use crate::domain::SiblingOrder;

/// Validate and render measurement-system datasets
#[derive(Parser, Debug)]
#[command(name = "measys")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the systems inheritance tree
    Tree {
        /// Dataset document (default: configured document)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Fail if a system can't be attached (missing parent or cycle)
        #[arg(long)]
        strict: bool,
        /// Output style
        #[arg(long, value_enum)]
        style: Option<StyleArg>,
        /// Sibling order
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
    },

    /// Validate the document against the schema and consistency rules
    Validate {
        /// Dataset document (default: configured document)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// JSON schema (default: configured schema)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        schema: Option<PathBuf>,
        /// Violations shown for a failing check (at least 1)
        #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        max_errors: Option<usize>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleArg {
    /// Indented list
    List,
    /// Box-drawing tree
    Tree,
}

impl From<StyleArg> for TreeStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::List => TreeStyle::List,
            StyleArg::Tree => TreeStyle::Tree,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// Document order
    Declaration,
    /// Attachment order of the legacy printer
    Attachment,
}

impl From<OrderArg> for SiblingOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Declaration => SiblingOrder::Declaration,
            OrderArg::Attachment => SiblingOrder::Attachment,
        }
    }
}
