//! Command dispatch: wires parsed arguments to application services

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{count_line, TreeOptions};
use crate::cli::args::{Cli, Commands, ConfigCommands, OrderArg, StyleArg};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Run the parsed command; returns the process exit code.
pub fn execute(cli: &Cli) -> CliResult<i32> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(exitcode::USAGE);
    };

    // Completion needs neither settings nor a project
    if let Commands::Completion { shell } = command {
        generate(*shell, &mut Cli::command(), "measys", &mut io::stdout());
        return Ok(exitcode::OK);
    }

    let project_dir = project_dir(cli.project_dir.as_deref())?;
    let settings = Settings::load(Some(&project_dir))?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings, project_dir);

    match command {
        Commands::Tree {
            file,
            strict,
            style,
            order,
        } => cmd_tree(&container, file.as_deref(), *strict, *style, *order),
        Commands::Validate {
            file,
            schema,
            max_errors,
        } => cmd_validate(&container, file.as_deref(), schema.as_deref(), *max_errors),
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { .. } => Ok(exitcode::OK),
    }
}

fn project_dir(explicit: Option<&Path>) -> CliResult<PathBuf> {
    match explicit {
        Some(dir) if dir.is_dir() => Ok(dir.to_path_buf()),
        Some(dir) => Err(CliError::InvalidArgs(format!(
            "project directory not found: {}",
            dir.display()
        ))),
        None => std::env::current_dir()
            .map_err(|e| CliError::from(InfraError::io("current directory", e))),
    }
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    file: Option<&Path>,
    strict: bool,
    style: Option<StyleArg>,
    order: Option<OrderArg>,
) -> CliResult<i32> {
    let settings = &container.settings;
    let path = container.resolve(file.unwrap_or(&settings.document));
    let options = TreeOptions {
        order: order.map(Into::into).unwrap_or(settings.sibling_order),
        strict: strict || settings.strict,
        style: style.map(Into::into).unwrap_or_default(),
        indent: settings.indent.clone(),
    };

    let rendered = container.systems_service().tree(&path, &options)?;
    if !rendered.text.is_empty() {
        output::info(rendered.text.trim_end_matches('\n'));
    }
    output::info(&count_line(rendered.count));
    Ok(exitcode::OK)
}

#[instrument(level = "debug", skip(container))]
fn cmd_validate(
    container: &ServiceContainer,
    file: Option<&Path>,
    schema: Option<&Path>,
    max_errors: Option<usize>,
) -> CliResult<i32> {
    let settings = &container.settings;
    let document = container.resolve(file.unwrap_or(&settings.document));
    let schema = container.resolve(schema.unwrap_or(&settings.schema));
    let max_errors = max_errors.unwrap_or(settings.max_errors);
    let label = document
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| document.display().to_string());

    output::header(&format!("Validating {label}..."));
    let report = container.validation_service().validate(&document, &schema)?;

    for result in &report.results {
        if result.passed() {
            output::check_passed(result.check.name());
        } else {
            output::check_failed(result.check.name());
            output::violations(&result.violations, max_errors);
            return Ok(exitcode::VALIDATION_FAILED);
        }
    }

    output::success(&format!("Validating {label} succeeded!"));
    Ok(exitcode::OK)
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::info(container.settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => {
            let global = global_config_path();
            let local = local_config_path(&container.project_dir);
            match global {
                Some(path) => print_config_path("global", &path, container),
                None => output::action("global", &"(no config directory)"),
            }
            print_config_path("local", &local, container);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(&container.project_dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
    }
    Ok(exitcode::OK)
}

fn print_config_path(label: &str, path: &Path, container: &ServiceContainer) {
    let marker = if container.fs.exists(path) {
        ""
    } else {
        " (not found)"
    };
    output::action(label, &format!("{}{}", path.display(), marker));
}
