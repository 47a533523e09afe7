//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/measys/measys.toml`
//! 3. Local config: `<project_dir>/.measys.toml`
//! 4. Environment variables: `MEASYS_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::SiblingOrder;

/// Number of violations shown for a failing check unless configured otherwise.
pub const DEFAULT_MAX_ERRORS: usize = 5;

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub document: Option<PathBuf>,
    pub schema: Option<PathBuf>,
    pub max_errors: Option<usize>,
    pub indent: Option<String>,
    pub strict: Option<bool>,
    pub sibling_order: Option<SiblingOrder>,
}

/// Unified configuration for measys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Dataset document (default: systems.json)
    pub document: PathBuf,
    /// JSON schema for the document (default: schema.json)
    pub schema: PathBuf,
    /// Violations shown per failing check
    pub max_errors: usize,
    /// Indent unit of the tree listing
    pub indent: String,
    /// Treat systems that can't be placed in the tree as an error
    pub strict: bool,
    /// Sibling order of the tree
    pub sibling_order: SiblingOrder,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            document: PathBuf::from("systems.json"),
            schema: PathBuf::from("schema.json"),
            max_errors: DEFAULT_MAX_ERRORS,
            indent: "  ".to_string(),
            strict: false,
            sibling_order: SiblingOrder::Declaration,
        }
    }
}

/// Get the XDG config directory for measys.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "measys").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("measys.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".measys.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Parse a sibling order name as used in config files and env vars.
pub fn parse_sibling_order(value: &str) -> Result<SiblingOrder, ApplicationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "declaration" => Ok(SiblingOrder::Declaration),
        "attachment" => Ok(SiblingOrder::Attachment),
        other => Err(ApplicationError::Config {
            message: format!(
                "invalid sibling_order '{other}' (expected 'declaration' or 'attachment')"
            ),
        }),
    }
}

impl Settings {
    /// Resolve a configured path against `base` unless it is absolute.
    pub fn resolve(base: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.document = PathBuf::from(expand(&self.document));
        self.schema = PathBuf::from(expand(&self.schema));
    }

    /// Overlay wins for every field it specifies.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            document: overlay
                .document
                .clone()
                .unwrap_or_else(|| self.document.clone()),
            schema: overlay.schema.clone().unwrap_or_else(|| self.schema.clone()),
            max_errors: overlay.max_errors.unwrap_or(self.max_errors),
            indent: overlay.indent.clone().unwrap_or_else(|| self.indent.clone()),
            strict: overlay.strict.unwrap_or(self.strict),
            sibling_order: overlay.sibling_order.unwrap_or(self.sibling_order),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory holding `.measys.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Project-local config
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply MEASYS_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("MEASYS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("document") {
            settings.document = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("schema") {
            settings.schema = PathBuf::from(val);
        }
        if let Ok(val) = config.get_int("max_errors") {
            settings.max_errors = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("invalid max_errors: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("indent") {
            settings.indent = val;
        }
        if let Ok(val) = config.get_bool("strict") {
            settings.strict = val;
        }
        if let Ok(val) = config.get_string("sibling_order") {
            settings.sibling_order = parse_sibling_order(&val)?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# measys configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/measys/measys.toml
#   Local:  <project>/.measys.toml
#   Env:    MEASYS_* environment variables
#   Flags:  command line options win over everything

# Dataset document, relative to the project directory
# document = "systems.json"

# JSON schema used by `measys validate`
# schema = "schema.json"

# Violations shown for a failing check
# max_errors = 5

# Indent unit of `measys tree`
# indent = "  "

# Fail `measys tree` when a system can't be attached (missing parent or cycle)
# strict = false

# Sibling order of `measys tree`: "declaration" (document order) or
# "attachment" (order of the legacy printer)
# sibling_order = "declaration"
"#
        .to_string()
    }
}

fn expand(path: &Path) -> String {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.into_owned())
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_overlay_values_when_merging_then_keeps_base() {
        let base = Settings::default();
        let merged = base.merge_with(&RawSettings::default());
        assert_eq!(merged, base);
    }

    #[test]
    fn given_overlay_values_when_merging_then_overlay_wins() {
        let overlay = RawSettings {
            max_errors: Some(10),
            sibling_order: Some(SiblingOrder::Attachment),
            strict: Some(true),
            ..RawSettings::default()
        };

        let merged = Settings::default().merge_with(&overlay);

        assert_eq!(merged.max_errors, 10);
        assert_eq!(merged.sibling_order, SiblingOrder::Attachment);
        assert!(merged.strict);
        assert_eq!(merged.document, PathBuf::from("systems.json"));
    }

    #[test]
    fn given_tilde_in_document_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            document: PathBuf::from("~/data/systems.json"),
            ..Settings::default()
        };

        settings.expand_paths();

        assert!(!settings.document.to_string_lossy().starts_with('~'));
        assert!(settings.document.ends_with("data/systems.json"));
    }

    #[test]
    fn given_order_names_when_parsing_then_case_insensitive() {
        assert_eq!(
            parse_sibling_order("Attachment").unwrap(),
            SiblingOrder::Attachment
        );
        assert!(parse_sibling_order("sorted").is_err());
    }

    #[test]
    fn given_relative_path_when_resolving_then_joins_base() {
        let base = Path::new("/data");
        assert_eq!(
            Settings::resolve(base, Path::new("systems.json")),
            PathBuf::from("/data/systems.json")
        );
        assert_eq!(
            Settings::resolve(base, Path::new("/etc/schema.json")),
            PathBuf::from("/etc/schema.json")
        );
    }

    #[test]
    fn given_defaults_when_serializing_then_toml_roundtrips() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("sibling_order = \"declaration\""));
        let parsed: RawSettings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.max_errors, Some(DEFAULT_MAX_ERRORS));
    }
}
