//! Top-level cohesion configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{FormatConfig, GraphConfig, ScanConfig};
use crate::errors::ConfigError;

/// Name of the project-level config file looked up in the analyzed root.
pub const PROJECT_CONFIG_FILE: &str = "cohesion.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`COHESION_*`)
/// 3. Project config (`cohesion.toml` in the analyzed root, or an explicit file)
/// 4. User config (`~/.cohesion/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CohesionConfig {
    pub scan: ScanConfig,
    pub format: FormatConfig,
    pub graph: GraphConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit config file replacing the project `cohesion.toml` lookup.
    pub config_file: Option<PathBuf>,
    pub scan_threads: Option<usize>,
    pub scan_include_tests: Option<bool>,
    pub format_indent: Option<String>,
}

impl CohesionConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config. Only a broken TOML file is fatal here.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) | Err(ConfigError::FileNotFound { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
        }

        // Project config, or the file named on the command line.
        match cli_overrides.and_then(|cli| cli.config_file.as_deref()) {
            Some(explicit) => Self::merge_toml_file(&mut config, explicit)?,
            None => {
                let project_config_path = root.join(PROJECT_CONFIG_FILE);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &CohesionConfig) -> Result<(), ConfigError> {
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(rate) = config.graph.rate {
            if !(rate > 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "graph.rate".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(theta) = config.graph.theta {
            if !(theta >= 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "graph.theta".to_string(),
                    message: "must not be negative".to_string(),
                });
            }
        }
        if config.graph.updates == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "graph.updates".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(size) = config.graph.size_cm {
            if !(size > 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "graph.size_cm".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.cohesion/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".cohesion").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut CohesionConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CohesionConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut CohesionConfig, other: &CohesionConfig) {
        // Scan
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if !other.scan.extra_ignore.is_empty() {
            base.scan.extra_ignore = other.scan.extra_ignore.clone();
        }
        if other.scan.follow_symlinks.is_some() {
            base.scan.follow_symlinks = other.scan.follow_symlinks;
        }
        if other.scan.include_tests.is_some() {
            base.scan.include_tests = other.scan.include_tests;
        }

        // Format
        if other.format.indent.is_some() {
            base.format.indent = other.format.indent.clone();
        }

        // Graph
        if other.graph.repulsion.is_some() {
            base.graph.repulsion = other.graph.repulsion;
        }
        if other.graph.rate.is_some() {
            base.graph.rate = other.graph.rate;
        }
        if other.graph.updates.is_some() {
            base.graph.updates = other.graph.updates;
        }
        if other.graph.theta.is_some() {
            base.graph.theta = other.graph.theta;
        }
        if other.graph.size_cm.is_some() {
            base.graph.size_cm = other.graph.size_cm;
        }
        if other.graph.node_radius.is_some() {
            base.graph.node_radius = other.graph.node_radius;
        }
        if other.graph.font_size.is_some() {
            base.graph.font_size = other.graph.font_size;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `COHESION_SCAN_THREADS`, `COHESION_FORMAT_INDENT`, etc.
    fn apply_env_overrides(config: &mut CohesionConfig) {
        if let Ok(val) = std::env::var("COHESION_SCAN_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("COHESION_SCAN_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("COHESION_SCAN_INCLUDE_TESTS") {
            if let Ok(v) = val.parse::<bool>() {
                config.scan.include_tests = Some(v);
            }
        }
        if let Ok(val) = std::env::var("COHESION_FORMAT_INDENT") {
            config.format.indent = Some(val);
        }
        if let Ok(val) = std::env::var("COHESION_GRAPH_UPDATES") {
            if let Ok(v) = val.parse::<u32>() {
                config.graph.updates = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut CohesionConfig, cli: &CliOverrides) {
        if let Some(v) = cli.scan_threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = cli.scan_include_tests {
            config.scan.include_tests = Some(v);
        }
        if let Some(ref v) = cli.format_indent {
            config.format.indent = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
