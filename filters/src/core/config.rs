use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME};
use crate::filters::{EntityType, FilterLimits, SqlOptions, ValidationOptions};
use crate::utils::file::expand_path;

/// Limits section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LimitsFileConfig {
    pub max_json_bytes: Option<usize>,
    pub max_conditions: Option<usize>,
    pub max_depth: Option<usize>,
}

/// Validation section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ValidationFileConfig {
    pub strict_operators: Option<bool>,
    pub strict_options: Option<bool>,
}

/// SQL generation section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SqlFileConfig {
    pub alias: Option<String>,
    /// Field name → column name
    pub columns: Option<HashMap<String, String>>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub entity: Option<EntityType>,
    pub limits: Option<LimitsFileConfig>,
    pub validation: Option<ValidationFileConfig>,
    pub sql: Option<SqlFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if other.entity.is_some() {
            tracing::trace!(entity = ?other.entity, "Merging entity");
            self.entity = other.entity;
        }

        if let Some(limits) = other.limits {
            let current = self.limits.get_or_insert_with(LimitsFileConfig::default);
            if limits.max_json_bytes.is_some() {
                current.max_json_bytes = limits.max_json_bytes;
            }
            if limits.max_conditions.is_some() {
                current.max_conditions = limits.max_conditions;
            }
            if limits.max_depth.is_some() {
                current.max_depth = limits.max_depth;
            }
        }

        if let Some(validation) = other.validation {
            let current = self
                .validation
                .get_or_insert_with(ValidationFileConfig::default);
            if validation.strict_operators.is_some() {
                current.strict_operators = validation.strict_operators;
            }
            if validation.strict_options.is_some() {
                current.strict_options = validation.strict_options;
            }
        }

        // Column maps merge key by key
        if let Some(sql) = other.sql {
            let current = self.sql.get_or_insert_with(SqlFileConfig::default);
            if sql.alias.is_some() {
                tracing::trace!(alias = ?sql.alias, "Merging sql.alias");
                current.alias = sql.alias;
            }
            if let Some(columns) = sql.columns {
                current.columns.get_or_insert_with(HashMap::new).extend(columns);
            }
        }
    }
}

/// Resolved application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub entity: EntityType,
    pub validation: ValidationOptions,
    pub sql: SqlOptions,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.admin-filters/admin-filters.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::resolve(file_config, cli);
        config.validate()?;
        tracing::debug!(
            entity = %config.entity,
            strict_operators = config.validation.strict_operators,
            strict_options = config.validation.strict_options,
            "Configuration resolved"
        );
        Ok(config)
    }

    /// Layer defaults, merged file config and CLI/env overrides
    fn resolve(file_config: FileConfig, cli: &CliConfig) -> Self {
        let file_limits = file_config.limits.unwrap_or_default();
        let file_validation = file_config.validation.unwrap_or_default();
        let file_sql = file_config.sql.unwrap_or_default();

        let entity = cli.entity.or(file_config.entity).unwrap_or_default();

        let defaults = FilterLimits::default();
        let limits = FilterLimits {
            max_json_bytes: file_limits
                .max_json_bytes
                .unwrap_or(defaults.max_json_bytes),
            max_conditions: file_limits
                .max_conditions
                .unwrap_or(defaults.max_conditions),
            max_depth: file_limits.max_depth.unwrap_or(defaults.max_depth),
        };

        // --lenient wins over strict settings from any file
        let validation = ValidationOptions {
            strict_operators: !cli.lenient && file_validation.strict_operators.unwrap_or(true),
            strict_options: !cli.lenient && file_validation.strict_options.unwrap_or(true),
            limits,
        };

        let sql = SqlOptions {
            alias: cli.alias.clone().or(file_sql.alias).unwrap_or_default(),
            columns: file_sql.columns.unwrap_or_default(),
        };

        Self {
            entity,
            validation,
            sql,
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let limits = &self.validation.limits;
        if limits.max_json_bytes == 0 {
            anyhow::bail!("Configuration error: limits.max_json_bytes must be greater than 0");
        }
        if limits.max_conditions == 0 {
            anyhow::bail!("Configuration error: limits.max_conditions must be greater than 0");
        }
        if limits.max_depth == 0 {
            anyhow::bail!("Configuration error: limits.max_depth must be greater than 0");
        }

        if !self.sql.alias.is_empty() && !is_identifier(&self.sql.alias) {
            anyhow::bail!(
                "Configuration error: sql.alias must be a plain SQL identifier (got '{}')",
                self.sql.alias
            );
        }
        for (field, column) in &self.sql.columns {
            if !is_identifier(column) {
                anyhow::bail!(
                    "Configuration error: sql.columns.{} must be a plain SQL identifier (got '{}')",
                    field,
                    column
                );
            }
        }
        Ok(())
    }
}

/// Get the profile config path (~/.admin-filters/admin-filters.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Column names and aliases end up verbatim in SQL
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
