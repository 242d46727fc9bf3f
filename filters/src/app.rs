//! Core application

use std::fmt::Write as _;

use anyhow::{Context, Result};

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{ENV_LOG, LOG_TARGET};
use crate::filters::{
    AdvancedFilterConfig, FieldCatalog, FilterError, FilterOperator, FilterPreset, SqlWhere,
    compile, parse_config, parse_preset, validate,
};
use crate::utils::file::read_input;

pub struct CoreApp {
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self {
            config: AppConfig::load(&cli_config)?,
        };
        let output = app.execute(&command)?;
        print!("{}", output);
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", LOG_TARGET);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // Logs go to stderr so command output stays pipeable
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    fn catalog(&self) -> &'static FieldCatalog {
        self.config.entity.catalog()
    }

    /// Run a command and return what it prints
    pub fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Fields { json } => self.render_fields(*json),
            Commands::Operators => Ok(render_operators()),
            Commands::New => Ok(serde_json::to_string_pretty(&AdvancedFilterConfig::new())? + "\n"),
            Commands::Validate { input } => {
                let config = self.check_config(&read_input(input)?)?;
                Ok(format!(
                    "OK: {} group(s), {} condition(s), depth {}\n",
                    config.groups.len(),
                    config.condition_count(),
                    config.depth()
                ))
            }
            Commands::Sql { input } => {
                let sql = self.compile_sql(&read_input(input)?)?;
                Ok(render_sql(&sql))
            }
            Commands::Preset { input } => {
                let preset = self.check_preset(&read_input(input)?)?;
                render_preset(&preset)
            }
        }
    }

    fn render_fields(&self, json: bool) -> Result<String> {
        let catalog = self.catalog();
        if json {
            return Ok(serde_json::to_string_pretty(catalog)? + "\n");
        }

        let mut out = String::new();
        writeln!(out, "{} ({} fields)", self.config.entity, catalog.len())?;
        for field in catalog.fields() {
            let operators: Vec<&str> = field.operators.iter().map(|op| op.as_str()).collect();
            writeln!(
                out,
                "  {:<18} {:<12} {:<12} {}",
                field.name,
                field.value_type.as_str(),
                field.label,
                operators.join(", ")
            )?;
            if let Some(options) = &field.options {
                let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
                writeln!(out, "  {:<18} options: {}", "", values.join(", "))?;
            }
        }
        Ok(out)
    }

    /// Parse a configuration and validate it against the active catalog
    pub fn check_config(&self, json: &str) -> Result<AdvancedFilterConfig> {
        let catalog = self.catalog();
        let config = parse_config(json, catalog, &self.config.validation.limits)
            .map_err(describe)?;
        validate(&config, catalog, &self.config.validation).map_err(describe)?;
        tracing::debug!(
            entity = %self.config.entity,
            conditions = config.condition_count(),
            "Configuration is valid"
        );
        Ok(config)
    }

    pub fn compile_sql(&self, json: &str) -> Result<SqlWhere> {
        let config = self.check_config(json)?;
        compile(&config, self.catalog(), &self.config.sql).map_err(describe)
    }

    /// Parse a preset and validate its configuration against its own catalog
    pub fn check_preset(&self, json: &str) -> Result<FilterPreset> {
        let preset = parse_preset(json, &self.config.validation.limits).map_err(describe)?;
        let catalog = preset
            .catalog()
            .with_context(|| format!("Preset '{}' has no field catalog", preset.name))?;
        validate(&preset.filter_config, catalog, &self.config.validation).map_err(describe)?;
        Ok(preset)
    }
}

fn describe(e: FilterError) -> anyhow::Error {
    anyhow::anyhow!("[{}] {}", e.code(), e)
}

fn render_operators() -> String {
    let mut out = String::new();
    for op in FilterOperator::ALL {
        let kind = if op.is_existence() {
            "no value"
        } else if op.is_list() {
            "list"
        } else if op.is_range() {
            "range"
        } else {
            "single"
        };
        out.push_str(&format!("  {:<12} {:<18} {}\n", op.as_str(), op.label(), kind));
    }
    out
}

fn render_sql(sql: &SqlWhere) -> String {
    let mut out = format!("WHERE {}\n", sql.clause);
    for (i, param) in sql.params.iter().enumerate() {
        out.push_str(&format!("  ${} = {:?}\n", i + 1, param));
    }
    out
}

fn render_preset(preset: &FilterPreset) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{} [{}]", preset.name, preset.entity_type)?;
    if let Some(description) = &preset.description {
        writeln!(out, "  {}", description)?;
    }
    writeln!(
        out,
        "  visibility: {}{}",
        if preset.is_public { "public" } else { "private" },
        if preset.is_default { ", default" } else { "" }
    )?;
    writeln!(
        out,
        "  filter: {} group(s), {} condition(s)",
        preset.filter_config.groups.len(),
        preset.filter_config.condition_count()
    )?;
    writeln!(out, "  used: {} time(s)", preset.usage_count)?;
    if let Some(at) = preset.last_used_at {
        writeln!(out, "  last used: {}", at.to_rfc3339())?;
    }
    Ok(out)
}
