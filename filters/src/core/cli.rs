use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_ENTITY, ENV_LENIENT, ENV_SQL_ALIAS};
use crate::filters::EntityType;

#[derive(Parser)]
#[command(name = "admin-filters")]
#[command(version, about = "Advanced filter tooling for admin user management", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Entity whose field catalog is used (users, clients, team_members)
    #[arg(long, short = 'e', global = true, env = ENV_ENTITY, value_parser = parse_entity)]
    pub entity: Option<EntityType>,

    /// Table alias prepended to columns in generated SQL
    #[arg(long, global = true, env = ENV_SQL_ALIAS)]
    pub alias: Option<String>,

    /// Accept operators and select values outside the field catalog
    #[arg(long, global = true, env = ENV_LENIENT)]
    pub lenient: bool,
}

/// Parse entity type from CLI/env string
fn parse_entity(s: &str) -> Result<EntityType, String> {
    s.to_lowercase().parse().map_err(|_| {
        format!(
            "Invalid entity '{}'. Valid options: users, clients, team_members",
            s
        )
    })
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// List the filterable fields of the entity
    Fields {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// List operators with their display labels
    Operators,
    /// Print a fresh, empty filter configuration
    New,
    /// Parse and validate a filter configuration (file path or - for stdin)
    Validate { input: String },
    /// Compile a filter configuration into a parameterized WHERE clause
    Sql { input: String },
    /// Parse a saved preset and print its summary
    Preset { input: String },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub entity: Option<EntityType>,
    pub alias: Option<String>,
    pub lenient: bool,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        entity: cli.entity,
        alias: cli.alias,
        lenient: cli.lenient,
    };
    (config, cli.command)
}
