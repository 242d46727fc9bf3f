// =============================================================================
// Application Identity
// =============================================================================

/// Crate name as it appears in tracing targets
pub const LOG_TARGET: &str = "admin_filters";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".admin-filters";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "admin-filters.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "ADMIN_FILTERS_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "ADMIN_FILTERS_LOG";

/// Environment variable for the entity type whose catalog is used
pub const ENV_ENTITY: &str = "ADMIN_FILTERS_ENTITY";

/// Environment variable for the table alias in generated SQL
pub const ENV_SQL_ALIAS: &str = "ADMIN_FILTERS_SQL_ALIAS";

/// Environment variable to relax operator and option checks
pub const ENV_LENIENT: &str = "ADMIN_FILTERS_LENIENT";
