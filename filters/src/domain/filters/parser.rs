//! Filter parsing
//!
//! Parses JSON filter configurations and presets with size and shape limits,
//! then restores the tree invariants.

use validator::Validate;

use super::catalog::FieldCatalog;
use super::error::FilterError;
use super::normalize::normalize;
use super::preset::FilterPreset;
use super::types::AdvancedFilterConfig;

/// Maximum size of filter JSON in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of conditions across the whole tree
pub const MAX_CONDITIONS: usize = 200;

/// Maximum group nesting depth, counting top-level groups
pub const MAX_DEPTH: usize = 8;

/// Bounds applied to incoming configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterLimits {
    pub max_json_bytes: usize,
    pub max_conditions: usize,
    pub max_depth: usize,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            max_json_bytes: MAX_FILTER_JSON_SIZE,
            max_conditions: MAX_CONDITIONS,
            max_depth: MAX_DEPTH,
        }
    }
}

impl FilterLimits {
    fn check_size(&self, json_str: &str) -> Result<(), FilterError> {
        if json_str.len() > self.max_json_bytes {
            return Err(FilterError::TooLarge {
                max: self.max_json_bytes,
            });
        }
        Ok(())
    }

    /// Check condition count and nesting depth
    pub fn check(&self, config: &AdvancedFilterConfig) -> Result<(), FilterError> {
        let count = config.condition_count();
        if count > self.max_conditions {
            return Err(FilterError::TooManyConditions {
                count,
                max: self.max_conditions,
            });
        }
        let depth = config.depth();
        if depth > self.max_depth {
            return Err(FilterError::TooDeep {
                depth,
                max: self.max_depth,
            });
        }
        Ok(())
    }
}

/// Parse a filter configuration
///
/// Validates JSON size, parses, normalizes against `catalog` and checks
/// limits. Catalog consistency is left to
/// [`validate`](super::validate::validate).
pub fn parse_config(
    json_str: &str,
    catalog: &FieldCatalog,
    limits: &FilterLimits,
) -> Result<AdvancedFilterConfig, FilterError> {
    limits.check_size(json_str)?;

    let config: AdvancedFilterConfig =
        serde_json::from_str(json_str).map_err(|e| FilterError::InvalidJson(e.to_string()))?;

    let config = normalize(&config, catalog);
    limits.check(&config)?;

    tracing::debug!(
        groups = config.groups.len(),
        conditions = config.condition_count(),
        "Parsed filter configuration"
    );
    Ok(config)
}

/// Parse a filter preset record
///
/// The preset's entity type must name a known catalog; its configuration
/// is normalized against that catalog.
pub fn parse_preset(json_str: &str, limits: &FilterLimits) -> Result<FilterPreset, FilterError> {
    limits.check_size(json_str)?;

    let mut preset: FilterPreset =
        serde_json::from_str(json_str).map_err(|e| FilterError::InvalidJson(e.to_string()))?;
    preset
        .validate()
        .map_err(|e| FilterError::InvalidPreset(e.to_string()))?;

    let catalog = preset
        .catalog()
        .ok_or_else(|| FilterError::UnknownEntity(preset.entity_type.clone()))?;
    preset.filter_config = normalize(&preset.filter_config, catalog);
    limits.check(&preset.filter_config)?;

    tracing::debug!(
        name = %preset.name,
        entity = %preset.entity_type,
        "Parsed filter preset"
    );
    Ok(preset)
}
