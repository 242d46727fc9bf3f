//! Saved filter presets
//!
//! A preset is the persistence-facing record around a configuration. It is
//! stored by an external store keyed by `(tenantId, entityType, id)` and is
//! expanded into a configuration before use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::catalog::{EntityType, FieldCatalog};
use super::error::FilterError;
use super::normalize::normalize;
use super::types::AdvancedFilterConfig;

/// Named, reusable filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Selects the field catalog (`users`, `clients`, `team_members`)
    pub entity_type: String,
    pub filter_config: AdvancedFilterConfig,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 64))]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32))]
    pub color: Option<String>,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FilterPreset {
    /// Unsaved preset; the store assigns `id` and `tenantId`
    pub fn new(
        name: impl Into<String>,
        entity: EntityType,
        filter_config: AdvancedFilterConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            tenant_id: None,
            name: name.into(),
            description: None,
            entity_type: entity.as_str().to_string(),
            filter_config,
            is_public: false,
            is_default: false,
            icon: None,
            color: None,
            usage_count: 0,
            last_used_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Catalog for this preset's entity type, if it is a known one
    pub fn catalog(&self) -> Option<&'static FieldCatalog> {
        FieldCatalog::for_entity(&self.entity_type)
    }

    /// Configuration ready for editing or evaluation
    pub fn expand(&self) -> Result<AdvancedFilterConfig, FilterError> {
        let catalog = self
            .catalog()
            .ok_or_else(|| FilterError::UnknownEntity(self.entity_type.clone()))?;
        Ok(normalize(&self.filter_config, catalog))
    }

    pub fn record_usage(&mut self, at: DateTime<Utc>) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.last_used_at = Some(at);
    }

    /// Replace the stored configuration; evaluation metadata is dropped
    pub fn update_config(&mut self, config: AdvancedFilterConfig, at: DateTime<Utc>) {
        self.filter_config = AdvancedFilterConfig {
            metadata: None,
            ..config
        };
        self.updated_at = Some(at);
    }
}
