//! Filter tree types
//!
//! An [`AdvancedFilterConfig`] combines [`FilterGroup`]s with a top-level
//! logic operator. Each group combines its [`FilterCondition`]s and nested
//! groups with its own logic operator. Wire names are camelCase.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::FilterError;
use super::operators::FilterOperator;
use super::value::FilterValue;

/// Value type of a filterable field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterValueType {
    #[default]
    Text,
    Select,
    MultiSelect,
    Date,
    DateRange,
    Number,
    Boolean,
}

impl FilterValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Select => "select",
            Self::MultiSelect => "multiSelect",
            Self::Date => "date",
            Self::DateRange => "dateRange",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Types whose values come from an enumerated option list
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }
}

impl fmt::Display for FilterValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinator for groups and the configuration root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicOperator {
    #[default]
    And,
    Or,
}

impl LogicOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single predicate: field, operator and value
///
/// `field` is empty while the condition is unselected. `value_type` mirrors
/// the selected field's declared type and defaults to `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ConditionWire")]
pub struct FilterCondition {
    pub id: String,
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
    pub value_type: FilterValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Untyped wire form, decoded into [`FilterValue`] using the sibling tags
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConditionWire {
    id: String,
    #[serde(default)]
    field: String,
    #[serde(default)]
    operator: FilterOperator,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    value_type: FilterValueType,
    #[serde(default)]
    label: Option<String>,
}

impl TryFrom<ConditionWire> for FilterCondition {
    type Error = FilterError;

    fn try_from(wire: ConditionWire) -> Result<Self, Self::Error> {
        let value = FilterValue::from_json(&wire.value, wire.value_type, wire.operator)
            .map_err(|reason| {
                FilterError::invalid_value(format!("condition {}", wire.id), reason)
            })?;
        Ok(Self {
            id: wire.id,
            field: wire.field,
            operator: wire.operator,
            value,
            value_type: wire.value_type,
            label: wire.label,
        })
    }
}

/// Logic combinator over conditions and nested groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    pub id: String,
    #[serde(default)]
    pub logic: LogicOperator,
    /// Never empty once constructed or normalized
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_groups: Vec<FilterGroup>,
}

/// Informational result of the last evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<u64>,
}

/// Root of the filter tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilterConfig {
    #[serde(default)]
    pub logic: LogicOperator,
    #[serde(default)]
    pub groups: Vec<FilterGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FilterMetadata>,
}
