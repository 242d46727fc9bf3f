//! Construction and editing of the filter tree
//!
//! Every operation takes `&self` and returns a new value, leaving the input
//! untouched. Groups always keep at least one condition and configurations
//! at least one group; removals insert a fresh placeholder instead of
//! leaving them empty.

use chrono::{DateTime, Utc};

use super::catalog::FieldCatalog;
use super::error::FilterError;
use super::ids;
use super::operators::FilterOperator;
use super::types::{
    AdvancedFilterConfig, FilterCondition, FilterGroup, FilterMetadata, FilterValueType,
    LogicOperator,
};
use super::value::FilterValue;

// =============================================================================
// Conditions
// =============================================================================

impl FilterCondition {
    /// Unselected condition with the universal defaults (`eq`, `text`)
    pub fn new() -> Self {
        Self {
            id: ids::condition_id(),
            field: String::new(),
            operator: FilterOperator::Eq,
            value: FilterValue::Empty,
            value_type: FilterValueType::Text,
            label: None,
        }
    }

    pub fn is_selected(&self) -> bool {
        !self.field.is_empty()
    }

    /// Select a field from `catalog`
    ///
    /// Operator, value type and value are reset to the field's defaults so
    /// nothing from the previous field survives. Unknown names leave the
    /// condition unchanged.
    pub fn change_field(&self, name: &str, catalog: &FieldCatalog) -> Self {
        let Some(field) = catalog.get(name) else {
            tracing::debug!(condition = %self.id, field = name, "Ignoring unknown field");
            return self.clone();
        };
        Self {
            field: field.name.clone(),
            operator: field.default_operator(),
            value: FilterValue::empty_for(field.value_type),
            value_type: field.value_type,
            ..self.clone()
        }
    }

    /// Replace the operator
    ///
    /// Callers offer only operators from the selected field's list; this
    /// does not re-check membership and keeps the current value.
    pub fn change_operator(&self, operator: FilterOperator) -> Self {
        Self {
            operator,
            ..self.clone()
        }
    }

    /// Replace the value, rejecting variants that do not fit the current
    /// value type and operator
    pub fn change_value(&self, value: FilterValue) -> Result<Self, FilterError> {
        if !value.fits(self.value_type, self.operator) {
            return Err(FilterError::value_mismatch(
                format!("condition {}", self.id),
                self.value_type,
                self.operator,
            ));
        }
        Ok(Self {
            value,
            ..self.clone()
        })
    }
}

impl Default for FilterCondition {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Groups
// =============================================================================

impl FilterGroup {
    /// `AND` group holding one unselected condition
    pub fn new() -> Self {
        Self {
            id: ids::group_id(),
            logic: LogicOperator::And,
            conditions: vec![FilterCondition::new()],
            nested_groups: Vec::new(),
        }
    }

    pub fn toggle_logic(&self) -> Self {
        Self {
            logic: self.logic.toggled(),
            ..self.clone()
        }
    }

    /// Swap the condition with `condition_id`; a missing id is a no-op
    pub fn replace_condition(&self, condition_id: &str, updated: FilterCondition) -> Self {
        let mut group = self.clone();
        match group.conditions.iter_mut().find(|c| c.id == condition_id) {
            Some(slot) => *slot = updated,
            None => {
                tracing::debug!(group = %self.id, condition = condition_id, "Condition not found");
            }
        }
        group
    }

    /// Drop the condition with `condition_id`, keeping at least one
    pub fn remove_condition(&self, condition_id: &str) -> Self {
        let mut conditions: Vec<FilterCondition> = self
            .conditions
            .iter()
            .filter(|c| c.id != condition_id)
            .cloned()
            .collect();
        if conditions.is_empty() {
            conditions.push(FilterCondition::new());
        }
        Self {
            conditions,
            ..self.clone()
        }
    }

    /// Append an unselected condition
    pub fn add_condition(&self) -> Self {
        let mut group = self.clone();
        group.conditions.push(FilterCondition::new());
        group
    }

    pub fn add_nested_group(&self) -> Self {
        let mut group = self.clone();
        group.nested_groups.push(FilterGroup::new());
        group
    }

    /// Swap a direct child group; a missing id is a no-op
    pub fn replace_nested_group(&self, group_id: &str, updated: FilterGroup) -> Self {
        let mut group = self.clone();
        if let Some(slot) = group.nested_groups.iter_mut().find(|g| g.id == group_id) {
            *slot = updated;
        }
        group
    }

    /// Drop a direct child group; a group without children is flat
    pub fn remove_nested_group(&self, group_id: &str) -> Self {
        let mut group = self.clone();
        group.nested_groups.retain(|g| g.id != group_id);
        group
    }

    /// Conditions in this group and all nested groups
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
            + self
                .nested_groups
                .iter()
                .map(FilterGroup::condition_count)
                .sum::<usize>()
    }

    /// Levels of groups, counting this one
    pub fn depth(&self) -> usize {
        1 + self
            .nested_groups
            .iter()
            .map(FilterGroup::depth)
            .max()
            .unwrap_or(0)
    }
}

impl Default for FilterGroup {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace the group with `group_id` anywhere below `groups`
fn replace_in(
    groups: &[FilterGroup],
    group_id: &str,
    updated: &FilterGroup,
) -> Option<Vec<FilterGroup>> {
    for (i, group) in groups.iter().enumerate() {
        let replacement = if group.id == group_id {
            Some(updated.clone())
        } else {
            replace_in(&group.nested_groups, group_id, updated).map(|nested_groups| FilterGroup {
                nested_groups,
                ..group.clone()
            })
        };
        if let Some(replacement) = replacement {
            let mut out = groups.to_vec();
            out[i] = replacement;
            return Some(out);
        }
    }
    None
}

// =============================================================================
// Configuration
// =============================================================================

impl AdvancedFilterConfig {
    /// `AND` configuration holding one fresh group
    pub fn new() -> Self {
        Self {
            logic: LogicOperator::And,
            groups: vec![FilterGroup::new()],
            metadata: None,
        }
    }

    pub fn toggle_logic(&self) -> Self {
        Self {
            logic: self.logic.toggled(),
            ..self.clone()
        }
    }

    pub fn add_group(&self) -> Self {
        let mut config = self.clone();
        config.groups.push(FilterGroup::new());
        config
    }

    /// Swap the group with `group_id` at any depth; a missing id is a no-op
    pub fn replace_group(&self, group_id: &str, updated: FilterGroup) -> Self {
        match replace_in(&self.groups, group_id, &updated) {
            Some(groups) => Self {
                groups,
                ..self.clone()
            },
            None => {
                tracing::debug!(group = group_id, "Group not found");
                self.clone()
            }
        }
    }

    /// Drop a top-level group, keeping at least one
    pub fn remove_group(&self, group_id: &str) -> Self {
        let mut groups: Vec<FilterGroup> = self
            .groups
            .iter()
            .filter(|g| g.id != group_id)
            .cloned()
            .collect();
        if groups.is_empty() {
            groups.push(FilterGroup::new());
        }
        Self {
            groups,
            ..self.clone()
        }
    }

    /// Record an evaluation result; never changes the filter itself
    pub fn with_result(&self, applied_at: DateTime<Utc>, result_count: u64) -> Self {
        Self {
            metadata: Some(FilterMetadata {
                applied_at: Some(applied_at),
                result_count: Some(result_count),
            }),
            ..self.clone()
        }
    }

    pub fn condition_count(&self) -> usize {
        self.groups.iter().map(FilterGroup::condition_count).sum()
    }

    pub fn depth(&self) -> usize {
        self.groups.iter().map(FilterGroup::depth).max().unwrap_or(0)
    }
}

impl Default for AdvancedFilterConfig {
    fn default() -> Self {
        Self::new()
    }
}
