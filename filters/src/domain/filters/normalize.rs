//! Structural healing for configurations received over the wire

use super::catalog::FieldCatalog;
use super::types::{AdvancedFilterConfig, FilterCondition, FilterGroup, FilterValueType};
use super::value::FilterValue;

/// Restore the tree invariants
///
/// - a configuration without groups gets one fresh group
/// - a group without conditions, at any depth, gets one fresh condition
/// - a selected condition's value type follows its catalog field; a value
///   that no longer fits is reset the same way a field change resets it
/// - an unselected condition is typed `text`
///
/// Conditions naming fields outside the catalog are kept for validation to
/// report.
pub fn normalize(config: &AdvancedFilterConfig, catalog: &FieldCatalog) -> AdvancedFilterConfig {
    let mut groups: Vec<FilterGroup> = config
        .groups
        .iter()
        .map(|g| normalize_group(g, catalog))
        .collect();
    if groups.is_empty() {
        tracing::debug!("Configuration had no groups, inserting one");
        groups.push(FilterGroup::new());
    }
    AdvancedFilterConfig {
        groups,
        ..config.clone()
    }
}

fn normalize_group(group: &FilterGroup, catalog: &FieldCatalog) -> FilterGroup {
    let mut conditions: Vec<FilterCondition> = group
        .conditions
        .iter()
        .map(|c| sync_value_type(c, catalog))
        .collect();
    if conditions.is_empty() {
        tracing::debug!(group = %group.id, "Group had no conditions, inserting placeholder");
        conditions.push(FilterCondition::new());
    }
    FilterGroup {
        id: group.id.clone(),
        logic: group.logic,
        conditions,
        nested_groups: group
            .nested_groups
            .iter()
            .map(|g| normalize_group(g, catalog))
            .collect(),
    }
}

fn sync_value_type(condition: &FilterCondition, catalog: &FieldCatalog) -> FilterCondition {
    let value_type = if condition.is_selected() {
        match catalog.get(&condition.field) {
            Some(field) => field.value_type,
            None => return condition.clone(),
        }
    } else {
        FilterValueType::Text
    };
    if value_type == condition.value_type {
        return condition.clone();
    }

    tracing::debug!(
        condition = %condition.id,
        field = %condition.field,
        from = %condition.value_type,
        to = %value_type,
        "Re-syncing value type"
    );
    let value = if condition.value.fits(value_type, condition.operator) {
        condition.value.clone()
    } else {
        FilterValue::empty_for(value_type)
    };
    FilterCondition {
        value,
        value_type,
        ..condition.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::catalog::EntityType;
    use crate::domain::filters::operators::FilterOperator;
    use crate::domain::filters::types::LogicOperator;

    fn users() -> &'static FieldCatalog {
        EntityType::Users.catalog()
    }

    fn empty_group(id: &str) -> FilterGroup {
        FilterGroup {
            id: id.to_string(),
            logic: LogicOperator::Or,
            conditions: vec![],
            nested_groups: vec![],
        }
    }

    #[test]
    fn test_inserts_missing_group() {
        let config = AdvancedFilterConfig {
            logic: LogicOperator::Or,
            groups: vec![],
            metadata: None,
        };
        let normalized = normalize(&config, users());
        assert_eq!(normalized.logic, LogicOperator::Or);
        assert_eq!(normalized.groups.len(), 1);
        assert_eq!(normalized.groups[0].conditions.len(), 1);
    }

    #[test]
    fn test_heals_empty_groups_at_every_depth() {
        let mut outer = empty_group("group-outer");
        outer.nested_groups.push(empty_group("group-inner"));
        let config = AdvancedFilterConfig {
            groups: vec![outer],
            ..AdvancedFilterConfig::new()
        };

        let normalized = normalize(&config, users());
        let outer = &normalized.groups[0];
        assert_eq!(outer.id, "group-outer");
        assert_eq!(outer.logic, LogicOperator::Or);
        assert_eq!(outer.conditions.len(), 1);
        assert_eq!(outer.nested_groups[0].id, "group-inner");
        assert_eq!(outer.nested_groups[0].conditions.len(), 1);
    }

    #[test]
    fn test_resyncs_value_type_and_drops_stale_value() {
        let stale = FilterCondition {
            field: "hourlyRate".to_string(),
            operator: FilterOperator::Gt,
            value: FilterValue::Text("cheap".to_string()),
            value_type: FilterValueType::Text,
            ..FilterCondition::new()
        };
        let fitting = FilterCondition {
            field: "role".to_string(),
            value: FilterValue::Empty,
            value_type: FilterValueType::Text,
            ..FilterCondition::new()
        };
        let group = FilterGroup {
            conditions: vec![stale, fitting],
            ..FilterGroup::new()
        };
        let config = AdvancedFilterConfig {
            groups: vec![group],
            ..AdvancedFilterConfig::new()
        };

        let normalized = normalize(&config, users());
        let conditions = &normalized.groups[0].conditions;
        assert_eq!(conditions[0].value_type, FilterValueType::Number);
        assert_eq!(conditions[0].value, FilterValue::Empty);
        assert_eq!(conditions[0].operator, FilterOperator::Gt);
        assert_eq!(conditions[1].value_type, FilterValueType::Select);
    }

    #[test]
    fn test_unselected_condition_is_typed_text() {
        let json = r#"{"groups": [{"id": "group-1", "conditions": [
            {"id": "cond-1", "field": "", "operator": "gt", "value": 5, "valueType": "number"}
        ]}]}"#;
        let config: AdvancedFilterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.groups[0].conditions[0].value, FilterValue::Number(5.0));

        let normalized = normalize(&config, users());
        let condition = &normalized.groups[0].conditions[0];
        assert_eq!(condition.value_type, FilterValueType::Text);
        assert_eq!(condition.value, FilterValue::Empty);
        assert_eq!(condition.operator, FilterOperator::Gt);
        assert_eq!(condition.id, "cond-1");
    }

    #[test]
    fn test_leaves_valid_configuration_untouched() {
        let config = AdvancedFilterConfig::new();
        let group = config.groups[0].clone();
        let condition = group.conditions[0].change_field("status", users());
        let config = config.replace_group(
            &group.id,
            group.replace_condition(&condition.id, condition.clone()),
        );
        assert_eq!(normalize(&config, users()), config);
    }
}
