//! Catalog-aware validation
//!
//! Edit operations trust the caller to offer only catalog operators and
//! values. [`validate`] is the hard check applied before a configuration is
//! stored or evaluated.

use super::catalog::{FieldCatalog, FilterField};
use super::error::FilterError;
use super::parser::FilterLimits;
use super::types::{AdvancedFilterConfig, FilterCondition, FilterGroup, FilterValueType};
use super::value::FilterValue;

/// Knobs for [`validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Reject operators outside the field's operator list
    pub strict_operators: bool,
    /// Reject select values outside the field's options
    pub strict_options: bool,
    pub limits: FilterLimits,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            strict_operators: true,
            strict_options: true,
            limits: FilterLimits::default(),
        }
    }
}

/// Check a configuration against `catalog`, returning the first violation
///
/// Unselected conditions are valid placeholders.
pub fn validate(
    config: &AdvancedFilterConfig,
    catalog: &FieldCatalog,
    options: &ValidationOptions,
) -> Result<(), FilterError> {
    if config.groups.is_empty() {
        return Err(FilterError::NoGroups);
    }
    options.limits.check(config)?;

    for (i, group) in config.groups.iter().enumerate() {
        validate_group(group, &format!("groups[{}]", i), catalog, options)?;
    }
    Ok(())
}

fn validate_group(
    group: &FilterGroup,
    path: &str,
    catalog: &FieldCatalog,
    options: &ValidationOptions,
) -> Result<(), FilterError> {
    if group.conditions.is_empty() {
        return Err(FilterError::EmptyGroup {
            path: path.to_string(),
        });
    }
    for (i, condition) in group.conditions.iter().enumerate() {
        validate_condition(
            condition,
            &format!("{}.conditions[{}]", path, i),
            catalog,
            options,
        )?;
    }
    for (i, nested) in group.nested_groups.iter().enumerate() {
        validate_group(
            nested,
            &format!("{}.nestedGroups[{}]", path, i),
            catalog,
            options,
        )?;
    }
    Ok(())
}

fn validate_condition(
    condition: &FilterCondition,
    path: &str,
    catalog: &FieldCatalog,
    options: &ValidationOptions,
) -> Result<(), FilterError> {
    if !condition.is_selected() {
        if condition.value_type != FilterValueType::Text {
            return Err(FilterError::ValueTypeOutOfSync {
                path: path.to_string(),
                field: String::new(),
                expected: FilterValueType::Text,
                actual: condition.value_type,
            });
        }
        return Ok(());
    }
    let field = catalog
        .get(&condition.field)
        .ok_or_else(|| FilterError::unknown_field(path, &condition.field))?;

    if condition.value_type != field.value_type {
        return Err(FilterError::ValueTypeOutOfSync {
            path: path.to_string(),
            field: field.name.clone(),
            expected: field.value_type,
            actual: condition.value_type,
        });
    }
    if options.strict_operators && !field.allows(condition.operator) {
        return Err(FilterError::OperatorNotAllowed {
            path: path.to_string(),
            field: field.name.clone(),
            operator: condition.operator,
        });
    }
    if condition.operator.is_existence() {
        return Ok(());
    }
    if !condition.value.fits(condition.value_type, condition.operator) {
        return Err(FilterError::value_mismatch(
            path,
            condition.value_type,
            condition.operator,
        ));
    }
    check_range(&condition.value, path)?;
    if options.strict_options {
        check_options(&condition.value, field, path)?;
    }
    Ok(())
}

fn check_range(value: &FilterValue, path: &str) -> Result<(), FilterError> {
    let inverted = match value {
        FilterValue::NumberRange(low, high) => low > high,
        FilterValue::DateRange(start, end) => start > end,
        _ => false,
    };
    if inverted {
        return Err(FilterError::invalid_value(
            path,
            "range start is after range end",
        ));
    }
    Ok(())
}

fn check_options(value: &FilterValue, field: &FilterField, path: &str) -> Result<(), FilterError> {
    match value
        .option_values()
        .into_iter()
        .find(|v| !field.has_option(v))
    {
        Some(unknown) => Err(FilterError::UnknownOption {
            path: path.to_string(),
            field: field.name.clone(),
            value: unknown.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::catalog::EntityType;
    use crate::domain::filters::operators::FilterOperator;

    fn users() -> &'static FieldCatalog {
        EntityType::Users.catalog()
    }

    fn config_with(conditions: Vec<FilterCondition>) -> AdvancedFilterConfig {
        AdvancedFilterConfig {
            groups: vec![FilterGroup {
                conditions,
                ..FilterGroup::new()
            }],
            ..AdvancedFilterConfig::new()
        }
    }

    fn role(operator: FilterOperator, value: FilterValue) -> FilterCondition {
        FilterCondition::new()
            .change_field("role", users())
            .change_operator(operator)
            .change_value(value)
            .unwrap()
    }

    #[test]
    fn test_fresh_configuration_is_valid() {
        let config = AdvancedFilterConfig::new();
        assert!(validate(&config, users(), &ValidationOptions::default()).is_ok());
    }

    #[test]
    fn test_accepts_selected_conditions() {
        let config = config_with(vec![
            role(
                FilterOperator::In,
                FilterValue::MultiSelected(vec!["ADMIN".into(), "STAFF".into()]),
            ),
            FilterCondition::new()
                .change_field("experienceYears", users())
                .change_operator(FilterOperator::Between)
                .change_value(FilterValue::NumberRange(2.0, 10.0))
                .unwrap(),
        ]);
        assert!(validate(&config, users(), &ValidationOptions::default()).is_ok());
    }

    #[test]
    fn test_rejects_operator_outside_field_list() {
        let config = config_with(vec![role(
            FilterOperator::Contains,
            FilterValue::Selected("ADMIN".into()),
        )]);
        let err = validate(&config, users(), &ValidationOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FilterError::OperatorNotAllowed {
                path: "groups[0].conditions[0]".to_string(),
                field: "role".to_string(),
                operator: FilterOperator::Contains,
            }
        );

        let lenient = ValidationOptions {
            strict_operators: false,
            ..ValidationOptions::default()
        };
        assert!(validate(&config, users(), &lenient).is_ok());
    }

    #[test]
    fn test_rejects_unknown_option() {
        let config = config_with(vec![role(
            FilterOperator::Eq,
            FilterValue::Selected("OWNER".into()),
        )]);
        let err = validate(&config, users(), &ValidationOptions::default()).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_OPTION");
    }

    #[test]
    fn test_rejects_unknown_field_with_nested_path() {
        let bogus = FilterCondition {
            field: "salary".to_string(),
            ..FilterCondition::new()
        };
        let nested = FilterGroup {
            conditions: vec![FilterCondition::new(), bogus],
            ..FilterGroup::new()
        };
        let config = AdvancedFilterConfig {
            groups: vec![FilterGroup {
                nested_groups: vec![nested],
                ..FilterGroup::new()
            }],
            ..AdvancedFilterConfig::new()
        };
        let err = validate(&config, users(), &ValidationOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FilterError::unknown_field("groups[0].nestedGroups[0].conditions[1]", "salary")
        );
    }

    #[test]
    fn test_rejects_out_of_sync_value_type() {
        let condition = FilterCondition {
            value_type: FilterValueType::Text,
            ..FilterCondition::new().change_field("hourlyRate", users())
        };
        let err = validate(&config_with(vec![condition]), users(), &ValidationOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), "VALUE_TYPE_OUT_OF_SYNC");
    }

    #[test]
    fn test_rejects_typed_placeholder() {
        let placeholder = FilterCondition {
            operator: FilterOperator::Gt,
            value: FilterValue::Number(5.0),
            value_type: FilterValueType::Number,
            ..FilterCondition::new()
        };
        let err = validate(&config_with(vec![placeholder]), users(), &ValidationOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::ValueTypeOutOfSync {
                path: "groups[0].conditions[0]".to_string(),
                field: String::new(),
                expected: FilterValueType::Text,
                actual: FilterValueType::Number,
            }
        );
    }

    #[test]
    fn test_rejects_non_finite_number() {
        let condition = FilterCondition {
            operator: FilterOperator::Gt,
            value: FilterValue::Number(f64::NAN),
            ..FilterCondition::new().change_field("hourlyRate", users())
        };
        let err = validate(&config_with(vec![condition]), users(), &ValidationOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), "VALUE_MISMATCH");
    }

    #[test]
    fn test_rejects_inverted_range() {
        let condition = FilterCondition {
            operator: FilterOperator::Between,
            value: FilterValue::NumberRange(10.0, 1.0),
            ..FilterCondition::new().change_field("hourlyRate", users())
        };
        let err = validate(&config_with(vec![condition]), users(), &ValidationOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_VALUE");
    }

    #[test]
    fn test_existence_operator_ignores_value() {
        let condition = FilterCondition {
            operator: FilterOperator::IsNull,
            value: FilterValue::Text("left over".into()),
            ..FilterCondition::new().change_field("hourlyRate", users())
        };
        let lenient = ValidationOptions {
            strict_operators: false,
            ..ValidationOptions::default()
        };
        assert!(validate(&config_with(vec![condition]), users(), &lenient).is_ok());
    }

    #[test]
    fn test_rejects_empty_group() {
        let err = validate(&config_with(vec![]), users(), &ValidationOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::EmptyGroup {
                path: "groups[0]".to_string()
            }
        );
    }

    #[test]
    fn test_enforces_depth_limit() {
        let mut group = FilterGroup::new();
        for _ in 0..3 {
            group = FilterGroup {
                nested_groups: vec![group],
                ..FilterGroup::new()
            };
        }
        let config = AdvancedFilterConfig {
            groups: vec![group],
            ..AdvancedFilterConfig::new()
        };
        let options = ValidationOptions {
            limits: FilterLimits {
                max_depth: 3,
                ..FilterLimits::default()
            },
            ..ValidationOptions::default()
        };
        assert_eq!(
            validate(&config, users(), &options).unwrap_err(),
            FilterError::TooDeep { depth: 4, max: 3 }
        );
    }
}
