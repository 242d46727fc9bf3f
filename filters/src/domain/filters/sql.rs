//! SQL generation for filter configurations
//!
//! Walks the tree depth first and builds a parameterized `WHERE` clause.
//! Column names come from the field catalog (whitelist), optionally mapped
//! and prefixed with a table alias. Values are always bound as `?`.

use std::collections::HashMap;

use crate::utils::sql::escape_like_pattern;

use super::catalog::FieldCatalog;
use super::error::FilterError;
use super::operators::FilterOperator;
use super::types::{AdvancedFilterConfig, FilterCondition, FilterGroup, LogicOperator};
use super::value::FilterValue;

/// Column mapping and alias for generated SQL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlOptions {
    /// Prepended to column names (e.g. "u" → "u.email"); empty for none
    pub alias: String,
    /// Field name → column name; unmapped fields use their own name
    pub columns: HashMap<String, String>,
}

impl SqlOptions {
    fn column(&self, field: &str) -> String {
        let col = self.columns.get(field).map(String::as_str).unwrap_or(field);
        if self.alias.is_empty() {
            col.to_string()
        } else {
            format!("{}.{}", self.alias, col)
        }
    }
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<String>,
}

/// Generated `WHERE` clause and its bound parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlWhere {
    pub clause: String,
    pub params: Vec<String>,
}

/// Compile a configuration into a `WHERE` clause fragment
///
/// Unselected conditions and conditions still waiting for a value are
/// skipped; a tree with nothing to filter yields `1=1`.
pub fn compile(
    config: &AdvancedFilterConfig,
    catalog: &FieldCatalog,
    options: &SqlOptions,
) -> Result<SqlWhere, FilterError> {
    let mut params = SqlParams::default();
    let mut parts = Vec::with_capacity(config.groups.len());
    for (i, group) in config.groups.iter().enumerate() {
        let path = format!("groups[{}]", i);
        if let Some(sql) = group_sql(group, &path, catalog, options, &mut params)? {
            parts.push(sql);
        }
    }

    let clause = combine(parts, config.logic).unwrap_or_else(|| "1=1".to_string());
    tracing::trace!(clause = %clause, params = params.values.len(), "Compiled filter");
    Ok(SqlWhere {
        clause,
        params: params.values,
    })
}

fn group_sql(
    group: &FilterGroup,
    path: &str,
    catalog: &FieldCatalog,
    options: &SqlOptions,
    params: &mut SqlParams,
) -> Result<Option<String>, FilterError> {
    let mut parts = Vec::new();
    for (i, condition) in group.conditions.iter().enumerate() {
        let path = format!("{}.conditions[{}]", path, i);
        if let Some(sql) = condition_sql(condition, &path, catalog, options, params)? {
            parts.push(sql);
        }
    }
    for (i, nested) in group.nested_groups.iter().enumerate() {
        let path = format!("{}.nestedGroups[{}]", path, i);
        if let Some(sql) = group_sql(nested, &path, catalog, options, params)? {
            parts.push(sql);
        }
    }
    Ok(combine(parts, group.logic))
}

/// Join parts with the logic operator, parenthesized when there are several
fn combine(mut parts: Vec<String>, logic: LogicOperator) -> Option<String> {
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => {
            let separator = format!(" {} ", logic.as_str());
            Some(format!("({})", parts.join(separator.as_str())))
        }
    }
}

fn condition_sql(
    condition: &FilterCondition,
    path: &str,
    catalog: &FieldCatalog,
    options: &SqlOptions,
    params: &mut SqlParams,
) -> Result<Option<String>, FilterError> {
    if !condition.is_selected() {
        return Ok(None);
    }
    let field = catalog
        .get(&condition.field)
        .ok_or_else(|| FilterError::unknown_field(path, &condition.field))?;
    let col = options.column(&field.name);
    let mismatch = || FilterError::value_mismatch(path, condition.value_type, condition.operator);

    let value = &condition.value;
    let sql = match condition.operator {
        FilterOperator::IsNull => format!("{} IS NULL", col),
        FilterOperator::IsNotNull => format!("{} IS NOT NULL", col),
        FilterOperator::IsEmpty => format!("({} IS NULL OR {} = '')", col, col),
        FilterOperator::IsNotEmpty => format!("({} IS NOT NULL AND {} <> '')", col, col),
        _ if value.is_blank() => return Ok(None),
        FilterOperator::Eq | FilterOperator::Neq => {
            let op = if condition.operator == FilterOperator::Eq {
                "="
            } else {
                "<>"
            };
            match value {
                FilterValue::Boolean(b) => {
                    let sql_bool = if *b { "TRUE" } else { "FALSE" };
                    format!("{} {} {}", col, op, sql_bool)
                }
                _ => {
                    params.values.push(scalar(value).ok_or_else(mismatch)?);
                    format!("{} {} ?", col, op)
                }
            }
        }
        FilterOperator::Contains | FilterOperator::StartsWith | FilterOperator::EndsWith => {
            let text = match value {
                FilterValue::Text(s) | FilterValue::Selected(s) => escape_like_pattern(s),
                _ => return Err(mismatch()),
            };
            let pattern = match condition.operator {
                FilterOperator::Contains => format!("%{}%", text),
                FilterOperator::StartsWith => format!("{}%", text),
                _ => format!("%{}", text),
            };
            params.values.push(pattern);
            format!("{} LIKE ? ESCAPE '\\'", col)
        }
        FilterOperator::In | FilterOperator::NotIn => {
            let values = match value {
                FilterValue::MultiSelected(values) => values.clone(),
                _ => vec![scalar(value).ok_or_else(mismatch)?],
            };
            let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
            params.values.extend(values);
            let op = if condition.operator == FilterOperator::In {
                "IN"
            } else {
                "NOT IN"
            };
            format!("{} {} ({})", col, op, placeholders.join(", "))
        }
        FilterOperator::Gt | FilterOperator::Lt | FilterOperator::Gte | FilterOperator::Lte => {
            let op = match condition.operator {
                FilterOperator::Gt => ">",
                FilterOperator::Lt => "<",
                FilterOperator::Gte => ">=",
                _ => "<=",
            };
            params.values.push(scalar(value).ok_or_else(mismatch)?);
            format!("{} {} ?", col, op)
        }
        FilterOperator::Between => {
            let (low, high) = match value {
                FilterValue::NumberRange(low, high) if low.is_finite() && high.is_finite() => {
                    (low.to_string(), high.to_string())
                }
                FilterValue::DateRange(start, end) => (date_param(start), date_param(end)),
                _ => return Err(mismatch()),
            };
            params.values.push(low);
            params.values.push(high);
            format!("{} BETWEEN ? AND ?", col)
        }
    };
    Ok(Some(sql))
}

/// Single bound parameter for a scalar value
fn scalar(value: &FilterValue) -> Option<String> {
    match value {
        FilterValue::Text(s) | FilterValue::Selected(s) => Some(s.clone()),
        FilterValue::Number(n) if n.is_finite() => Some(n.to_string()),
        FilterValue::Date(d) => Some(date_param(d)),
        FilterValue::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

fn date_param(date: &chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::catalog::EntityType;
    use chrono::NaiveDate;

    fn users() -> &'static FieldCatalog {
        EntityType::Users.catalog()
    }

    fn condition(field: &str, operator: FilterOperator, value: FilterValue) -> FilterCondition {
        FilterCondition {
            operator,
            value,
            ..FilterCondition::new().change_field(field, users())
        }
    }

    fn group(logic: LogicOperator, conditions: Vec<FilterCondition>) -> FilterGroup {
        FilterGroup {
            logic,
            conditions,
            ..FilterGroup::new()
        }
    }

    fn config(logic: LogicOperator, groups: Vec<FilterGroup>) -> AdvancedFilterConfig {
        AdvancedFilterConfig {
            logic,
            groups,
            metadata: None,
        }
    }

    fn compile_one(condition: FilterCondition) -> SqlWhere {
        let config = config(
            LogicOperator::And,
            vec![group(LogicOperator::And, vec![condition])],
        );
        compile(&config, users(), &SqlOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_configuration_matches_everything() {
        let sql = compile(&AdvancedFilterConfig::new(), users(), &SqlOptions::default()).unwrap();
        assert_eq!(sql.clause, "1=1");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn test_string_filter_contains() {
        let sql = compile_one(condition(
            "name",
            FilterOperator::Contains,
            FilterValue::Text("50%_off".into()),
        ));
        assert_eq!(sql.clause, r"name LIKE ? ESCAPE '\'");
        assert_eq!(sql.params, vec![r"%50\%\_off%"]);
    }

    #[test]
    fn test_starts_and_ends_with_patterns() {
        let sql = compile_one(condition(
            "email",
            FilterOperator::StartsWith,
            FilterValue::Text("ann".into()),
        ));
        assert_eq!(sql.params, vec!["ann%"]);
        let sql = compile_one(condition(
            "email",
            FilterOperator::EndsWith,
            FilterValue::Text("@example.com".into()),
        ));
        assert_eq!(sql.params, vec!["%@example.com"]);
    }

    #[test]
    fn test_select_in_list() {
        let sql = compile_one(condition(
            "role",
            FilterOperator::In,
            FilterValue::MultiSelected(vec!["ADMIN".into(), "STAFF".into()]),
        ));
        assert_eq!(sql.clause, "role IN (?, ?)");
        assert_eq!(sql.params, vec!["ADMIN", "STAFF"]);

        let sql = compile_one(condition(
            "role",
            FilterOperator::NotIn,
            FilterValue::Selected("CLIENT".into()),
        ));
        assert_eq!(sql.clause, "role NOT IN (?)");
    }

    #[test]
    fn test_number_filter_all_comparisons() {
        let operators = [
            (FilterOperator::Eq, "="),
            (FilterOperator::Gt, ">"),
            (FilterOperator::Lt, "<"),
            (FilterOperator::Gte, ">="),
            (FilterOperator::Lte, "<="),
        ];
        for (op, expected_op) in operators {
            let sql = compile_one(condition("hourlyRate", op, FilterValue::Number(100.5)));
            assert_eq!(sql.clause, format!("hourlyRate {} ?", expected_op));
            assert_eq!(sql.params, vec!["100.5"]);
        }
    }

    #[test]
    fn test_between_dates() {
        let sql = compile_one(condition(
            "createdAt",
            FilterOperator::Between,
            FilterValue::DateRange(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            ),
        ));
        assert_eq!(sql.clause, "createdAt BETWEEN ? AND ?");
        assert_eq!(sql.params, vec!["2024-01-01", "2024-03-31"]);
    }

    #[test]
    fn test_between_needs_a_range() {
        let config = config(
            LogicOperator::And,
            vec![group(
                LogicOperator::And,
                vec![condition(
                    "hourlyRate",
                    FilterOperator::Between,
                    FilterValue::Number(5.0),
                )],
            )],
        );
        let err = compile(&config, users(), &SqlOptions::default()).unwrap_err();
        assert_eq!(err.code(), "VALUE_MISMATCH");
    }

    #[test]
    fn test_non_finite_numbers_are_not_bound() {
        for value in [
            FilterValue::Number(f64::NAN),
            FilterValue::NumberRange(1.0, f64::INFINITY),
        ] {
            let operator = if matches!(value, FilterValue::NumberRange(..)) {
                FilterOperator::Between
            } else {
                FilterOperator::Gt
            };
            let config = config(
                LogicOperator::And,
                vec![group(
                    LogicOperator::And,
                    vec![condition("hourlyRate", operator, value)],
                )],
            );
            let err = compile(&config, users(), &SqlOptions::default()).unwrap_err();
            assert_eq!(err.code(), "VALUE_MISMATCH");
        }
    }

    #[test]
    fn test_existence_operators_ignore_value() {
        let sql = compile_one(condition(
            "department",
            FilterOperator::IsEmpty,
            FilterValue::Text("ignored".into()),
        ));
        assert_eq!(sql.clause, "(department IS NULL OR department = '')");
        assert!(sql.params.is_empty());

        let sql = compile_one(condition(
            "department",
            FilterOperator::IsNotNull,
            FilterValue::Empty,
        ));
        assert_eq!(sql.clause, "department IS NOT NULL");
    }

    #[test]
    fn test_incomplete_conditions_are_skipped() {
        let sql = compile_one(condition("name", FilterOperator::Eq, FilterValue::Empty));
        assert_eq!(sql.clause, "1=1");

        let no_roles = condition("role", FilterOperator::In, FilterValue::MultiSelected(vec![]));
        let active = condition(
            "status",
            FilterOperator::Eq,
            FilterValue::Selected("ACTIVE".into()),
        );
        let config = config(
            LogicOperator::And,
            vec![group(LogicOperator::Or, vec![no_roles, active])],
        );
        let sql = compile(&config, users(), &SqlOptions::default()).unwrap();
        assert_eq!(sql.clause, "status = ?");
        assert_eq!(sql.params, vec!["ACTIVE"]);
    }

    #[test]
    fn test_groups_combine_with_their_logic() {
        let admins = condition(
            "role",
            FilterOperator::Eq,
            FilterValue::Selected("ADMIN".into()),
        );
        let active = condition(
            "status",
            FilterOperator::Eq,
            FilterValue::Selected("ACTIVE".into()),
        );
        let senior = condition(
            "experienceYears",
            FilterOperator::Gte,
            FilterValue::Number(5.0),
        );
        let cheap = condition("hourlyRate", FilterOperator::Lt, FilterValue::Number(40.0));

        let mut first = group(LogicOperator::Or, vec![admins, FilterCondition::new()]);
        first.nested_groups = vec![group(LogicOperator::And, vec![senior, cheap])];
        let second = group(LogicOperator::And, vec![active]);

        let sql = compile(
            &config(LogicOperator::And, vec![first, second]),
            users(),
            &SqlOptions::default(),
        )
        .unwrap();
        assert_eq!(
            sql.clause,
            "((role = ? OR (experienceYears >= ? AND hourlyRate < ?)) AND status = ?)"
        );
        assert_eq!(sql.params, vec!["ADMIN", "5", "40", "ACTIVE"]);
    }

    #[test]
    fn test_alias_and_column_mapping() {
        let options = SqlOptions {
            alias: "u".to_string(),
            columns: HashMap::from([("createdAt".to_string(), "created_at".to_string())]),
        };
        let config = config(
            LogicOperator::And,
            vec![group(
                LogicOperator::And,
                vec![condition(
                    "createdAt",
                    FilterOperator::Gte,
                    FilterValue::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
                )],
            )],
        );
        let sql = compile(&config, users(), &options).unwrap();
        assert_eq!(sql.clause, "u.created_at >= ?");
        assert_eq!(sql.params, vec!["2024-02-01"]);
    }

    #[test]
    fn test_boolean_values_are_inlined() {
        let catalog = FieldCatalog::new(vec![crate::domain::filters::catalog::FilterField::new(
            "verified",
            "Verified",
            crate::domain::filters::types::FilterValueType::Boolean,
            &[FilterOperator::Eq, FilterOperator::Neq],
        )]);
        let condition = FilterCondition {
            value: FilterValue::Boolean(true),
            ..FilterCondition::new().change_field("verified", &catalog)
        };
        let config = config(
            LogicOperator::And,
            vec![group(LogicOperator::And, vec![condition])],
        );
        let sql = compile(&config, &catalog, &SqlOptions::default()).unwrap();
        assert_eq!(sql.clause, "verified = TRUE");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let bogus = FilterCondition {
            field: "salary".to_string(),
            value: FilterValue::Text("1".into()),
            ..FilterCondition::new()
        };
        let config = config(
            LogicOperator::And,
            vec![group(LogicOperator::And, vec![bogus])],
        );
        let err = compile(&config, users(), &SqlOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FilterError::unknown_field("groups[0].conditions[0]", "salary")
        );
    }
}
