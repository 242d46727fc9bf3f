//! Error type for filter parsing, validation and compilation

use thiserror::Error;

use super::operators::FilterOperator;
use super::types::FilterValueType;

/// Errors raised while handling filter configurations
///
/// Paths point into the configuration tree, e.g.
/// `groups[0].nestedGroups[1].conditions[2]`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Serialized input is larger than the configured limit
    #[error("Filter JSON exceeds maximum size of {max} bytes")]
    TooLarge { max: usize },

    /// Input is not a well-formed configuration
    #[error("Invalid filter JSON: {0}")]
    InvalidJson(String),

    #[error("Too many conditions: {count} (maximum {max})")]
    TooManyConditions { count: usize, max: usize },

    #[error("Groups nested {depth} levels deep (maximum {max})")]
    TooDeep { depth: usize, max: usize },

    #[error("Filter configuration has no groups")]
    NoGroups,

    #[error("{path}: group has no conditions")]
    EmptyGroup { path: String },

    #[error("Unknown entity type '{0}'")]
    UnknownEntity(String),

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("{path}: unknown field '{field}'")]
    UnknownField { path: String, field: String },

    #[error("{path}: value type '{actual}' does not match field '{field}' ({expected})")]
    ValueTypeOutOfSync {
        path: String,
        field: String,
        expected: FilterValueType,
        actual: FilterValueType,
    },

    #[error("{path}: operator '{operator}' is not allowed for field '{field}'")]
    OperatorNotAllowed {
        path: String,
        field: String,
        operator: FilterOperator,
    },

    /// Value variant does not fit the condition's value type and operator
    #[error("{path}: value does not fit a {value_type} condition with operator '{operator}'")]
    ValueMismatch {
        path: String,
        value_type: FilterValueType,
        operator: FilterOperator,
    },

    #[error("{path}: '{value}' is not an option of field '{field}'")]
    UnknownOption {
        path: String,
        field: String,
        value: String,
    },

    #[error("{path}: invalid value: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("Invalid preset: {0}")]
    InvalidPreset(String),
}

impl FilterError {
    pub fn unknown_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            path: path.into(),
            field: field.into(),
        }
    }

    pub fn value_mismatch(
        path: impl Into<String>,
        value_type: FilterValueType,
        operator: FilterOperator,
    ) -> Self {
        Self::ValueMismatch {
            path: path.into(),
            value_type,
            operator,
        }
    }

    pub fn invalid_value(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Machine-readable error code, stable across releases
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooLarge { .. } => "FILTER_JSON_TOO_LARGE",
            Self::InvalidJson(_) => "INVALID_FILTER_JSON",
            Self::TooManyConditions { .. } => "TOO_MANY_CONDITIONS",
            Self::TooDeep { .. } => "FILTER_TOO_DEEP",
            Self::NoGroups => "NO_FILTER_GROUPS",
            Self::EmptyGroup { .. } => "EMPTY_FILTER_GROUP",
            Self::UnknownEntity(_) => "UNKNOWN_ENTITY",
            Self::UnknownOperator(_) => "UNKNOWN_OPERATOR",
            Self::UnknownField { .. } => "UNKNOWN_FIELD",
            Self::ValueTypeOutOfSync { .. } => "VALUE_TYPE_OUT_OF_SYNC",
            Self::OperatorNotAllowed { .. } => "OPERATOR_NOT_ALLOWED",
            Self::ValueMismatch { .. } => "VALUE_MISMATCH",
            Self::UnknownOption { .. } => "UNKNOWN_OPTION",
            Self::InvalidValue { .. } => "INVALID_VALUE",
            Self::InvalidPreset(_) => "INVALID_PRESET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_path() {
        let err = FilterError::OperatorNotAllowed {
            path: "groups[0].conditions[1]".to_string(),
            field: "role".to_string(),
            operator: FilterOperator::Contains,
        };
        assert_eq!(
            err.to_string(),
            "groups[0].conditions[1]: operator 'contains' is not allowed for field 'role'"
        );
        assert_eq!(err.code(), "OPERATOR_NOT_ALLOWED");
    }

    #[test]
    fn test_value_mismatch_names_type_and_operator() {
        let err = FilterError::value_mismatch(
            "condition cond-1",
            FilterValueType::Number,
            FilterOperator::Between,
        );
        assert_eq!(
            err.to_string(),
            "condition cond-1: value does not fit a number condition with operator 'between'"
        );
    }
}
