//! Filter operator catalog
//!
//! The 16 comparison operators shared with the query backend, their display
//! labels and the value shape each one expects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FilterError;

/// Comparison operator of a single filter condition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    #[default]
    Eq,
    Neq,
    Contains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
    Gt,
    Lt,
    Gte,
    Lte,
    Between,
    IsEmpty,
    IsNotEmpty,
    IsNull,
    IsNotNull,
}

impl FilterOperator {
    /// Every operator, in catalog order
    pub const ALL: [FilterOperator; 16] = [
        Self::Eq,
        Self::Neq,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::In,
        Self::NotIn,
        Self::Gt,
        Self::Lt,
        Self::Gte,
        Self::Lte,
        Self::Between,
        Self::IsEmpty,
        Self::IsNotEmpty,
        Self::IsNull,
        Self::IsNotNull,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Between => "between",
            Self::IsEmpty => "isEmpty",
            Self::IsNotEmpty => "isNotEmpty",
            Self::IsNull => "isNull",
            Self::IsNotNull => "isNotNull",
        }
    }

    /// Display label shown in operator pickers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Eq => "Equals",
            Self::Neq => "Not Equals",
            Self::Contains => "Contains",
            Self::StartsWith => "Starts With",
            Self::EndsWith => "Ends With",
            Self::In => "In",
            Self::NotIn => "Not In",
            Self::Gt => "Greater Than",
            Self::Lt => "Less Than",
            Self::Gte => "Greater Than or Equal",
            Self::Lte => "Less Than or Equal",
            Self::Between => "Between",
            Self::IsEmpty => "Is Empty",
            Self::IsNotEmpty => "Is Not Empty",
            Self::IsNull => "Is Null",
            Self::IsNotNull => "Is Not Null",
        }
    }

    /// Existence checks carry no value
    pub fn is_existence(&self) -> bool {
        matches!(
            self,
            Self::IsEmpty | Self::IsNotEmpty | Self::IsNull | Self::IsNotNull
        )
    }

    /// Operators comparing against a list of values
    pub fn is_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Operators comparing against a `[low, high]` pair
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Between)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| FilterError::UnknownOperator(s.to_string()))
    }
}
