//! Typed condition values
//!
//! The wire format carries an untyped JSON `value` next to `valueType` and
//! `operator`. [`FilterValue`] is the closed set of shapes a value can take;
//! decoding is driven by the sibling tags.

use chrono::{DateTime, NaiveDate};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use super::operators::FilterOperator;
use super::types::FilterValueType;

/// Condition value, shaped by value type and operator
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Not filled in yet (serialized as `""`)
    Empty,
    Text(String),
    Selected(String),
    MultiSelected(Vec<String>),
    Number(f64),
    NumberRange(f64, f64),
    Date(NaiveDate),
    DateRange(NaiveDate, NaiveDate),
    Boolean(bool),
}

impl FilterValue {
    /// Value a condition is reset to when its field changes
    pub fn empty_for(value_type: FilterValueType) -> Self {
        match value_type {
            FilterValueType::MultiSelect => Self::MultiSelected(Vec::new()),
            _ => Self::Empty,
        }
    }

    /// True when nothing usable has been entered
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) | Self::Selected(s) => s.trim().is_empty(),
            Self::MultiSelected(values) => values.is_empty(),
            _ => false,
        }
    }

    /// Whether this variant is a legal shape for `value_type` under `operator`
    ///
    /// Existence operators ignore their value, so anything fits.
    pub fn fits(&self, value_type: FilterValueType, operator: FilterOperator) -> bool {
        use FilterValueType as T;

        if operator.is_existence() {
            return true;
        }
        match (self, value_type) {
            (Self::Empty, _) => true,
            (Self::Text(_), T::Text) => true,
            // A single selection is a one-element list for in/notIn
            (Self::Selected(_), T::Select) => true,
            (Self::MultiSelected(_), T::Select) => operator.is_list(),
            (Self::MultiSelected(_), T::MultiSelect) => true,
            // NaN and infinities have no JSON form
            (Self::Number(n), T::Number) => n.is_finite() && !operator.is_range(),
            (Self::NumberRange(low, high), T::Number) => {
                low.is_finite() && high.is_finite() && operator.is_range()
            }
            (Self::Date(_), T::Date | T::DateRange) => !operator.is_range(),
            (Self::DateRange(..), T::Date | T::DateRange) => operator.is_range(),
            (Self::Boolean(_), T::Boolean) => true,
            _ => false,
        }
    }

    /// Selected option values referenced by this value
    pub fn option_values(&self) -> Vec<&str> {
        match self {
            Self::Selected(s) => vec![s.as_str()],
            Self::MultiSelected(values) => values.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Decode an untyped wire value
    ///
    /// `null` and `""` decode to [`FilterValue::Empty`] for every type. Under
    /// an existence operator an undecodable value is dropped to `Empty`
    /// since it is never evaluated.
    pub fn from_json(
        value: &Value,
        value_type: FilterValueType,
        operator: FilterOperator,
    ) -> Result<Self, String> {
        match Self::decode(value, value_type) {
            Ok(decoded) => Ok(decoded),
            Err(_) if operator.is_existence() => Ok(Self::Empty),
            Err(reason) => Err(reason),
        }
    }

    fn decode(value: &Value, value_type: FilterValueType) -> Result<Self, String> {
        use FilterValueType as T;

        match value {
            Value::Null => return Ok(Self::Empty),
            Value::String(s) if s.is_empty() => return Ok(Self::Empty),
            Value::Array(items) if items.is_empty() => {
                return Ok(if value_type.has_options() {
                    Self::MultiSelected(Vec::new())
                } else {
                    Self::Empty
                });
            }
            _ => {}
        }

        match (value_type, value) {
            (T::Text, Value::String(s)) => Ok(Self::Text(s.clone())),
            (T::Select, Value::String(s)) => Ok(Self::Selected(s.clone())),
            (T::MultiSelect, Value::String(s)) => Ok(Self::MultiSelected(vec![s.clone()])),
            (T::Select | T::MultiSelect, Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(format!("expected option string, got {}", other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::MultiSelected),
            (T::Number, Value::Array(items)) => {
                let (low, high) = pair(items)?;
                Ok(Self::NumberRange(parse_number(low)?, parse_number(high)?))
            }
            (T::Number, scalar) => parse_number(scalar).map(Self::Number),
            (T::Date | T::DateRange, Value::Array(items)) => {
                let (start, end) = pair(items)?;
                Ok(Self::DateRange(parse_date(start)?, parse_date(end)?))
            }
            (T::Date | T::DateRange, scalar) => parse_date(scalar).map(Self::Date),
            (T::Boolean, Value::Bool(b)) => Ok(Self::Boolean(*b)),
            (T::Boolean, Value::String(s)) => match s.as_str() {
                "true" => Ok(Self::Boolean(true)),
                "false" => Ok(Self::Boolean(false)),
                _ => Err(format!("expected boolean, got '{}'", s)),
            },
            (value_type, other) => Err(format!(
                "unexpected {} value for {} field",
                json_kind(other),
                value_type
            )),
        }
    }
}

fn pair(items: &[Value]) -> Result<(&Value, &Value), String> {
    match items {
        [first, second] => Ok((first, second)),
        _ => Err(format!("expected a [low, high] pair, got {} items", items.len())),
    }
}

/// Numbers may arrive as raw input text
fn parse_number(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("number out of range: {}", n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("expected number, got '{}'", s)),
        other => Err(format!("expected number, got {}", json_kind(other))),
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part kept)
fn parse_date(value: &Value) -> Result<NaiveDate, String> {
    let Value::String(s) = value else {
        return Err(format!("expected date string, got {}", json_kind(value)));
    };
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| format!("invalid date '{}'", s))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_str(""),
            Self::Text(s) | Self::Selected(s) => serializer.serialize_str(s),
            Self::MultiSelected(values) => serializer.collect_seq(values),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::NumberRange(low, high) => [low, high].serialize(serializer),
            Self::Date(date) => date.serialize(serializer),
            Self::DateRange(start, end) => [start, end].serialize(serializer),
            Self::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}
