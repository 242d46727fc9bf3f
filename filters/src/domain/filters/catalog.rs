//! Field catalogs
//!
//! Each entity type has a fixed, ordered list of filterable fields. Catalogs
//! are built once and never mutated.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::error::FilterError;
use super::operators::FilterOperator;
use super::types::FilterValueType;

use FilterOperator as Op;

/// Enumerated choice of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Filterable attribute of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub value_type: FilterValueType,
    /// Legal operators; the first one is the default
    pub operators: Vec<FilterOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_array: bool,
}

impl FilterField {
    pub fn new(
        name: &str,
        label: &str,
        value_type: FilterValueType,
        operators: &[FilterOperator],
    ) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value_type,
            operators: operators.to_vec(),
            options: None,
            is_array: false,
        }
    }

    pub fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = Some(
            options
                .iter()
                .map(|(value, label)| FieldOption {
                    value: value.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        );
        self
    }

    /// Operator a condition gets when this field is selected
    pub fn default_operator(&self) -> FilterOperator {
        self.operators.first().copied().unwrap_or_default()
    }

    pub fn allows(&self, operator: FilterOperator) -> bool {
        self.operators.contains(&operator)
    }

    /// Fields without an option list accept any value
    pub fn has_option(&self, value: &str) -> bool {
        match &self.options {
            Some(options) => options.iter().any(|o| o.value == value),
            None => true,
        }
    }
}

/// Ordered set of fields for one entity type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    fields: Vec<FilterField>,
}

impl FieldCatalog {
    pub fn new(fields: Vec<FilterField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Catalog for an entity type name; `None` means no fields are available
    pub fn for_entity(entity_type: &str) -> Option<&'static FieldCatalog> {
        entity_type.parse::<EntityType>().ok().map(|e| e.catalog())
    }
}

/// Entity types that carry a field catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[default]
    Users,
    Clients,
    TeamMembers,
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [Self::Users, Self::Clients, Self::TeamMembers];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Clients => "clients",
            Self::TeamMembers => "team_members",
        }
    }

    pub fn catalog(&self) -> &'static FieldCatalog {
        match self {
            Self::Users => &USER_FIELDS,
            Self::Clients => &CLIENT_FIELDS,
            Self::TeamMembers => &TEAM_MEMBER_FIELDS,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| FilterError::UnknownEntity(s.to_string()))
    }
}

// =============================================================================
// Built-in catalogs
// =============================================================================

const TEXT_OPS: &[FilterOperator] = &[Op::Contains, Op::StartsWith, Op::Eq, Op::Neq];
const SELECT_OPS: &[FilterOperator] = &[Op::Eq, Op::Neq, Op::In, Op::NotIn];
const NUMBER_OPS: &[FilterOperator] = &[Op::Eq, Op::Gt, Op::Lt, Op::Gte, Op::Lte, Op::Between];
const DATE_RANGE_OPS: &[FilterOperator] = &[Op::Between, Op::Gt, Op::Lt, Op::Gte, Op::Lte];

const ROLE_OPTIONS: &[(&str, &str)] = &[
    ("ADMIN", "Admin"),
    ("TEAM_LEAD", "Team Lead"),
    ("TEAM_MEMBER", "Team Member"),
    ("STAFF", "Staff"),
    ("CLIENT", "Client"),
];

const STATUS_OPTIONS: &[(&str, &str)] = &[
    ("ACTIVE", "Active"),
    ("INACTIVE", "Inactive"),
    ("SUSPENDED", "Suspended"),
];

const TIER_OPTIONS: &[(&str, &str)] = &[
    ("INDIVIDUAL", "Individual"),
    ("SMB", "Small Business"),
    ("ENTERPRISE", "Enterprise"),
];

fn name_field() -> FilterField {
    FilterField::new("name", "Name", FilterValueType::Text, TEXT_OPS)
}

fn email_field() -> FilterField {
    FilterField::new("email", "Email", FilterValueType::Text, TEXT_OPS)
}

fn status_field() -> FilterField {
    FilterField::new("status", "Status", FilterValueType::Select, SELECT_OPS)
        .with_options(STATUS_OPTIONS)
}

fn tier_field() -> FilterField {
    FilterField::new("tier", "Tier", FilterValueType::Select, SELECT_OPS).with_options(TIER_OPTIONS)
}

fn department_field() -> FilterField {
    FilterField::new(
        "department",
        "Department",
        FilterValueType::Text,
        &[Op::Contains, Op::Eq, Op::Neq],
    )
}

fn created_at_field() -> FilterField {
    FilterField::new(
        "createdAt",
        "Created Date",
        FilterValueType::DateRange,
        DATE_RANGE_OPS,
    )
}

fn experience_field() -> FilterField {
    FilterField::new(
        "experienceYears",
        "Years of Experience",
        FilterValueType::Number,
        NUMBER_OPS,
    )
}

fn hourly_rate_field() -> FilterField {
    FilterField::new(
        "hourlyRate",
        "Hourly Rate",
        FilterValueType::Number,
        NUMBER_OPS,
    )
}

static USER_FIELDS: LazyLock<FieldCatalog> = LazyLock::new(|| {
    FieldCatalog::new(vec![
        name_field(),
        email_field(),
        FilterField::new("role", "Role", FilterValueType::Select, SELECT_OPS)
            .with_options(ROLE_OPTIONS),
        status_field(),
        department_field(),
        tier_field(),
        created_at_field(),
        experience_field(),
        hourly_rate_field(),
    ])
});

static CLIENT_FIELDS: LazyLock<FieldCatalog> = LazyLock::new(|| {
    FieldCatalog::new(vec![
        name_field(),
        email_field(),
        FilterField::new("company", "Company", FilterValueType::Text, TEXT_OPS),
        tier_field(),
        status_field(),
        created_at_field(),
    ])
});

static TEAM_MEMBER_FIELDS: LazyLock<FieldCatalog> = LazyLock::new(|| {
    FieldCatalog::new(vec![
        name_field(),
        email_field(),
        FilterField::new("role", "Role", FilterValueType::Select, SELECT_OPS).with_options(&[
            ("TEAM_LEAD", "Team Lead"),
            ("TEAM_MEMBER", "Team Member"),
            ("STAFF", "Staff"),
        ]),
        department_field(),
        status_field(),
        experience_field(),
        hourly_rate_field(),
        created_at_field(),
    ])
});
