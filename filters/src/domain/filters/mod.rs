//! Advanced filter system
//!
//! Recursive AND/OR filter trees over a per-entity field catalog, with pure
//! editing operations, normalization, validation and SQL generation.
//!
//! ## Usage
//!
//! ```
//! use admin_filters::filters::{
//!     AdvancedFilterConfig, EntityType, FilterOperator, SqlOptions, compile,
//! };
//!
//! let catalog = EntityType::Users.catalog();
//! let config = AdvancedFilterConfig::new();
//! let group = config.groups[0].clone();
//! let condition = group.conditions[0]
//!     .change_field("role", catalog)
//!     .change_operator(FilterOperator::In);
//! let config = config.replace_group(
//!     &group.id,
//!     group.replace_condition(&group.conditions[0].id, condition),
//! );
//!
//! let sql = compile(&config, catalog, &SqlOptions::default()).unwrap();
//! assert_eq!(sql.clause, "1=1");
//! ```

mod catalog;
mod edit;
mod error;
mod ids;
mod normalize;
mod operators;
mod parser;
mod preset;
mod sql;
mod types;
mod validate;
mod value;

pub use catalog::{EntityType, FieldCatalog, FieldOption, FilterField};
pub use error::FilterError;
pub use normalize::normalize;
pub use operators::FilterOperator;
pub use parser::{
    FilterLimits, MAX_CONDITIONS, MAX_DEPTH, MAX_FILTER_JSON_SIZE, parse_config, parse_preset,
};
pub use preset::FilterPreset;
pub use sql::{SqlOptions, SqlParams, SqlWhere, compile};
pub use types::{
    AdvancedFilterConfig, FilterCondition, FilterGroup, FilterMetadata, FilterValueType,
    LogicOperator,
};
pub use validate::{ValidationOptions, validate};
pub use value::FilterValue;
