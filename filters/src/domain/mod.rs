//! Domain logic for the admin user console
//!
//! - `filters` - Advanced filter model, editing, validation and SQL generation

pub mod filters;
