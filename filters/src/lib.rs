pub mod app;
pub mod core;
pub mod domain;
pub mod utils;

pub use domain::filters;
