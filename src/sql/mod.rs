//! SQL text generation
//!
//! Provides CREATE and INSERT generation plus identifier utilities.

pub mod ddl;
pub mod dml;
pub mod sanitize;

pub use ddl::SchemaGenerator;
pub use dml::{RowGenerator, render_literal};
pub use sanitize::{column_name, validate_identifier};
