//! Field taxonomy module
//!
//! This module holds the closed catalog of filterable instrument fields,
//! their metadata (data type, sub-fielded, comparable) and the wire names
//! used to reference them inside tuple nodes.

mod field_id;
mod sub_field;

#[cfg(test)]
mod property_tests;

pub use field_id::*;
pub use sub_field::*;
