//! Configuration module for the criteria engine
//!
//! Configuration is plain JSON deserialized with serde; every field has a
//! default so an empty object is a valid configuration.

mod engine;

pub use engine::*;
