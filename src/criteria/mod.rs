//! Criteria expression module
//!
//! This module holds the criteria AST, the tuple node wire vocabulary and
//! the encoder/decoder between the two, plus a parse cache for criteria
//! held as JSON text.

mod ast;
pub mod cache;
mod encoder;
mod node_type;
pub mod parser;
mod progress;
pub mod tuple;
mod validate;


pub use ast::*;
pub use cache::*;
pub use encoder::*;
pub use node_type::*;
pub use parser::*;
pub use progress::*;
