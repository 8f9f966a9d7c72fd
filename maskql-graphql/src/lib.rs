//! async-graphql execution for maskql schemas
//!
//! Turns a [`maskql_core::Schema`] into an `async-graphql` dynamic schema and
//! provides [`MaskingEngine`], which masks a schema lazily on its first execution.

pub mod context;
pub mod engine;
pub mod errors;
pub mod schema;

// Re-export main components
pub use context::*;
pub use engine::*;
pub use errors::*;
pub use schema::*;
