//! Resolver error masking for GraphQL schema graphs
//!
//! Walks a schema's type map and each type's field map and wraps every
//! resolution function so that unexpected failures, synchronous or
//! asynchronous, are reported to an error sink and replaced by an opaque
//! [`InternalError`]. Errors built as [`UserError`] reach the client unchanged.
//!
//! ```ignore
//! let mut schema = build_schema();
//! mask_errors_with_default(&mut schema);
//! ```

pub mod errors;
pub mod handler;
pub mod mask;
mod panic_hook;
pub mod registry;
pub mod schema;
pub mod wrap;

// Re-export commonly used types
pub use errors::{
    InternalError, ResolveError, UserError, INTERNAL_ERROR, INTERNAL_ERROR_MESSAGE,
    INTERNAL_ERROR_PREFIX,
};
pub use handler::{handler_fn, CorrelationIdSource, DefaultHandler, ErrorHandler, SharedHandler, UuidSource};
pub use mask::{mask_errors, mask_errors_with_default, MaskSummary, MaskTarget};
pub use registry::{default_handler, reset_default_handler, set_default_handler};
pub use schema::{
    Argument, Field, FieldResult, ObjectType, Resolution, ResolveContext, ResolveInfo, Resolver,
    ScalarType, Schema, TypeDef,
};
pub use wrap::{apply_policy, wrap_field};

pub use maskql_config::MessagePolicy;
