//! Bridge errors and conversion of resolver failures into GraphQL errors

use async_graphql::ErrorExtensions;
use maskql_core::ResolveError;
use thiserror::Error;

/// Failure to turn a maskql schema into an executable one
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid type reference '{type_ref}' on {coordinate}")]
    InvalidTypeRef { coordinate: String, type_ref: String },

    #[error("Root type '{0}' is not an object type in the schema")]
    UnknownRootType(String),

    #[error("Schema build failed: {0}")]
    Build(#[from] async_graphql::dynamic::SchemaError),
}

/// Error extension code of masked errors
pub const INTERNAL_ERROR_CODE: &str = "INTERNAL_ERROR";

/// Convert a resolver failure into the error placed in the response.
///
/// Masked errors carry `code` and, when present, `correlationId` extensions.
pub fn to_graphql_error(error: ResolveError) -> async_graphql::Error {
    match error {
        ResolveError::Internal(internal) => {
            async_graphql::Error::new(internal.to_string()).extend_with(|_, e| {
                e.set("code", INTERNAL_ERROR_CODE.to_string());
                if let Some(id) = internal.correlation_id() {
                    e.set("correlationId", id.to_string());
                }
            })
        }
        ResolveError::User(user) => {
            let error = async_graphql::Error::new(user.message());
            if user.extensions().is_empty() {
                return error;
            }
            error.extend_with(|_, e| {
                for (key, value) in user.extensions() {
                    e.set(key, value.clone());
                }
            })
        }
        other => async_graphql::Error::new(other.to_string()),
    }
}
