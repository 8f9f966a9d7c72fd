//! Error taxonomy for resolver failures
//!
//! Whether an error may be shown to a client is decided by the [`ResolveError`]
//! variant it is constructed as, never by inspecting the type of its cause.

use std::any::Any;
use std::backtrace::BacktraceStatus;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Message of the opaque internal error
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// Prefix of a correlated internal error message
pub const INTERNAL_ERROR_PREFIX: &str = "Internal Error: ";

/// The shared opaque internal error
pub static INTERNAL_ERROR: InternalError = InternalError::opaque();

/// Error that replaced a masked failure. Carries no detail of the original.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InternalError {
    correlation_id: Option<String>,
}

impl InternalError {
    /// `internal error`
    pub const fn opaque() -> Self {
        Self {
            correlation_id: None,
        }
    }

    /// `Internal Error: <id>`
    pub fn correlated(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(correlation_id.into()),
        }
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.correlation_id {
            Some(id) => write!(f, "{}{}", INTERNAL_ERROR_PREFIX, id),
            None => f.write_str(INTERNAL_ERROR_MESSAGE),
        }
    }
}

impl std::error::Error for InternalError {}

/// Error intended for the client. Its message is shown exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UserError {
    message: String,
    extensions: BTreeMap<String, String>,
}

impl UserError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: BTreeMap::new(),
        }
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn extensions(&self) -> &BTreeMap<String, String> {
        &self.extensions
    }
}

/// Failure of a resolution function
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Safe to expose, never masked
    #[error(transparent)]
    User(#[from] UserError),

    /// Already masked
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// Anything else; masked before it reaches a client
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),

    /// The resolver panicked
    #[error("resolver panicked: {message}")]
    Panic {
        message: String,
        /// `file:line:column` of the panic, when the masking hook saw it
        location: Option<String>,
    },
}

impl ResolveError {
    /// User-facing error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        ResolveError::User(UserError::new(message))
    }

    /// Wrap an arbitrary failure
    pub fn unexpected<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ResolveError::Unexpected(anyhow::Error::new(error))
    }

    /// Unexpected failure from a plain message
    pub fn msg(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        ResolveError::Unexpected(anyhow::Error::msg(message))
    }

    /// Convert a panic payload caught by `catch_unwind`
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        ResolveError::Panic {
            message,
            location: crate::panic_hook::take_location(),
        }
    }

    pub fn is_user_facing(&self) -> bool {
        matches!(self, ResolveError::User(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ResolveError::Internal(_))
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, ResolveError::Panic { .. })
    }

    /// Messages of the underlying causes, outermost first, excluding the error itself
    pub fn causes(&self) -> Vec<String> {
        match self {
            ResolveError::Unexpected(error) => error.chain().skip(1).map(|c| c.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Where the failure came from.
    ///
    /// Panics report their location. Unexpected errors report the backtrace
    /// `anyhow` captured, which only happens with `RUST_BACKTRACE` or
    /// `RUST_LIB_BACKTRACE` enabled.
    pub fn stack_trace(&self) -> Option<String> {
        match self {
            ResolveError::Unexpected(error) => {
                let backtrace = error.backtrace();
                (backtrace.status() == BacktraceStatus::Captured).then(|| backtrace.to_string())
            }
            ResolveError::Panic {
                location: Some(location),
                ..
            } => Some(format!("panicked at {}", location)),
            _ => None,
        }
    }
}
