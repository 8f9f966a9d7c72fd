//! Process-wide default error handler
//!
//! Read once per masking call; fields already wrapped keep the handler they
//! were wrapped with.

use crate::handler::{DefaultHandler, SharedHandler};
use once_cell::sync::Lazy;
use std::sync::RwLock;

static DEFAULT_HANDLER: Lazy<RwLock<SharedHandler>> =
    Lazy::new(|| RwLock::new(DefaultHandler::default().shared()));

/// The handler used by masking calls that do not pass one
pub fn default_handler() -> SharedHandler {
    DEFAULT_HANDLER
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Replace the default handler, returning the previous one
pub fn set_default_handler(handler: SharedHandler) -> SharedHandler {
    let mut slot = DEFAULT_HANDLER
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    std::mem::replace(&mut *slot, handler)
}

/// Restore a fresh [`DefaultHandler`], returning the previous one
pub fn reset_default_handler() -> SharedHandler {
    set_default_handler(DefaultHandler::default().shared())
}

#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
