//! Lazy masking at the execution entry point
//!
//! Instead of an explicit masking call at startup, [`MaskingEngine`] masks a
//! schema the first time it is executed. The schema's own `masked` marker keeps
//! later executions from walking it again.

use crate::context::GraphQLConfig;
use crate::errors::BridgeError;
use crate::schema::{build_executable, execute};
use async_graphql::{dynamic, Request, Response};
use maskql_core::{default_handler, mask_errors, MaskSummary, Schema, SharedHandler};

/// Execution entry point that masks each schema once before running it
#[derive(Clone, Default)]
pub struct MaskingEngine {
    config: GraphQLConfig,
    handler: Option<SharedHandler>,
}

impl MaskingEngine {
    pub fn new(config: GraphQLConfig) -> Self {
        Self {
            config,
            handler: None,
        }
    }

    /// Use this handler instead of the process-wide default
    pub fn with_handler(mut self, handler: SharedHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn config(&self) -> &GraphQLConfig {
        &self.config
    }

    /// Mask `schema` unless it was masked already. Returns what the pass did,
    /// or `None` when nothing had to happen.
    pub fn activate(&self, schema: &mut Schema) -> Option<MaskSummary> {
        if schema.is_masked() {
            return None;
        }

        let handler = self.handler.clone().unwrap_or_else(default_handler);
        let summary = mask_errors(schema, &handler);
        tracing::debug!(
            query_type = schema.query_type(),
            types_masked = summary.types_masked,
            fields_wrapped = summary.fields_wrapped,
            "Masked schema on first execution"
        );
        Some(summary)
    }

    /// Activate, then build an executable schema that can be reused
    pub fn prepare(&self, schema: &mut Schema) -> Result<dynamic::Schema, BridgeError> {
        self.activate(schema);
        build_executable(schema, &self.config)
    }

    /// Activate, then execute one request
    pub async fn execute(&self, schema: &mut Schema, request: impl Into<Request>) -> Response {
        self.activate(schema);
        execute(schema, &self.config, request).await
    }
}
