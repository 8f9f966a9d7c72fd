//! Execution configuration and request data

use serde_json::Value;

/// Configuration for building the executable schema
#[derive(Debug, Clone)]
pub struct GraphQLConfig {
    pub enable_introspection: bool,
    pub max_query_depth: Option<usize>,
    pub max_query_complexity: Option<usize>,
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            enable_introspection: true,
            max_query_depth: Some(15),
            max_query_complexity: Some(1000),
        }
    }
}

/// Request data handed to resolvers as `ResolveContext::context`
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext(pub Value);
