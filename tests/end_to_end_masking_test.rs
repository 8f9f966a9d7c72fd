//! Configuration to response tests
//!
//! Loads a YAML configuration, initializes logging, builds the handler the
//! configuration describes and runs queries against a masked schema.

use anyhow::Result;
use maskql_config::{ConfigLoader, MessagePolicy, SinkKind};
use maskql_core::{
    mask_errors, DefaultHandler, Field, ObjectType, ResolveError, Resolver, Schema,
    INTERNAL_ERROR_MESSAGE, INTERNAL_ERROR_PREFIX,
};
use maskql_graphql::{GraphQLConfig, MaskingEngine};
use maskql_logging::{init_logging_from_config, MemorySink};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn orders_schema() -> Schema {
    let order = ObjectType::new("Order")
        .with_field(Field::new("id", "ID!"))
        .with_field(Field::new("total", "Float").with_resolver(Resolver::from_async(|ctx| async move {
            match ctx.parent["total"].as_f64() {
                Some(total) => Ok(json!(total)),
                None => Err(ResolveError::msg("ledger row missing for order")),
            }
        })));

    let query = ObjectType::new("Query")
        .with_field(Field::new("orders", "[Order!]!").with_resolver(Resolver::sync(|_| {
            Ok(json!([{ "id": "a", "total": 12.5 }, { "id": "b" }]))
        })))
        .with_field(
            Field::new("order", "Order")
                .with_argument("id", "ID!")
                .with_resolver(Resolver::sync(|ctx| match ctx.arg("id").and_then(Value::as_str) {
                    Some("a") => Ok(json!({ "id": "a", "total": 12.5 })),
                    Some(_) => Err(ResolveError::user("order not found")),
                    None => Err(ResolveError::msg("missing id argument")),
                })),
        );

    Schema::new("Query").with_type(query).with_type(order)
}

fn write_config(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[tokio::test]
async fn test_config_driven_fixed_policy() -> Result<()> {
    let file = write_config(
        r#"
masking:
  policy: fixed
  sink: tracing
logging:
  level: debug
  format: text
"#,
    )?;

    let config = ConfigLoader::with_prefix("MASKQL_E2E_FIXED").from_file(file.path())?;
    assert_eq!(config.masking.policy, MessagePolicy::Fixed);
    assert_eq!(config.masking.sink, SinkKind::Tracing);

    init_logging_from_config(&config.logging)?;

    let engine = MaskingEngine::default().with_handler(DefaultHandler::from_config(&config.masking).shared());
    let mut schema = orders_schema();

    let response = engine.execute(&mut schema, "{ orders { id total } }").await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, INTERNAL_ERROR_MESSAGE);
    assert!(!response.errors[0].message.contains("ledger"));

    // The failing element is nulled, the rest of the list survives
    let data = response.data.into_json()?;
    assert_eq!(data["orders"][0], json!({ "id": "a", "total": 12.5 }));
    assert_eq!(data["orders"][1]["total"], Value::Null);

    Ok(())
}

#[tokio::test]
async fn test_config_driven_correlated_policy() -> Result<()> {
    let file = write_config("masking:\n  policy: correlated\n")?;
    let config = ConfigLoader::with_prefix("MASKQL_E2E_CORRELATED").from_file(file.path())?;

    // Keep the configured policy but capture reports in memory
    let sink = MemorySink::new();
    let handler = DefaultHandler::from_config(&config.masking)
        .with_sink(Arc::new(sink.clone()))
        .shared();

    let mut schema = orders_schema();
    let summary = mask_errors(&mut schema, &handler);
    assert_eq!(summary.fields_wrapped, 3);

    let engine = MaskingEngine::new(GraphQLConfig::default());
    let response = engine.execute(&mut schema, r#"{ order(id: "b") { id } orders { total } }"#).await;

    let mut messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
    messages.sort();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], "order not found");

    let id = messages[0].strip_prefix(INTERNAL_ERROR_PREFIX).expect("masked message");
    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].correlation_id, id);
    assert_eq!(reports[0].coordinate(), "Order.total");
    assert_eq!(reports[0].path.as_deref(), Some("orders.1.total"));
    assert_eq!(reports[0].message, "ledger row missing for order");

    Ok(())
}

#[tokio::test]
async fn test_introspection_can_be_disabled() -> Result<()> {
    let engine = MaskingEngine::new(GraphQLConfig {
        enable_introspection: false,
        ..GraphQLConfig::default()
    })
    .with_handler(DefaultHandler::new().with_sink(Arc::new(MemorySink::new())).shared());
    let mut schema = orders_schema();

    let response = engine.execute(&mut schema, "{ __schema { queryType { name } } }").await;
    assert!(!response.errors.is_empty());

    let response = engine.execute(&mut schema, r#"{ order(id: "a") { id total } }"#).await;
    assert!(response.errors.is_empty());
    assert_eq!(
        response.data.into_json()?,
        json!({ "order": { "id": "a", "total": 12.5 } })
    );

    Ok(())
}
