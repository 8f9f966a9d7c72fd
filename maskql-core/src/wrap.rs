//! Field wrapper: intercepts failures of a single resolution function

use crate::errors::ResolveError;
use crate::handler::{ErrorHandler, SharedHandler};
use crate::panic_hook;
use crate::schema::{Field, Resolution, ResolveContext, ResolveInfo, Resolver};
use futures::future::{self, FutureExt};
use std::panic::{self, AssertUnwindSafe};

/// Wrap the field's resolver so failures go through `handler`.
///
/// Returns `false` without touching the field when it has no resolver or is
/// already processed.
pub fn wrap_field(field: &mut Field, handler: &SharedHandler) -> bool {
    panic_hook::install();
    let handler = handler.clone();
    field.install_masked(move |original| masked_resolver(original, handler))
}

/// User-facing errors pass through without calling the handler; everything
/// else is replaced by the handler's result.
pub fn apply_policy(handler: &dyn ErrorHandler, error: ResolveError, info: &ResolveInfo) -> ResolveError {
    if error.is_user_facing() {
        error
    } else {
        handler.handle(error, info)
    }
}

fn masked_resolver(original: Resolver, handler: SharedHandler) -> Resolver {
    Resolver::new(move |ctx: ResolveContext| {
        let info = ctx.info.clone();

        // The original still runs synchronously at call time; only its
        // outcome is normalized into a single future.
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| original.call(ctx))) {
            Ok(resolution) => resolution.into_future(),
            Err(payload) => future::ready(Err(ResolveError::from_panic(payload))).boxed(),
        };

        let handler = handler.clone();
        Resolution::Pending(
            async move {
                let result = match AssertUnwindSafe(outcome).catch_unwind().await {
                    Ok(result) => result,
                    Err(payload) => Err(ResolveError::from_panic(payload)),
                };
                result.map_err(|error| apply_policy(handler.as_ref(), error, &info))
            }
            .boxed(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InternalError;
    use crate::handler::{handler_fn, DefaultHandler};
    use maskql_logging::MemorySink;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_handler(calls: Arc<AtomicUsize>) -> SharedHandler {
        handler_fn(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            InternalError::opaque().into()
        })
    }

    fn ctx() -> ResolveContext {
        ResolveContext::new(ResolveInfo::new("Query", "field"))
    }

    async fn run(field: &Field) -> Result<Value, ResolveError> {
        field.resolve(ctx()).into_future().await
    }

    #[test]
    fn test_no_resolver_is_noop() {
        let mut field = Field::new("field", "String");
        let handler = DefaultHandler::default().shared();

        assert!(!wrap_field(&mut field, &handler));
        assert!(field.resolver().is_none());
        assert!(!field.is_processed());
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let mut field = Field::new("field", "String").with_resolver(Resolver::sync(|_| Ok(json!(1))));
        let handler = DefaultHandler::default().shared();

        assert!(wrap_field(&mut field, &handler));
        let first = field.resolver().cloned().unwrap();

        assert!(!wrap_field(&mut field, &handler));
        assert!(field.is_processed());
        assert!(field.resolver().unwrap().ptr_eq(&first));
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let original = Resolver::sync(|ctx| Ok(json!({ "field": ctx.info.field_name })));
        let mut field = Field::new("field", "String").with_resolver(original.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        wrap_field(&mut field, &counting_handler(calls.clone()));

        assert_eq!(run(&field).await.unwrap(), json!({ "field": "field" }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(field.original_resolver().unwrap().ptr_eq(&original));
    }

    #[tokio::test]
    async fn test_sync_error_is_masked() {
        let sink = MemorySink::new();
        let handler = DefaultHandler::new()
            .with_sink(Arc::new(sink.clone()))
            .with_id_source(|| "abc".to_string())
            .shared();
        let mut field = Field::new("field", "String")
            .with_resolver(Resolver::sync(|_| Err(ResolveError::msg("secret error"))));

        wrap_field(&mut field, &handler);
        let error = run(&field).await.unwrap_err();

        assert_eq!(error.to_string(), "Internal Error: abc");
        assert_eq!(sink.reports()[0].message, "secret error");
    }

    #[tokio::test]
    async fn test_sync_panic_is_masked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut field = Field::new("field", "String")
            .with_resolver(Resolver::sync(|_| panic!("secret error")));

        wrap_field(&mut field, &counting_handler(calls.clone()));
        let error = run(&field).await.unwrap_err();

        assert_eq!(error.to_string(), "internal error");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_async_rejection_is_masked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut field = Field::new("field", "String").with_resolver(Resolver::from_async(|_| async {
            tokio::task::yield_now().await;
            Err(ResolveError::msg("secret error"))
        }));

        wrap_field(&mut field, &counting_handler(calls.clone()));
        let error = run(&field).await.unwrap_err();

        assert_eq!(error.to_string(), "internal error");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_async_panic_is_masked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut field = Field::new("field", "String").with_resolver(Resolver::from_async(|_| async {
            if true {
                panic!("secret error");
            }
            Ok(Value::Null)
        }));

        wrap_field(&mut field, &counting_handler(calls.clone()));
        let error = run(&field).await.unwrap_err();

        assert!(!error.to_string().contains("secret"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_user_error_skips_handler_on_both_paths() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = counting_handler(calls.clone());

        let mut sync = Field::new("sync", "String")
            .with_resolver(Resolver::sync(|_| Err(ResolveError::user("custom error"))));
        let mut pending = Field::new("pending", "String").with_resolver(Resolver::from_async(|_| async {
            Err(ResolveError::user("custom error"))
        }));

        wrap_field(&mut sync, &handler);
        wrap_field(&mut pending, &handler);

        assert_eq!(run(&sync).await.unwrap_err().to_string(), "custom error");
        assert_eq!(run(&pending).await.unwrap_err().to_string(), "custom error");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_receives_field_coordinates() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let seen_in_handler = seen.clone();
        let handler = handler_fn(move |error, info| {
            *seen_in_handler.lock().unwrap() = Some(info.clone());
            error
        });
        let mut field = Field::new("field", "String")
            .with_resolver(Resolver::sync(|_| Err(ResolveError::msg("x"))));

        wrap_field(&mut field, &handler);
        let ctx = ResolveContext::new(ResolveInfo::new("Query", "field").with_path(vec!["field".into()]));
        let _ = field.resolve(ctx).into_future().await;

        let info = seen.lock().unwrap().clone().unwrap();
        assert_eq!(info.parent_type, "Query");
        assert_eq!(info.path_string(), "field");
    }

    #[tokio::test]
    async fn test_panic_report_carries_location() {
        let sink = MemorySink::new();
        let handler = DefaultHandler::new().with_sink(Arc::new(sink.clone())).shared();
        let mut sync = Field::new("sync", "String")
            .with_resolver(Resolver::sync(|_| panic!("secret error")));
        let mut pending = Field::new("pending", "String").with_resolver(Resolver::from_async(|_| async {
            tokio::task::yield_now().await;
            if true {
                panic!("secret error");
            }
            Ok(Value::Null)
        }));

        wrap_field(&mut sync, &handler);
        wrap_field(&mut pending, &handler);
        run(&sync).await.unwrap_err();
        run(&pending).await.unwrap_err();

        let reports = sink.reports();
        assert_eq!(reports.len(), 2);
        for report in reports {
            let stack_trace = report.stack_trace.unwrap();
            assert!(stack_trace.starts_with("panicked at "), "{}", stack_trace);
            assert!(stack_trace.contains("wrap.rs"), "{}", stack_trace);
        }
    }
}
