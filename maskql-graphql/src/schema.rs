//! Executable schema construction

use crate::context::{ExecutionContext, GraphQLConfig};
use crate::errors::{to_graphql_error, BridgeError};
use async_graphql::dynamic::{self, FieldFuture, FieldValue, InputValue, Object, ResolverContext, Scalar, TypeRef};
use async_graphql::{Request, Response, ServerError, Value as ConstValue};
use maskql_core::{Field, ObjectType, ResolveContext, ResolveInfo, Schema, TypeDef};
use serde_json::{Map, Value};

const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Build an `async-graphql` dynamic schema whose fields call the resolvers
/// currently installed in `schema`.
///
/// The result captures the resolvers at build time; mask first, then build.
pub fn build_executable(schema: &Schema, config: &GraphQLConfig) -> Result<dynamic::Schema, BridgeError> {
    for root in std::iter::once(schema.query_type()).chain(schema.mutation_type()) {
        if schema.object(root).is_none() {
            return Err(BridgeError::UnknownRootType(root.to_string()));
        }
    }

    let mut builder = dynamic::Schema::build(schema.query_type(), schema.mutation_type(), None);

    for ty in schema.type_map().values() {
        builder = match ty {
            TypeDef::Object(object) => builder.register(build_object(object)?),
            TypeDef::Scalar(scalar) if BUILTIN_SCALARS.contains(&scalar.name()) => builder,
            TypeDef::Scalar(scalar) => {
                let mut registered = Scalar::new(scalar.name());
                if let Some(description) = scalar.description() {
                    registered = registered.description(description);
                }
                builder.register(registered)
            }
        };
    }

    if let Some(depth) = config.max_query_depth {
        builder = builder.limit_depth(depth);
    }

    if let Some(complexity) = config.max_query_complexity {
        builder = builder.limit_complexity(complexity);
    }

    if !config.enable_introspection {
        builder = builder.disable_introspection();
    }

    Ok(builder.finish()?)
}

/// Build and execute in one step. Bridge failures come back as a response error.
pub async fn execute(schema: &Schema, config: &GraphQLConfig, request: impl Into<Request>) -> Response {
    match build_executable(schema, config) {
        Ok(executable) => executable.execute(request).await,
        Err(error) => {
            tracing::warn!(%error, "Failed to build executable schema");
            Response::from_errors(vec![ServerError::new(error.to_string(), None)])
        }
    }
}

/// Parse an SDL type reference: `Name`, `Name!`, `[Name]`, `[Name!]!`, ...
pub fn parse_type_ref(type_ref: &str) -> Option<TypeRef> {
    let type_ref = type_ref.trim();

    if let Some(inner) = type_ref.strip_suffix('!') {
        return match parse_type_ref(inner)? {
            TypeRef::NonNull(_) => None,
            inner => Some(TypeRef::NonNull(Box::new(inner))),
        };
    }

    if let Some(inner) = type_ref.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return parse_type_ref(inner).map(|inner| TypeRef::List(Box::new(inner)));
    }

    let valid_name = type_ref
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && type_ref.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    valid_name.then(|| TypeRef::named(type_ref))
}

fn is_list(type_ref: &str) -> bool {
    type_ref.trim().trim_end_matches('!').starts_with('[')
}

fn invalid_type_ref(type_name: &str, field: &Field, type_ref: &str) -> BridgeError {
    BridgeError::InvalidTypeRef {
        coordinate: format!("{}.{}", type_name, field.name()),
        type_ref: type_ref.to_string(),
    }
}

fn build_object(object: &ObjectType) -> Result<Object, BridgeError> {
    let mut registered = Object::new(object.name());
    if let Some(description) = object.description() {
        registered = registered.description(description);
    }

    for field in object.fields() {
        registered = registered.field(build_field(object.name(), field)?);
    }

    Ok(registered)
}

fn build_field(type_name: &str, field: &Field) -> Result<dynamic::Field, BridgeError> {
    let ty = parse_type_ref(field.ty()).ok_or_else(|| invalid_type_ref(type_name, field, field.ty()))?;
    let list = is_list(field.ty());
    let parent_type = type_name.to_string();
    let source = field.clone();

    let mut registered = dynamic::Field::new(field.name(), ty, move |ctx| {
        // Invoke the resolver now; only its outcome is awaited
        let resolution = resolve_context(&parent_type, source.name(), &ctx).map(|rctx| source.resolve(rctx));

        FieldFuture::new(async move {
            let value = resolution?.into_future().await.map_err(to_graphql_error)?;
            to_field_value(value, list)
        })
    });

    for argument in field.arguments() {
        let arg_ty = parse_type_ref(&argument.ty).ok_or_else(|| invalid_type_ref(type_name, field, &argument.ty))?;
        registered = registered.argument(InputValue::new(argument.name.as_str(), arg_ty));
    }

    if let Some(description) = field.description() {
        registered = registered.description(description);
    }

    Ok(registered)
}

fn resolve_context(
    parent_type: &str,
    field_name: &str,
    ctx: &ResolverContext<'_>,
) -> async_graphql::Result<ResolveContext> {
    let parent = match ctx.parent_value.as_value() {
        Some(value) => value.clone().into_json()?,
        None => Value::Null,
    };

    let mut args = Map::new();
    for (name, value) in ctx.args.as_index_map() {
        args.insert(name.to_string(), value.clone().into_json()?);
    }

    let context = ctx
        .ctx
        .data_opt::<ExecutionContext>()
        .map(|data| data.0.clone())
        .unwrap_or_default();

    let path = ctx
        .ctx
        .path_node
        .map(|node| node.to_string_vec())
        .unwrap_or_default();

    Ok(ResolveContext::new(ResolveInfo::new(parent_type, field_name).with_path(path))
        .with_parent(parent)
        .with_args(args)
        .with_context(context))
}

fn to_field_value<'a>(value: Value, list: bool) -> async_graphql::Result<Option<FieldValue<'a>>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) if list => {
            let items = items
                .into_iter()
                .map(|item| match item {
                    Value::Null => Ok(FieldValue::NULL),
                    item => ConstValue::from_json(item).map(FieldValue::value),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(FieldValue::list(items)))
        }
        other => Ok(Some(FieldValue::value(ConstValue::from_json(other)?))),
    }
}
