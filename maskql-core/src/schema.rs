//! Schema graph: type map -> field map -> resolution function
//!
//! A field's resolver slot is either `Plain` or `Masked`. Masking moves the
//! application's resolver into the `Masked` slot next to its wrapper, so the
//! original stays reachable and a field can never be wrapped twice.

use crate::errors::ResolveError;
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Outcome of a resolution function
pub type FieldResult = Result<Value, ResolveError>;

/// A resolution either completes immediately or is still pending
pub enum Resolution {
    Ready(FieldResult),
    Pending(BoxFuture<'static, FieldResult>),
}

impl Resolution {
    /// Normalize both forms into one future
    pub fn into_future(self) -> BoxFuture<'static, FieldResult> {
        match self {
            Resolution::Ready(result) => future::ready(result).boxed(),
            Resolution::Pending(pending) => pending,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Resolution::Ready(_))
    }
}

impl From<FieldResult> for Resolution {
    fn from(result: FieldResult) -> Self {
        Resolution::Ready(result)
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Resolution::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Where in the schema a resolution happens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveInfo {
    pub parent_type: String,
    pub field_name: String,
    /// Response path segments, e.g. `["users", "0", "name"]`
    pub path: Vec<String>,
}

impl ResolveInfo {
    pub fn new(parent_type: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            parent_type: parent_type.into(),
            field_name: field_name.into(),
            path: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }

    /// Dotted response path, empty when unknown
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }
}

/// Arguments passed to a resolution function
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    pub parent: Value,
    pub args: Map<String, Value>,
    /// Per-request execution context supplied by the caller
    pub context: Value,
    pub info: ResolveInfo,
}

impl ResolveContext {
    pub fn new(info: ResolveInfo) -> Self {
        Self {
            info,
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: Value) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_args(mut self, args: Map<String, Value>) -> Self {
        self.args = args;
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }
}

type ResolveFn = dyn Fn(ResolveContext) -> Resolution + Send + Sync;

/// Shared handle to a resolution function
#[derive(Clone)]
pub struct Resolver(Arc<ResolveFn>);

impl Resolver {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(ResolveContext) -> Resolution + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Resolver that always completes immediately
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(ResolveContext) -> FieldResult + Send + Sync + 'static,
    {
        Self::new(move |ctx| Resolution::Ready(f(ctx)))
    }

    /// Resolver that returns a future
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(ResolveContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FieldResult> + Send + 'static,
    {
        Self::new(move |ctx| Resolution::Pending(f(ctx).boxed()))
    }

    pub fn call(&self, ctx: ResolveContext) -> Resolution {
        (self.0)(ctx)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Resolver) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resolver({:p})", Arc::as_ptr(&self.0))
    }
}

#[derive(Debug, Clone)]
enum ResolverSlot {
    Plain(Resolver),
    Masked { original: Resolver, masked: Resolver },
}

/// Field argument definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    /// Type reference in SDL form, e.g. `ID!`
    pub ty: String,
}

/// A named field of an object type
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    ty: String,
    arguments: Vec<Argument>,
    description: Option<String>,
    slot: Option<ResolverSlot>,
}

impl Field {
    /// `ty` is an SDL type reference such as `String`, `Int!` or `[User!]!`
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            arguments: Vec::new(),
            description: None,
            slot: None,
        }
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.slot = Some(ResolverSlot::Plain(resolver));
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The resolver currently installed, masked or not
    pub fn resolver(&self) -> Option<&Resolver> {
        match &self.slot {
            Some(ResolverSlot::Plain(resolver)) => Some(resolver),
            Some(ResolverSlot::Masked { masked, .. }) => Some(masked),
            None => None,
        }
    }

    /// The resolver the application installed
    pub fn original_resolver(&self) -> Option<&Resolver> {
        match &self.slot {
            Some(ResolverSlot::Plain(resolver)) => Some(resolver),
            Some(ResolverSlot::Masked { original, .. }) => Some(original),
            None => None,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self.slot, Some(ResolverSlot::Masked { .. }))
    }

    /// Replace a plain resolver with `wrap(original)`. Returns false when there
    /// is no resolver or the field is already masked.
    pub(crate) fn install_masked<W>(&mut self, wrap: W) -> bool
    where
        W: FnOnce(Resolver) -> Resolver,
    {
        match self.slot.take() {
            Some(ResolverSlot::Plain(original)) => {
                let masked = wrap(original.clone());
                self.slot = Some(ResolverSlot::Masked { original, masked });
                true
            }
            other => {
                self.slot = other;
                false
            }
        }
    }

    /// Run the installed resolver. Without one, the field reads the property of
    /// the same name from the parent value.
    pub fn resolve(&self, ctx: ResolveContext) -> Resolution {
        match self.resolver() {
            Some(resolver) => resolver.call(ctx),
            None => {
                let value = ctx.parent.get(&self.name).cloned().unwrap_or(Value::Null);
                Resolution::Ready(Ok(value))
            }
        }
    }
}

/// Object type: a named collection of fields
#[derive(Debug, Clone)]
pub struct ObjectType {
    name: String,
    description: Option<String>,
    fields: BTreeMap<String, Field>,
    processed: bool,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: BTreeMap::new(),
            processed: false,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.insert_field(field);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add or replace a field. An unmasked field clears the processed marker so
    /// the next masking pass visits this type again.
    pub fn insert_field(&mut self, field: Field) -> Option<Field> {
        if field.resolver().is_some() && !field.is_processed() {
            self.processed = false;
        }
        self.fields.insert(field.name.clone(), field)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub(crate) fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.values_mut()
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub(crate) fn mark_processed(&mut self) {
        self.processed = true;
    }
}

/// Leaf type without fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    name: String,
    description: Option<String>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Entry of the schema type map
#[derive(Debug, Clone)]
pub enum TypeDef {
    Object(ObjectType),
    Scalar(ScalarType),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Object(object) => object.name(),
            TypeDef::Scalar(scalar) => scalar.name(),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeDef::Object(object) => Some(object),
            TypeDef::Scalar(_) => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectType> {
        match self {
            TypeDef::Object(object) => Some(object),
            TypeDef::Scalar(_) => None,
        }
    }
}

impl From<ObjectType> for TypeDef {
    fn from(object: ObjectType) -> Self {
        TypeDef::Object(object)
    }
}

impl From<ScalarType> for TypeDef {
    fn from(scalar: ScalarType) -> Self {
        TypeDef::Scalar(scalar)
    }
}

/// Executable schema: root operation types plus the type map
#[derive(Debug, Clone)]
pub struct Schema {
    query_type: String,
    mutation_type: Option<String>,
    types: BTreeMap<String, TypeDef>,
    masked: bool,
}

impl Schema {
    pub fn new(query_type: impl Into<String>) -> Self {
        Self {
            query_type: query_type.into(),
            mutation_type: None,
            types: BTreeMap::new(),
            masked: false,
        }
    }

    pub fn with_mutation_type(mut self, mutation_type: impl Into<String>) -> Self {
        self.mutation_type = Some(mutation_type.into());
        self
    }

    pub fn with_type(mut self, ty: impl Into<TypeDef>) -> Self {
        self.insert_type(ty);
        self
    }

    /// Add or replace a type. Clears the schema marker so lazy activation masks again.
    pub fn insert_type(&mut self, ty: impl Into<TypeDef>) -> Option<TypeDef> {
        let ty = ty.into();
        if matches!(&ty, TypeDef::Object(object) if !object.is_processed()) {
            self.masked = false;
        }
        self.types.insert(ty.name().to_string(), ty)
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn type_map(&self) -> &BTreeMap<String, TypeDef> {
        &self.types
    }

    pub(crate) fn types_mut(&mut self) -> impl Iterator<Item = &mut TypeDef> {
        self.types.values_mut()
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        self.types.get(name).and_then(TypeDef::as_object)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut ObjectType> {
        self.types.get_mut(name).and_then(TypeDef::as_object_mut)
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&Field> {
        self.object(type_name).and_then(|object| object.field(field_name))
    }

    pub fn field_mut(&mut self, type_name: &str, field_name: &str) -> Option<&mut Field> {
        self.object_mut(type_name)
            .and_then(|object| object.field_mut(field_name))
    }

    /// True once a whole-schema masking pass ran and no object type has been
    /// given an unmasked field since
    pub fn is_masked(&self) -> bool {
        self.masked
            && self
                .types
                .values()
                .filter_map(TypeDef::as_object)
                .all(ObjectType::is_processed)
    }

    pub(crate) fn mark_masked(&mut self) {
        self.masked = true;
    }
}
