//! Traversal engine: applies the field wrapper across a schema, a type or a field

use crate::handler::SharedHandler;
use crate::registry;
use crate::schema::{Field, ObjectType, Schema, TypeDef};
use crate::wrap::wrap_field;
use std::ops::AddAssign;

/// What a masking pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskSummary {
    /// Object types marked processed by this pass
    pub types_masked: usize,
    /// Scalars and already-processed types
    pub types_skipped: usize,
    pub fields_wrapped: usize,
    /// Fields without a resolver or already wrapped
    pub fields_skipped: usize,
}

impl AddAssign for MaskSummary {
    fn add_assign(&mut self, other: Self) {
        self.types_masked += other.types_masked;
        self.types_skipped += other.types_skipped;
        self.fields_wrapped += other.fields_wrapped;
        self.fields_skipped += other.fields_skipped;
    }
}

/// Something masking can be applied to
pub trait MaskTarget {
    fn mask_with(&mut self, handler: &SharedHandler) -> MaskSummary;
}

impl MaskTarget for Field {
    fn mask_with(&mut self, handler: &SharedHandler) -> MaskSummary {
        let mut summary = MaskSummary::default();
        if wrap_field(self, handler) {
            summary.fields_wrapped += 1;
        } else {
            summary.fields_skipped += 1;
        }
        summary
    }
}

impl MaskTarget for ObjectType {
    fn mask_with(&mut self, handler: &SharedHandler) -> MaskSummary {
        let mut summary = MaskSummary::default();
        if self.is_processed() {
            summary.types_skipped += 1;
            return summary;
        }

        self.mark_processed();
        summary.types_masked += 1;
        for field in self.fields_mut() {
            summary += field.mask_with(handler);
        }
        summary
    }
}

impl MaskTarget for TypeDef {
    fn mask_with(&mut self, handler: &SharedHandler) -> MaskSummary {
        match self {
            TypeDef::Object(object) => object.mask_with(handler),
            TypeDef::Scalar(_) => MaskSummary {
                types_skipped: 1,
                ..Default::default()
            },
        }
    }
}

impl MaskTarget for Schema {
    fn mask_with(&mut self, handler: &SharedHandler) -> MaskSummary {
        let mut summary = MaskSummary::default();
        for ty in self.types_mut() {
            summary += ty.mask_with(handler);
        }
        self.mark_masked();
        summary
    }
}

/// Mask every reachable resolver of `target` with `handler`
pub fn mask_errors<T>(target: &mut T, handler: &SharedHandler) -> MaskSummary
where
    T: MaskTarget + ?Sized,
{
    target.mask_with(handler)
}

/// [`mask_errors`] with the process-wide default handler, read once now
pub fn mask_errors_with_default<T>(target: &mut T) -> MaskSummary
where
    T: MaskTarget + ?Sized,
{
    let handler = registry::default_handler();
    target.mask_with(&handler)
}
