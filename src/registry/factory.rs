use std::sync::Arc;

use super::PatcherRegistry;
use crate::node::NodeType;
use crate::patch::{ListPatcher, PatchContext, Patcher, PrimitivePatcher, RecordPatcher, RefPatcher, RefTable};
use crate::reflect::{TypeDescriptor, TypeShape};

/// Builds patchers for the type descriptors it claims.
///
/// Factories are consulted in registration order and the first claimant
/// wins, so a factory placed ahead of [`CoreFactory`] can take over any
/// type with a bespoke patcher. `prepare_context` runs once per operation
/// and lets a factory install whatever per-operation state its patchers
/// read from the [`PatchContext`].
pub trait PatcherFactory: Send + Sync {
    fn claims(&self, registry: &PatcherRegistry, ty: &TypeDescriptor) -> bool;

    /// `None` drops the slot from patching altogether, the same way an
    /// unclaimed type does.
    fn create_patcher(
        &self,
        registry: &Arc<PatcherRegistry>,
        ty: &TypeDescriptor,
    ) -> Option<Arc<dyn Patcher>>;

    fn prepare_context(&self, _cx: &mut PatchContext) {}
}

/// Factory for primitives, lists and records.
pub struct CoreFactory;

impl PatcherFactory for CoreFactory {
    fn claims(&self, registry: &PatcherRegistry, ty: &TypeDescriptor) -> bool {
        !matches!(ty.shape(), TypeShape::Handle) && registry.is_serializable(ty, false)
    }

    fn create_patcher(
        &self,
        registry: &Arc<PatcherRegistry>,
        ty: &TypeDescriptor,
    ) -> Option<Arc<dyn Patcher>> {
        match ty.shape() {
            TypeShape::Int => Some(Arc::new(PrimitivePatcher::new(NodeType::Int))),
            TypeShape::UInt => Some(Arc::new(PrimitivePatcher::new(NodeType::UInt))),
            TypeShape::Str => Some(Arc::new(PrimitivePatcher::new(NodeType::String))),
            TypeShape::List(shape) => {
                let element = registry.schema().get(shape.element)?.clone();
                if !registry.is_serializable(&element, true) {
                    return None;
                }
                let patcher = registry.create_patcher(&element)?;
                Some(Arc::new(ListPatcher::new(*shape, patcher)))
            }
            TypeShape::Record(shape) => {
                let mut slots = Vec::with_capacity(shape.fields().len());
                for field in shape.fields() {
                    if !registry.is_field_eligible(field) {
                        continue;
                    }
                    // Fields whose type has no descriptor or no willing
                    // factory drop out of the record silently.
                    let Some(field_ty) = registry.schema().get(field.ty()).cloned() else {
                        continue;
                    };
                    let Some(patcher) = registry.create_patcher(&field_ty) else {
                        continue;
                    };
                    slots.push((field.name(), field.accessor().clone(), patcher));
                }
                Some(Arc::new(RecordPatcher::new(slots, shape.instantiate_fn())))
            }
            TypeShape::Handle => None,
        }
    }
}

/// Factory for [`ObjRef`](crate::reflect::ObjRef) slots. Installs the
/// operation's [`RefTable`].
pub struct RefFactory;

impl PatcherFactory for RefFactory {
    fn claims(&self, _registry: &PatcherRegistry, ty: &TypeDescriptor) -> bool {
        matches!(ty.shape(), TypeShape::Handle)
    }

    fn create_patcher(
        &self,
        registry: &Arc<PatcherRegistry>,
        _ty: &TypeDescriptor,
    ) -> Option<Arc<dyn Patcher>> {
        Some(Arc::new(RefPatcher::new(Arc::downgrade(registry))))
    }

    fn prepare_context(&self, cx: &mut PatchContext) {
        cx.install(RefTable::new());
    }
}
