use core::any::TypeId;
use std::sync::{Arc, RwLock};

use super::{CoreFactory, PatcherFactory, RefFactory, SchemaRegistry};
use crate::hash::HashMap;
use crate::patch::{PatchContext, Patcher};
use crate::reflect::{FieldDescriptor, Reflect, TypeDescriptor, TypeShape};

/// Field eligibility predicate; the default keeps fields whose descriptor
/// is marked serialized.
pub type FieldFilter = fn(&FieldDescriptor) -> bool;

/// Type serializability predicate. The second argument is `true` when the
/// type is being judged as a type argument of another type rather than as
/// a slot type; the default refuses lists in that position, so lists nest
/// one level only.
pub type TypeFilter = fn(&SchemaRegistry, &TypeDescriptor, bool) -> bool;

fn default_field_filter(field: &FieldDescriptor) -> bool {
    field.serialized()
}

fn default_type_filter(_schema: &SchemaRegistry, ty: &TypeDescriptor, as_type_arg: bool) -> bool {
    !(as_type_arg && matches!(ty.shape(), TypeShape::List(_)))
}

/// Resolves type descriptors to [`Patcher`]s through an ordered factory
/// chain, caching the result per concrete type.
///
/// A registry is built once and shared behind an [`Arc`]; each patcher is
/// created at most once and every slot of that type shares the cached
/// instance, so a per-type patcher may carry per-type state.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use objpatch::registry::{PatcherRegistry, SchemaRegistry};
///
/// let mut schema = SchemaRegistry::new();
/// schema.register::<Vec<i32>>();
/// let registry = PatcherRegistry::new(Arc::new(schema));
/// assert!(registry.patcher_for::<Vec<i32>>().is_some());
/// ```
pub struct PatcherRegistry {
    schema: Arc<SchemaRegistry>,
    factories: Vec<Box<dyn PatcherFactory>>,
    field_filter: FieldFilter,
    type_filter: TypeFilter,
    cache: RwLock<HashMap<TypeId, Arc<dyn Patcher>>>,
}

impl PatcherRegistry {
    /// A registry with the default factory chain: [`RefFactory`] then
    /// [`CoreFactory`].
    pub fn new(schema: Arc<SchemaRegistry>) -> Arc<Self> {
        Self::with_factories(schema, vec![Box::new(RefFactory), Box::new(CoreFactory)])
    }

    /// A registry with a custom factory chain. The chain replaces the
    /// defaults; callers wanting them too must include them, usually last.
    pub fn with_factories(
        schema: Arc<SchemaRegistry>,
        factories: Vec<Box<dyn PatcherFactory>>,
    ) -> Arc<Self> {
        Self::with_filters(schema, factories, default_field_filter, default_type_filter)
    }

    pub fn with_filters(
        schema: Arc<SchemaRegistry>,
        factories: Vec<Box<dyn PatcherFactory>>,
        field_filter: FieldFilter,
        type_filter: TypeFilter,
    ) -> Arc<Self> {
        Arc::new(PatcherRegistry {
            schema,
            factories,
            field_filter,
            type_filter,
            cache: RwLock::new(HashMap::default()),
        })
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn is_field_eligible(&self, field: &FieldDescriptor) -> bool {
        (self.field_filter)(field)
    }

    pub fn is_serializable(&self, ty: &TypeDescriptor, as_type_arg: bool) -> bool {
        (self.type_filter)(&self.schema, ty, as_type_arg)
    }

    fn find_factory(&self, ty: &TypeDescriptor) -> Option<&dyn PatcherFactory> {
        self.factories
            .iter()
            .map(|f| f.as_ref())
            .find(|f| f.claims(self, ty))
    }

    /// Looks up or builds the patcher for a descriptor. `None` when no
    /// factory claims the type.
    ///
    /// The cache lock is held only around lookup and insert, never while a
    /// factory runs, because building a record patcher re-enters this
    /// method for its field types.
    pub fn create_patcher(self: &Arc<Self>, ty: &TypeDescriptor) -> Option<Arc<dyn Patcher>> {
        if let Ok(cache) = self.cache.read() {
            if let Some(patcher) = cache.get(&ty.id()) {
                return Some(patcher.clone());
            }
        }

        let patcher = self.find_factory(ty)?.create_patcher(self, ty)?;

        match self.cache.write() {
            Ok(mut cache) => Some(cache.entry(ty.id()).or_insert(patcher).clone()),
            Err(_) => Some(patcher),
        }
    }

    /// The patcher for `T`, if `T` is registered and claimed.
    pub fn patcher_for<T: Reflect>(self: &Arc<Self>) -> Option<Arc<dyn Patcher>> {
        let ty = self.schema.get_for::<T>()?.clone();
        self.create_patcher(&ty)
    }

    /// Offers a fresh per-operation context to every factory.
    pub fn prepare_context(&self, cx: &mut PatchContext) {
        for factory in &self.factories {
            factory.prepare_context(cx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::RefTable;
    use crate::reflect::ObjRef;

    fn registry() -> Arc<PatcherRegistry> {
        let mut schema = SchemaRegistry::new();
        schema.register::<Vec<i32>>();
        schema.register::<Vec<Vec<i32>>>();
        PatcherRegistry::new(Arc::new(schema))
    }

    #[test]
    fn patchers_are_cached_per_type() {
        let registry = registry();
        let a = registry.patcher_for::<i32>().unwrap();
        let b = registry.patcher_for::<i32>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn nested_lists_are_refused() {
        let registry = registry();
        assert!(registry.patcher_for::<Vec<i32>>().is_some());
        // The inner list sits at type-argument position.
        assert!(registry.patcher_for::<Vec<Vec<i32>>>().is_none());
    }

    #[test]
    fn unregistered_types_have_no_patcher() {
        let registry = registry();
        assert!(registry.patcher_for::<Vec<u32>>().is_none());
    }

    #[test]
    fn prepare_context_installs_ref_table() {
        let registry = registry();
        let mut cx = PatchContext::new();
        registry.prepare_context(&mut cx);
        assert!(cx.get_mut::<RefTable>().is_some());
        assert!(registry.patcher_for::<ObjRef>().is_some());
    }
}
