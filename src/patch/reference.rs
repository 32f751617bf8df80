use std::borrow::Cow;
use std::sync::Weak;

use super::{PatchContext, Patcher, RefTable};
use crate::node::{ComplexNode, ObjectNode, Primitive, PrimitiveNode};
use crate::reflect::{ObjRef, Reflect, TypeShape};
use crate::registry::PatcherRegistry;

/// Meta child carrying the concrete type tag of a first-encounter object.
pub(crate) const TYPE_FIELD: &str = ":Type:";
/// Meta child carrying the id assigned to a first-encounter object.
pub(crate) const REFERENCE_ID_FIELD: &str = ":ReferenceId:";
/// Sole child of a node standing for an already-encountered object.
pub(crate) const REFERENCE_TO_FIELD: &str = ":ReferenceTo:";

/// Patcher for [`ObjRef`] slots, the identity-tracking point of the engine.
///
/// The first snapshot of an object inlines its full record node plus
/// `:Type:` and `:ReferenceId:` meta children; every later encounter
/// collapses to a single `:ReferenceTo:` leaf. Objects are registered in
/// the operation's [`RefTable`] *before* their fields are walked, so cycles
/// terminate. The meta names start with `:`, which sorts before any
/// identifier, so the record merge-join skips them without losing its
/// cursor.
///
/// Applying a `:ReferenceTo:` node adopts the object registered under that
/// id; ids only become known when their defining node has been applied, so
/// a reference pointing at a node that sorts later in the tree stays
/// unresolved and the slot keeps its previous handle.
pub struct RefPatcher {
    registry: Weak<PatcherRegistry>,
}

impl RefPatcher {
    pub(crate) fn new(registry: Weak<PatcherRegistry>) -> Self {
        RefPatcher { registry }
    }
}

impl Patcher for RefPatcher {
    fn patch_from(
        &self,
        cx: &mut PatchContext,
        value: Option<&dyn Reflect>,
        name: Cow<'static, str>,
    ) -> Option<ObjectNode> {
        let Some(value) = value else {
            return Some(ComplexNode::null(name).into());
        };
        let handle = value.downcast_ref::<ObjRef>()?;
        if handle.is_null() {
            return Some(ComplexNode::null(name).into());
        }

        if let Some(id) = cx.get_mut::<RefTable>()?.find_id(handle) {
            let back_ref = PrimitiveNode::new(REFERENCE_TO_FIELD, id).into();
            return Some(ComplexNode::record(name, vec![back_ref]).into());
        }

        let registry = self.registry.upgrade()?;
        let type_id = handle.object_type_id()?;
        let descriptor = registry.schema().get(type_id)?.clone();
        let patcher = registry.create_patcher(&descriptor)?;

        // Register before recursing so a cycle back to this object hits the
        // back-reference branch above.
        let id = cx.get_mut::<RefTable>()?.register(handle)?;

        let detached = handle.detach(Box::new(()))?;
        let node = patcher.patch_from(cx, Some(&*detached), name);
        handle.attach(detached);

        match node? {
            ObjectNode::Complex(body) if !body.is_null() => {
                let name = Cow::Owned(body.name().to_string());
                let mut children = body.into_children();
                children.push(PrimitiveNode::new(TYPE_FIELD, descriptor.name()).into());
                children.push(PrimitiveNode::new(REFERENCE_ID_FIELD, id).into());
                Some(ComplexNode::record(name, children).into())
            }
            node => Some(node),
        }
    }

    fn patch_to(
        &self,
        cx: &mut PatchContext,
        slot: &mut Option<Box<dyn Reflect>>,
        node: &ObjectNode,
    ) {
        let Some(complex) = node.as_complex() else {
            return;
        };
        if complex.is_null() {
            *slot = Some(Box::new(ObjRef::null()));
            return;
        }

        if let Some(id) = back_reference(complex) {
            if let Some(table) = cx.get::<RefTable>() {
                if let Some(obj) = table.find_object(id) {
                    *slot = Some(Box::new(obj.clone()));
                }
            }
            return;
        }

        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        let mut handle = slot
            .as_deref()
            .and_then(|v| v.downcast_ref::<ObjRef>())
            .cloned()
            .unwrap_or_default();

        let tag = complex
            .find_child(TYPE_FIELD)
            .and_then(|c| c.value())
            .and_then(Primitive::as_str);
        let live_name = handle
            .object_type_id()
            .and_then(|id| registry.schema().get(id))
            .map(|d| d.name());

        let needs_new = match (live_name, tag) {
            (None, _) => true,
            (Some(live), Some(tag)) => live != tag,
            (Some(_), None) => false,
        };
        if needs_new {
            let Some(instance) = tag.and_then(|t| registry.schema().instantiate(t)) else {
                return;
            };
            handle = ObjRef::from_boxed(instance);
            *slot = Some(Box::new(handle.clone()));
        }

        if let Some(Primitive::Int(id)) = complex
            .find_child(REFERENCE_ID_FIELD)
            .and_then(ObjectNode::value)
        {
            if let Some(table) = cx.get_mut::<RefTable>() {
                table.register_id(*id, &handle);
            }
        }

        let Some(type_id) = handle.object_type_id() else {
            return;
        };
        let Some(descriptor) = registry.schema().get(type_id).cloned() else {
            return;
        };
        if !matches!(descriptor.shape(), TypeShape::Record(_)) {
            return;
        }
        let Some(patcher) = registry.create_patcher(&descriptor) else {
            return;
        };

        let Some(detached) = handle.detach(Box::new(())) else {
            return;
        };
        let mut inner = Some(detached);
        patcher.patch_to(cx, &mut inner, node);
        if let Some(patched) = inner {
            handle.attach(patched);
        }
    }
}

fn back_reference(node: &ComplexNode) -> Option<i32> {
    match node.find_child(REFERENCE_TO_FIELD)?.value()? {
        Primitive::Int(id) => Some(*id),
        _ => None,
    }
}
