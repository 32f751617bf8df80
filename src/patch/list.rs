use std::borrow::Cow;
use std::sync::Arc;

use super::{PatchContext, Patcher};
use crate::node::{ComplexNode, ObjectNode};
use crate::reflect::{ElementAccessor, ListShape, Reflect, ValueAccessor};

/// Patcher for one concrete list type.
///
/// A snapshot names every element by its decimal index and records the
/// length as the node's `list_count`. Applying a node brings the live list
/// to that length first (new elements are default-initialized, surplus
/// elements truncated), then patches the elements the node actually
/// carries; a sparse node leaves the rest alone.
pub struct ListPatcher {
    shape: ListShape,
    element: Arc<dyn Patcher>,
}

impl ListPatcher {
    pub(crate) fn new(shape: ListShape, element: Arc<dyn Patcher>) -> Self {
        ListPatcher { shape, element }
    }
}

impl Patcher for ListPatcher {
    fn patch_from(
        &self,
        cx: &mut PatchContext,
        value: Option<&dyn Reflect>,
        name: Cow<'static, str>,
    ) -> Option<ObjectNode> {
        let Some(value) = value else {
            return Some(ComplexNode::null_list(name).into());
        };
        let len = (self.shape.len)(value)?;
        let mut children = Vec::with_capacity(len);
        for index in 0..len {
            let element = (self.shape.get)(value, index);
            if let Some(child) =
                self.element
                    .patch_from(cx, element.as_deref(), Cow::Owned(index.to_string()))
            {
                children.push(child);
            }
        }
        Some(ComplexNode::list(name, len as u32, children).into())
    }

    fn patch_to(
        &self,
        cx: &mut PatchContext,
        slot: &mut Option<Box<dyn Reflect>>,
        node: &ObjectNode,
    ) {
        let Some(node) = node.as_complex() else {
            return;
        };
        // A null list node leaves the live list untouched.
        if !node.is_list() || node.is_null() {
            return;
        }
        let count = node.list_count() as usize;

        if slot.is_none() {
            *slot = Some((self.shape.make)());
        }
        let Some(list) = slot.as_deref_mut() else {
            return;
        };
        if (self.shape.len)(list) != Some(count) {
            (self.shape.resize)(list, count);
        }

        for child in node.children() {
            let Ok(index) = child.name().parse::<usize>() else {
                continue;
            };
            if index >= count {
                continue;
            }
            let accessor = ElementAccessor::new(self.shape, index);
            let mut tmp = accessor.get(list);
            self.element.patch_to(cx, &mut tmp, child);
            accessor.set(list, tmp);
        }
    }
}
