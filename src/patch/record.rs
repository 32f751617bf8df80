use core::cmp::Ordering;
use std::borrow::Cow;
use std::sync::Arc;

use super::{PatchContext, Patcher};
use crate::node::{ComplexNode, ObjectNode};
use crate::reflect::{Reflect, ValueAccessor};

struct FieldSlot {
    name: &'static str,
    accessor: Arc<dyn ValueAccessor>,
    patcher: Arc<dyn Patcher>,
}

/// Patcher for one record type.
///
/// Holds one slot per eligible field, sorted by name. Applying a node
/// merge-joins the node's name-sorted children against the slots with a
/// single forward cursor: a child with no matching slot is skipped without
/// moving the cursor, a slot with no matching child is left untouched.
/// Either way, unknown names on both sides are tolerated.
pub struct RecordPatcher {
    slots: Vec<FieldSlot>,
    instantiate: fn() -> Box<dyn Reflect>,
}

impl RecordPatcher {
    /// `slots` must arrive name-sorted; the registry builds them from the
    /// already-sorted field table.
    pub(crate) fn new(
        slots: Vec<(&'static str, Arc<dyn ValueAccessor>, Arc<dyn Patcher>)>,
        instantiate: fn() -> Box<dyn Reflect>,
    ) -> Self {
        RecordPatcher {
            slots: slots
                .into_iter()
                .map(|(name, accessor, patcher)| FieldSlot {
                    name,
                    accessor,
                    patcher,
                })
                .collect(),
            instantiate,
        }
    }

    /// Non-rewinding merge-join lookup. Advances past slots that sort
    /// before `name`; on a slot sorting after `name` the cursor stays put
    /// so the next (larger) child can still match it.
    fn find_slot(&self, cursor: &mut usize, name: &str) -> Option<&FieldSlot> {
        while *cursor < self.slots.len() {
            let slot = &self.slots[*cursor];
            match slot.name.cmp(name) {
                Ordering::Greater => return None,
                Ordering::Equal => return Some(slot),
                Ordering::Less => *cursor += 1,
            }
        }
        None
    }
}

impl Patcher for RecordPatcher {
    fn patch_from(
        &self,
        cx: &mut PatchContext,
        value: Option<&dyn Reflect>,
        name: Cow<'static, str>,
    ) -> Option<ObjectNode> {
        let Some(value) = value else {
            return Some(ComplexNode::null(name).into());
        };
        let mut children = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let field = slot.accessor.get(value);
            if let Some(child) =
                slot.patcher
                    .patch_from(cx, field.as_deref(), Cow::Borrowed(slot.name))
            {
                children.push(child);
            }
        }
        Some(ComplexNode::record(name, children).into())
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
        if node.is_list() {
            return;
        }
        if node.is_null() {
            *slot = None;
            return;
        }
        if slot.is_none() {
            *slot = Some((self.instantiate)());
        }
        let Some(value) = slot.as_deref_mut() else {
            return;
        };

        let mut cursor = 0usize;
        for child in node.children() {
            if let Some(field) = self.find_slot(&mut cursor, child.name()) {
                let mut tmp = field.accessor.get(value);
                field.patcher.patch_to(cx, &mut tmp, child);
                field.accessor.set(value, tmp);
            }
        }
    }
}
