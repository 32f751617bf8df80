use std::borrow::Cow;

use super::{PatchContext, Patcher};
use crate::node::{NodeType, ObjectNode, Primitive, PrimitiveNode};
use crate::reflect::Reflect;

/// Patcher for one primitive kind.
///
/// A null slot produces a node only for the string kind, strings being the
/// only nullable primitive; null int and uint slots vanish from the
/// snapshot. Applying a node whose kind disagrees with this patcher's is a
/// no-op.
pub struct PrimitivePatcher {
    kind: NodeType,
}

impl PrimitivePatcher {
    pub fn new(kind: NodeType) -> Self {
        PrimitivePatcher { kind }
    }
}

impl Patcher for PrimitivePatcher {
    fn patch_from(
        &self,
        _cx: &mut PatchContext,
        value: Option<&dyn Reflect>,
        name: Cow<'static, str>,
    ) -> Option<ObjectNode> {
        let Some(value) = value else {
            return match self.kind {
                NodeType::String => Some(PrimitiveNode::null_string(name).into()),
                _ => None,
            };
        };
        let primitive = match self.kind {
            NodeType::Int => Primitive::Int(*value.downcast_ref::<i32>()?),
            NodeType::UInt => Primitive::UInt(*value.downcast_ref::<u32>()?),
            NodeType::String => Primitive::String(value.downcast_ref::<String>()?.clone()),
            NodeType::Complex => return None,
        };
        Some(PrimitiveNode::new(name, primitive).into())
    }

    fn patch_to(
        &self,
        _cx: &mut PatchContext,
        slot: &mut Option<Box<dyn Reflect>>,
        node: &ObjectNode,
    ) {
        let ObjectNode::Primitive(node) = node else {
            return;
        };
        if node.node_type() != self.kind {
            return;
        }
        match node.value() {
            None => {
                // Only strings can carry null.
                if self.kind == NodeType::String {
                    *slot = None;
                }
            }
            Some(Primitive::Int(v)) => *slot = Some(Box::new(*v)),
            Some(Primitive::UInt(v)) => *slot = Some(Box::new(*v)),
            Some(Primitive::String(v)) => *slot = Some(Box::new(v.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cx() -> PatchContext {
        PatchContext::new()
    }

    #[test]
    fn int_round_trip() {
        let patcher = PrimitivePatcher::new(NodeType::Int);
        let node = patcher
            .patch_from(&mut cx(), Some(&41i32), Cow::Borrowed("count"))
            .unwrap();
        assert_eq!(node.name(), "count");

        let mut slot: Option<Box<dyn Reflect>> = Some(Box::new(0i32));
        patcher.patch_to(&mut cx(), &mut slot, &node);
        assert_eq!(slot.unwrap().take::<i32>(), Some(41));
    }

    #[test]
    fn null_int_slot_contributes_nothing() {
        let patcher = PrimitivePatcher::new(NodeType::Int);
        assert!(patcher.patch_from(&mut cx(), None, Cow::Borrowed("count")).is_none());
    }

    #[test]
    fn null_string_slot_round_trips() {
        let patcher = PrimitivePatcher::new(NodeType::String);
        let node = patcher
            .patch_from(&mut cx(), None, Cow::Borrowed("label"))
            .unwrap();
        assert!(node.is_null());

        let mut slot: Option<Box<dyn Reflect>> = Some(Box::new(String::from("old")));
        patcher.patch_to(&mut cx(), &mut slot, &node);
        assert!(slot.is_none());
    }

    #[test]
    fn kind_mismatch_is_skipped() {
        let int_patcher = PrimitivePatcher::new(NodeType::Int);
        let node = PrimitivePatcher::new(NodeType::UInt)
            .patch_from(&mut cx(), Some(&9u32), Cow::Borrowed("n"))
            .unwrap();

        let mut slot: Option<Box<dyn Reflect>> = Some(Box::new(3i32));
        int_patcher.patch_to(&mut cx(), &mut slot, &node);
        assert_eq!(slot.unwrap().take::<i32>(), Some(3));
    }

    #[test]
    fn wrong_value_type_is_dropped() {
        let patcher = PrimitivePatcher::new(NodeType::Int);
        assert!(patcher
            .patch_from(&mut cx(), Some(&String::from("x")), Cow::Borrowed("n"))
            .is_none());
    }
}
