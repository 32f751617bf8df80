use std::borrow::Cow;

use super::PatchContext;
use crate::node::ObjectNode;
use crate::reflect::Reflect;

/// Converts between live values of one concrete type and node trees.
///
/// Values move through a nullable slot: `patch_from` reads `Option<&dyn
/// Reflect>` (`None` is a null slot), `patch_to` merges into `Option<Box<dyn
/// Reflect>>` in place. Accessors clone the slot out of its owner, the
/// patcher works on the clone, and the accessor writes it back.
///
/// `patch_from` returning `None` means the slot contributes no node at all,
/// which is how unsupported values fall out of a snapshot silently.
pub trait Patcher: Send + Sync {
    fn patch_from(
        &self,
        cx: &mut PatchContext,
        value: Option<&dyn Reflect>,
        name: Cow<'static, str>,
    ) -> Option<ObjectNode>;

    fn patch_to(&self, cx: &mut PatchContext, slot: &mut Option<Box<dyn Reflect>>, node: &ObjectNode);
}
