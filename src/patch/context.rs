use core::any::{Any, TypeId};

use crate::hash::HashMap;
use crate::reflect::ObjRef;

/// Per-operation state shared by every patcher in one serialize or
/// deserialize pass.
///
/// A fresh context is created per operation and offered to every factory
/// via [`PatcherRegistry::prepare_context`](crate::registry::PatcherRegistry::prepare_context);
/// factories install whatever state their patchers need, keyed by type.
///
/// # Example
///
/// ```
/// use objpatch::patch::{PatchContext, RefTable};
///
/// let mut cx = PatchContext::new();
/// cx.install(RefTable::new());
/// assert!(cx.get_mut::<RefTable>().is_some());
/// ```
pub struct PatchContext {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl PatchContext {
    pub fn new() -> Self {
        PatchContext {
            values: HashMap::default(),
        }
    }

    /// Installs a state value.
    ///
    /// # Panics
    ///
    /// Panics if a value of the same type is already installed; a context
    /// is single-use and each factory owns its slot.
    pub fn install<T: Any>(&mut self, value: T) {
        let previous = self.values.insert(TypeId::of::<T>(), Box::new(value));
        assert!(
            previous.is_none(),
            "patch context state installed twice: {}",
            core::any::type_name::<T>(),
        );
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut::<T>())
    }
}

impl Default for PatchContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference identity table for one patch operation.
///
/// Serializing assigns each distinct live object a positive id in first
/// encounter order, starting at 1. Deserializing records objects under the
/// ids the wire gave them. Registered handles are pinned for the lifetime
/// of the table so an allocation address is never reused mid-operation.
pub struct RefTable {
    by_addr: HashMap<usize, i32>,
    by_id: HashMap<i32, ObjRef>,
    pinned: Vec<ObjRef>,
    next_id: i32,
}

impl RefTable {
    pub fn new() -> Self {
        RefTable {
            by_addr: HashMap::default(),
            by_id: HashMap::default(),
            pinned: Vec::new(),
            next_id: 1,
        }
    }

    /// Id previously assigned to this object, if any.
    pub fn find_id(&self, obj: &ObjRef) -> Option<i32> {
        self.by_addr.get(&obj.address()?).copied()
    }

    /// Assigns the next id to a not-yet-seen object.
    pub fn register(&mut self, obj: &ObjRef) -> Option<i32> {
        let addr = obj.address()?;
        let id = self.next_id;
        self.next_id += 1;
        self.by_addr.insert(addr, id);
        self.pinned.push(obj.clone());
        Some(id)
    }

    /// Records an object under a wire-supplied id.
    pub fn register_id(&mut self, id: i32, obj: &ObjRef) {
        self.by_id.insert(id, obj.clone());
        self.pinned.push(obj.clone());
    }

    pub fn find_object(&self, id: i32) -> Option<&ObjRef> {
        self.by_id.get(&id)
    }
}

impl Default for RefTable {
    fn default() -> Self {
        Self::new()
    }
}
