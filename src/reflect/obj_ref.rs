use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::Reflect;

/// Shared, inherently nullable handle to a reflected object.
///
/// `ObjRef` is the aliasing point of an object graph: cloning the handle
/// clones the *reference*, not the object, so two fields holding clones of
/// the same `ObjRef` observe each other's mutations. The serializer keys
/// reference identity off the handle's allocation address, which is what
/// lets shared and cyclic structure survive a round trip.
///
/// A reference-typed field is declared as a plain `ObjRef`; the null state
/// lives inside the handle rather than in an `Option` around it.
///
/// # Example
///
/// ```
/// use objpatch::reflect::ObjRef;
///
/// let a = ObjRef::new(5i32);
/// let b = a.clone();
/// b.with_mut(|v: &mut i32| *v = 9);
/// assert_eq!(a.with_ref(|v: &i32| *v), Some(9));
/// assert!(a.ptr_eq(&b));
/// assert!(ObjRef::null().is_null());
/// ```
pub struct ObjRef {
    inner: Option<Rc<RefCell<Box<dyn Reflect>>>>,
}

impl ObjRef {
    /// Wraps a value in a fresh handle.
    pub fn new<T: Reflect>(value: T) -> Self {
        Self::from_boxed(Box::new(value))
    }

    pub fn from_boxed(value: Box<dyn Reflect>) -> Self {
        ObjRef {
            inner: Some(Rc::new(RefCell::new(value))),
        }
    }

    /// The null handle.
    pub const fn null() -> Self {
        ObjRef { inner: None }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Whether two handles point at the same object. Null handles are not
    /// equal to anything, including each other.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Allocation address used as the identity key while a patch operation
    /// holds the handle alive.
    pub(crate) fn address(&self) -> Option<usize> {
        self.inner.as_ref().map(|rc| Rc::as_ptr(rc) as *const () as usize)
    }

    /// Runs `f` against the object if the handle is live and the object is
    /// a `T`.
    pub fn with_ref<T: Reflect, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let cell = self.inner.as_ref()?;
        let guard = cell.try_borrow().ok()?;
        guard.downcast_ref::<T>().map(f)
    }

    pub fn with_mut<T: Reflect, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let cell = self.inner.as_ref()?;
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.downcast_mut::<T>().map(f)
    }

    /// Swaps the object out of the handle, leaving `substitute` behind.
    ///
    /// The reference patcher detaches the object this way before recursing,
    /// so nested patching never contends with an outstanding borrow even
    /// when the graph points back at this handle.
    pub(crate) fn detach(&self, substitute: Box<dyn Reflect>) -> Option<Box<dyn Reflect>> {
        let cell = self.inner.as_ref()?;
        let mut guard = cell.try_borrow_mut().ok()?;
        Some(core::mem::replace(&mut *guard, substitute))
    }

    pub(crate) fn attach(&self, value: Box<dyn Reflect>) {
        if let Some(cell) = self.inner.as_ref() {
            if let Ok(mut guard) = cell.try_borrow_mut() {
                *guard = value;
            }
        }
    }

    /// The concrete [`TypeId`](core::any::TypeId) of the held object.
    pub fn object_type_id(&self) -> Option<core::any::TypeId> {
        let cell = self.inner.as_ref()?;
        let guard = cell.try_borrow().ok()?;
        Some(guard.concrete_type_id())
    }
}

impl Clone for ObjRef {
    fn clone(&self) -> Self {
        ObjRef {
            inner: self.inner.clone(),
        }
    }
}

impl Default for ObjRef {
    fn default() -> Self {
        ObjRef::null()
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            None => f.write_str("ObjRef(null)"),
            Some(rc) => match rc.try_borrow() {
                Ok(guard) => write!(f, "ObjRef({})", guard.type_name()),
                Err(_) => f.write_str("ObjRef(<borrowed>)"),
            },
        }
    }
}

impl Reflect for ObjRef {
    fn type_name(&self) -> &'static str {
        "ObjRef"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    // Cloning the erasure clones the handle, preserving identity.
    fn clone_boxed(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_aliases_the_object() {
        let a = ObjRef::new(vec![1i32]);
        let b = a.clone();
        b.with_mut(|v: &mut Vec<i32>| v.push(2));
        assert_eq!(a.with_ref(|v: &Vec<i32>| v.clone()), Some(vec![1, 2]));
    }

    #[test]
    fn null_handles_share_nothing() {
        let a = ObjRef::null();
        let b = ObjRef::null();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.address(), None);
        assert_eq!(a.with_ref(|v: &i32| *v), None);
    }

    #[test]
    fn addresses_distinguish_handles() {
        let a = ObjRef::new(0i32);
        let b = ObjRef::new(0i32);
        assert_ne!(a.address(), b.address());
        assert_eq!(a.address(), a.clone().address());
    }

    #[test]
    fn erased_clone_keeps_identity() {
        let a = ObjRef::new(1i32);
        let erased: Box<dyn Reflect> = a.clone_boxed();
        let b = erased.take::<ObjRef>().unwrap();
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn detach_and_attach_round_trip() {
        let a = ObjRef::new(10i32);
        let taken = a.detach(Box::new(())).unwrap();
        assert_eq!(a.with_ref(|v: &i32| *v), None);
        a.attach(taken);
        assert_eq!(a.with_ref(|v: &i32| *v), Some(10));
    }
}
