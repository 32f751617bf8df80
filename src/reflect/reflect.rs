use core::any::{Any, TypeId};

/// Type-erased value surface.
///
/// Everything the engine moves through a patch operation (record fields,
/// list elements, whole roots) travels as `Box<dyn Reflect>`. The trait is
/// little more than [`Any`] plus cloning: accessors hand out clones of
/// slot values, patchers mutate the clone, and the accessor writes it back.
///
/// Implementations come from [`reflect_record!`](crate::reflect_record) for
/// user records and from the built-in impls for `i32`, `u32`, `String`,
/// `Vec<T>` and [`ObjRef`](super::ObjRef).
///
/// # Example
///
/// ```
/// use objpatch::reflect::Reflect;
///
/// let value: Box<dyn Reflect> = Box::new(42i32);
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
/// let cloned = value.clone_boxed();
/// assert_eq!(cloned.take::<i32>(), Some(42));
/// ```
pub trait Reflect: Any {
    /// Short diagnostic name of the concrete type.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Clones the value behind the erasure.
    fn clone_boxed(&self) -> Box<dyn Reflect>;
}

impl dyn Reflect {
    /// Returns `true` if the erased value is a `T`.
    pub fn is<T: Reflect>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// The [`TypeId`] of the concrete value.
    pub fn concrete_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Moves the concrete value out of the box, or discards the box if the
    /// type does not match.
    pub fn take<T: Reflect>(self: Box<Self>) -> Option<T> {
        self.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }
}

impl core::fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Reflect({})", self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_ref_and_mut() {
        let mut value: Box<dyn Reflect> = Box::new(String::from("lantern"));
        assert!(value.is::<String>());
        assert!(!value.is::<i32>());
        *value.downcast_mut::<String>().unwrap() = String::from("wick");
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("wick"));
    }

    #[test]
    fn take_moves_out_on_match() {
        let value: Box<dyn Reflect> = Box::new(7u32);
        assert_eq!(value.take::<u32>(), Some(7));

        let value: Box<dyn Reflect> = Box::new(7u32);
        assert_eq!(value.take::<i32>(), None);
    }

    #[test]
    fn clone_boxed_is_deep() {
        let value: Box<dyn Reflect> = Box::new(vec![1i32, 2, 3]);
        let cloned = value.clone_boxed();
        assert_eq!(cloned.take::<Vec<i32>>(), Some(vec![1, 2, 3]));
    }
}
