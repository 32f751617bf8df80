use core::any::TypeId;

use super::{ListShape, Reflect};

/// Get/set one named slot on a live value.
///
/// The slot protocol normalizes nullability: `get` returns `None` for an
/// absent value (a `None` optional field), and `set` receives `None` when a
/// patch nulls the slot out. A non-nullable slot ignores `set(None)`.
pub trait ValueAccessor: Send + Sync {
    /// Whether `owner` is the type this accessor reads from.
    fn matches_owner(&self, owner: &dyn Reflect) -> bool;

    /// Whether `value` could be stored through this accessor.
    fn matches_value(&self, value: &dyn Reflect) -> bool;

    /// Clones the slot value out of `owner`.
    fn get(&self, owner: &dyn Reflect) -> Option<Box<dyn Reflect>>;

    /// Writes a value back. Type mismatches are ignored rather than
    /// reported, matching the skew tolerance of patching at large.
    fn set(&self, owner: &mut dyn Reflect, value: Option<Box<dyn Reflect>>);
}

/// Accessor for one record field, built from monomorphized function
/// pointers by [`reflect_record!`](crate::reflect_record).
pub struct FieldAccessor {
    owner: TypeId,
    value: TypeId,
    get: fn(&dyn Reflect) -> Option<Box<dyn Reflect>>,
    set: fn(&mut dyn Reflect, Option<Box<dyn Reflect>>),
}

impl FieldAccessor {
    pub fn for_field<O: Reflect, V: Reflect>(
        get: fn(&dyn Reflect) -> Option<Box<dyn Reflect>>,
        set: fn(&mut dyn Reflect, Option<Box<dyn Reflect>>),
    ) -> Self {
        FieldAccessor {
            owner: TypeId::of::<O>(),
            value: TypeId::of::<V>(),
            get,
            set,
        }
    }
}

impl ValueAccessor for FieldAccessor {
    fn matches_owner(&self, owner: &dyn Reflect) -> bool {
        owner.concrete_type_id() == self.owner
    }

    fn matches_value(&self, value: &dyn Reflect) -> bool {
        value.concrete_type_id() == self.value
    }

    fn get(&self, owner: &dyn Reflect) -> Option<Box<dyn Reflect>> {
        (self.get)(owner)
    }

    fn set(&self, owner: &mut dyn Reflect, value: Option<Box<dyn Reflect>>) {
        (self.set)(owner, value);
    }
}

/// Accessor for one list position, so element patching runs through the
/// same get/patch/set path as record fields.
pub struct ElementAccessor {
    shape: ListShape,
    index: usize,
}

impl ElementAccessor {
    pub fn new(shape: ListShape, index: usize) -> Self {
        ElementAccessor { shape, index }
    }
}

impl ValueAccessor for ElementAccessor {
    fn matches_owner(&self, owner: &dyn Reflect) -> bool {
        (self.shape.len)(owner).is_some()
    }

    fn matches_value(&self, value: &dyn Reflect) -> bool {
        value.concrete_type_id() == self.shape.element
    }

    fn get(&self, owner: &dyn Reflect) -> Option<Box<dyn Reflect>> {
        (self.shape.get)(owner, self.index)
    }

    // Elements are not nullable; `set(None)` is a no-op and out-of-range
    // writes are dropped by the shape.
    fn set(&self, owner: &mut dyn Reflect, value: Option<Box<dyn Reflect>>) {
        if let Some(value) = value {
            (self.shape.set)(owner, self.index, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::Describe;
    use crate::reflect::TypeShape;

    fn vec_shape() -> ListShape {
        match <Vec<i32>>::descriptor().shape() {
            TypeShape::List(shape) => *shape,
            _ => unreachable!(),
        }
    }

    #[test]
    fn element_accessor_reads_and_writes() {
        let shape = vec_shape();
        let mut list: Box<dyn Reflect> = Box::new(vec![10i32, 20, 30]);

        let second = ElementAccessor::new(shape, 1);
        assert!(second.matches_owner(&*list));
        assert_eq!(second.get(&*list).and_then(|v| v.take::<i32>()), Some(20));

        second.set(&mut *list, Some(Box::new(25i32)));
        assert_eq!(list.downcast_ref::<Vec<i32>>(), Some(&vec![10, 25, 30]));
    }

    #[test]
    fn element_accessor_ignores_out_of_range_and_none() {
        let shape = vec_shape();
        let mut list: Box<dyn Reflect> = Box::new(vec![1i32]);

        ElementAccessor::new(shape, 5).set(&mut *list, Some(Box::new(9i32)));
        ElementAccessor::new(shape, 0).set(&mut *list, None);
        assert_eq!(list.downcast_ref::<Vec<i32>>(), Some(&vec![1]));
        assert!(ElementAccessor::new(shape, 5).get(&*list).is_none());
    }

    #[test]
    fn element_accessor_rejects_foreign_owner() {
        let shape = vec_shape();
        let other: Box<dyn Reflect> = Box::new(3i32);
        let first = ElementAccessor::new(shape, 0);
        assert!(!first.matches_owner(&*other));
        assert!(first.get(&*other).is_none());
    }
}
