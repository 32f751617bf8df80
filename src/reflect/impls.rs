//! Built-in [`Reflect`] and [`Describe`] implementations.

use core::any::{Any, TypeId};

use super::{Describe, ListShape, ObjRef, Reflect, TypeDescriptor, TypeShape};
use crate::registry::SchemaRegistry;

macro_rules! impl_reflect_leaf {
    ($ty:ty, $name:literal, $shape:expr) => {
        impl Reflect for $ty {
            fn type_name(&self) -> &'static str {
                $name
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

            fn clone_boxed(&self) -> Box<dyn Reflect> {
                Box::new(self.clone())
            }
        }

        impl Describe for $ty {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::of::<$ty>($name, $shape)
            }
        }
    };
}

impl_reflect_leaf!(i32, "i32", TypeShape::Int);
impl_reflect_leaf!(u32, "u32", TypeShape::UInt);
impl_reflect_leaf!(String, "String", TypeShape::Str);

// Placeholder left inside an ObjRef cell while its object is detached for
// patching. Never registered, never serialized.
impl Reflect for () {
    fn type_name(&self) -> &'static str {
        "()"
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

    fn clone_boxed(&self) -> Box<dyn Reflect> {
        Box::new(())
    }
}

impl<T> Reflect for Vec<T>
where
    T: Reflect + Describe + Clone + Default,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }
}

fn list_make<T>() -> Box<dyn Reflect>
where
    T: Reflect + Describe + Clone + Default,
{
    Box::new(Vec::<T>::new())
}

fn list_len<T>(list: &dyn Reflect) -> Option<usize>
where
    T: Reflect + Describe + Clone + Default,
{
    list.downcast_ref::<Vec<T>>().map(Vec::len)
}

fn list_get<T>(list: &dyn Reflect, index: usize) -> Option<Box<dyn Reflect>>
where
    T: Reflect + Describe + Clone + Default,
{
    let element = list.downcast_ref::<Vec<T>>()?.get(index)?;
    Some(element.clone_boxed())
}

fn list_set<T>(list: &mut dyn Reflect, index: usize, value: Box<dyn Reflect>)
where
    T: Reflect + Describe + Clone + Default,
{
    if let Some(list) = list.downcast_mut::<Vec<T>>() {
        if index < list.len() {
            if let Some(value) = value.take::<T>() {
                list[index] = value;
            }
        }
    }
}

fn list_resize<T>(list: &mut dyn Reflect, len: usize)
where
    T: Reflect + Describe + Clone + Default,
{
    if let Some(list) = list.downcast_mut::<Vec<T>>() {
        list.resize_with(len, T::default);
    }
}

impl<T> Describe for Vec<T>
where
    T: Reflect + Describe + Clone + Default,
{
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Vec<T>>(
            core::any::type_name::<Vec<T>>(),
            TypeShape::List(ListShape {
                element: TypeId::of::<T>(),
                element_name: core::any::type_name::<T>(),
                make: list_make::<T>,
                len: list_len::<T>,
                get: list_get::<T>,
                set: list_set::<T>,
                resize: list_resize::<T>,
            }),
        )
    }

    fn register_dependencies(schema: &mut SchemaRegistry) {
        schema.register::<T>();
    }
}

impl Describe for ObjRef {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<ObjRef>("ObjRef", TypeShape::Handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_descriptors() {
        assert!(matches!(i32::descriptor().shape(), TypeShape::Int));
        assert!(matches!(u32::descriptor().shape(), TypeShape::UInt));
        assert!(matches!(String::descriptor().shape(), TypeShape::Str));
        assert!(matches!(ObjRef::descriptor().shape(), TypeShape::Handle));
        assert_eq!(i32::descriptor().id(), TypeId::of::<i32>());
    }

    #[test]
    fn list_shape_resizes_with_defaults() {
        let shape = match <Vec<String>>::descriptor().shape() {
            TypeShape::List(shape) => *shape,
            _ => unreachable!(),
        };
        assert_eq!(shape.element, TypeId::of::<String>());

        let mut list: Box<dyn Reflect> = (shape.make)();
        (shape.resize)(&mut *list, 2);
        (shape.set)(&mut *list, 0, Box::new(String::from("a")));
        assert_eq!(
            list.downcast_ref::<Vec<String>>(),
            Some(&vec![String::from("a"), String::new()])
        );

        (shape.resize)(&mut *list, 1);
        assert_eq!((shape.len)(&*list), Some(1));
    }
}
