use core::any::TypeId;
use std::sync::Arc;

use super::{Reflect, ValueAccessor};
use crate::registry::SchemaRegistry;

/// Everything the engine knows about one participating type.
#[derive(Clone)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    shape: TypeShape,
}

impl TypeDescriptor {
    pub fn of<T: Reflect>(name: &'static str, shape: TypeShape) -> Self {
        TypeDescriptor {
            id: TypeId::of::<T>(),
            name,
            shape,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Name used as the wire type tag when the type is instantiated by
    /// name during reference patching.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }
}

impl core::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "TypeDescriptor({})", self.name)
    }
}

/// What a type is, as far as patching is concerned.
#[derive(Clone)]
pub enum TypeShape {
    /// `i32`.
    Int,
    /// `u32`.
    UInt,
    /// `String`.
    Str,
    /// A resizable homogeneous sequence.
    List(ListShape),
    /// A struct with named fields.
    Record(RecordShape),
    /// A shared [`ObjRef`](super::ObjRef) handle, tracked by identity.
    Handle,
}

/// Erased operations over one concrete list type.
///
/// Function pointers rather than a trait object so the shape stays `Copy`
/// and can be embedded per element in an
/// [`ElementAccessor`](super::ElementAccessor).
#[derive(Clone, Copy)]
pub struct ListShape {
    /// Element type, resolved against the schema when the list patcher is
    /// built.
    pub element: TypeId,
    pub element_name: &'static str,
    /// Fresh empty list.
    pub make: fn() -> Box<dyn Reflect>,
    /// `None` when the value is not this list type.
    pub len: fn(&dyn Reflect) -> Option<usize>,
    pub get: fn(&dyn Reflect, usize) -> Option<Box<dyn Reflect>>,
    pub set: fn(&mut dyn Reflect, usize, Box<dyn Reflect>),
    /// Grows with default elements or truncates.
    pub resize: fn(&mut dyn Reflect, usize),
}

/// Field table plus instance factory for a record type.
#[derive(Clone)]
pub struct RecordShape {
    fields: Vec<FieldDescriptor>,
    instantiate: fn() -> Box<dyn Reflect>,
}

impl RecordShape {
    /// Fields are kept sorted by name so record patchers can merge-join
    /// against name-sorted node children.
    pub fn new(mut fields: Vec<FieldDescriptor>, instantiate: fn() -> Box<dyn Reflect>) -> Self {
        fields.sort_by(|a, b| a.name().cmp(b.name()));
        RecordShape { fields, instantiate }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn instantiate(&self) -> Box<dyn Reflect> {
        (self.instantiate)()
    }

    pub(crate) fn instantiate_fn(&self) -> fn() -> Box<dyn Reflect> {
        self.instantiate
    }
}

/// One named slot of a record.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    ty: TypeId,
    ty_name: &'static str,
    serialized: bool,
    accessor: Arc<dyn ValueAccessor>,
}

impl FieldDescriptor {
    pub fn new<V: Reflect>(
        name: &'static str,
        serialized: bool,
        accessor: impl ValueAccessor + 'static,
    ) -> Self {
        FieldDescriptor {
            name,
            ty: TypeId::of::<V>(),
            ty_name: core::any::type_name::<V>(),
            serialized,
            accessor: Arc::new(accessor),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared slot type. For an optional field this is the inner type;
    /// nullability is carried by the accessor.
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn ty_name(&self) -> &'static str {
        self.ty_name
    }

    /// `false` for fields marked `skip`. The default field filter drops
    /// them; a replacement filter may choose otherwise.
    pub fn serialized(&self) -> bool {
        self.serialized
    }

    pub fn accessor(&self) -> &Arc<dyn ValueAccessor> {
        &self.accessor
    }
}

impl core::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldDescriptor({}: {})", self.name, self.ty_name)
    }
}

/// Supplies the [`TypeDescriptor`] for a type and enrolls the types it
/// depends on.
///
/// Implemented by the built-ins and by [`reflect_record!`](crate::reflect_record);
/// the schema registry calls [`register_dependencies`](Describe::register_dependencies)
/// after inserting the descriptor, so mutually dependent types terminate.
pub trait Describe: Reflect + Sized {
    fn descriptor() -> TypeDescriptor;

    fn register_dependencies(_schema: &mut SchemaRegistry) {}
}
