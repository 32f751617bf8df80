use core::any::TypeId;

use crate::hash::HashMap;
use crate::reflect::{Describe, Reflect, TypeDescriptor, TypeShape};

/// Registry of [`TypeDescriptor`]s, keyed by [`TypeId`] and by name.
///
/// Registration is recursive: registering a record pulls in its field
/// types, registering a list pulls in its element type. The descriptor is
/// inserted before its dependencies are visited, so mutually dependent
/// types terminate.
///
/// Two distinct types registered under the same name make that name
/// ambiguous; lookup and instantiation by name then refuse it, while
/// lookup by [`TypeId`] keeps working for both.
///
/// # Example
///
/// ```
/// use objpatch::registry::SchemaRegistry;
/// use objpatch::reflect_record;
///
/// #[derive(Clone, Default)]
/// struct Pair {
///     items: Vec<i32>,
/// }
///
/// reflect_record! {
///     Pair {
///         items: Vec<i32>,
///     }
/// }
///
/// let mut schema = SchemaRegistry::new();
/// schema.register::<Pair>();
/// assert!(schema.get_by_name("Pair").is_some());
/// assert!(schema.contains::<Vec<i32>>());
/// ```
pub struct SchemaRegistry {
    by_id: HashMap<TypeId, TypeDescriptor>,
    by_name: HashMap<&'static str, TypeId>,
    ambiguous: Vec<&'static str>,
}

impl SchemaRegistry {
    /// A registry preloaded with the built-in primitive and handle types.
    pub fn new() -> Self {
        let mut schema = Self::empty();
        schema.register::<i32>();
        schema.register::<u32>();
        schema.register::<String>();
        schema.register::<crate::reflect::ObjRef>();
        schema
    }

    pub fn empty() -> Self {
        SchemaRegistry {
            by_id: HashMap::default(),
            by_name: HashMap::default(),
            ambiguous: Vec::new(),
        }
    }

    /// A preloaded registry that also runs every registration submitted by
    /// [`reflect_record!`](crate::reflect_record) across the process.
    #[cfg(feature = "auto_register")]
    pub fn auto_registered() -> Self {
        let mut schema = Self::new();
        for registration in inventory::iter::<SchemaRegistration> {
            (registration.register)(&mut schema);
        }
        schema
    }

    /// Registers `T` and, if it was not present yet, its dependencies.
    pub fn register<T: Describe>(&mut self) {
        if self.insert(T::descriptor()) {
            T::register_dependencies(self);
        }
    }

    fn insert(&mut self, descriptor: TypeDescriptor) -> bool {
        if self.by_id.contains_key(&descriptor.id()) {
            return false;
        }
        let name = descriptor.name();
        match self.by_name.get(name) {
            Some(_) if !self.ambiguous.contains(&name) => {
                self.by_name.remove(name);
                self.ambiguous.push(name);
            }
            _ => {
                if !self.ambiguous.contains(&name) {
                    self.by_name.insert(name, descriptor.id());
                }
            }
        }
        self.by_id.insert(descriptor.id(), descriptor);
        true
    }

    pub fn contains<T: Reflect>(&self) -> bool {
        self.by_id.contains_key(&TypeId::of::<T>())
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.by_id.get(&id)
    }

    pub fn get_for<T: Reflect>(&self) -> Option<&TypeDescriptor> {
        self.get(TypeId::of::<T>())
    }

    /// By-name lookup; `None` for unknown or ambiguous names.
    pub fn get_by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        self.by_name.get(name).and_then(|id| self.by_id.get(id))
    }

    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous.iter().any(|n| *n == name)
    }

    /// Builds a fresh default instance of the record type registered under
    /// `name`.
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Reflect>> {
        match self.get_by_name(name)?.shape() {
            TypeShape::Record(shape) => Some(shape.instantiate()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// One deferred registration collected by the `auto_register` feature.
#[cfg(feature = "auto_register")]
pub struct SchemaRegistration {
    register: fn(&mut SchemaRegistry),
}

#[cfg(feature = "auto_register")]
impl SchemaRegistration {
    pub const fn new(register: fn(&mut SchemaRegistry)) -> Self {
        SchemaRegistration { register }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(SchemaRegistration);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_preloads_builtins() {
        let schema = SchemaRegistry::new();
        assert!(schema.contains::<i32>());
        assert!(schema.contains::<u32>());
        assert!(schema.contains::<String>());
        assert!(schema.contains::<crate::reflect::ObjRef>());
        assert!(schema.get_by_name("i32").is_some());
    }

    #[test]
    fn register_pulls_in_list_elements() {
        let mut schema = SchemaRegistry::empty();
        schema.register::<Vec<Vec<u32>>>();
        assert!(schema.contains::<Vec<Vec<u32>>>());
        assert!(schema.contains::<Vec<u32>>());
        assert!(schema.contains::<u32>());
    }

    #[test]
    fn duplicate_registration_is_idempotent() {
        let mut schema = SchemaRegistry::empty();
        schema.register::<i32>();
        schema.register::<i32>();
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn instantiate_refuses_non_records() {
        let schema = SchemaRegistry::new();
        assert!(schema.instantiate("i32").is_none());
        assert!(schema.instantiate("nope").is_none());
    }
}
