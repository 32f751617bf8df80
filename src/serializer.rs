use std::fmt;
use std::sync::Arc;

use crate::node::ObjectNode;
use crate::patch::{PatchContext, Patcher};
use crate::reflect::{Describe, Reflect};
use crate::registry::{PatcherRegistry, SchemaRegistry};
use crate::wire::{FormatError, Formatter, JsonFormatter, ROOT_NAME};

/// Errors surfaced by the [`Serializer`] facade.
#[derive(Debug)]
pub enum SerializeError {
    /// The requested root type is not registered, or no factory claims it.
    UnsupportedRoot { type_name: &'static str },
    /// The decoded payload did not produce a value of the requested type.
    RootTypeMismatch { type_name: &'static str },
    Format(FormatError),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::UnsupportedRoot { type_name } => {
                write!(f, "no patcher available for root type `{type_name}`")
            }
            SerializeError::RootTypeMismatch { type_name } => {
                write!(f, "payload did not produce a `{type_name}`")
            }
            SerializeError::Format(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for SerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializeError::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FormatError> for SerializeError {
    fn from(e: FormatError) -> Self {
        SerializeError::Format(e)
    }
}

/// Facade binding a root type's patcher to a byte format.
///
/// Construction resolves the root patcher once; each serialize or
/// deserialize call then runs with a fresh [`PatchContext`] prepared by the
/// registry's factories, so operations never share identity state.
///
/// # Example
///
/// ```
/// use objpatch::{reflect_record, Serializer};
///
/// #[derive(Clone, Default, PartialEq, Debug)]
/// struct Item {
///     name: String,
///     count: i32,
/// }
///
/// reflect_record! {
///     Item {
///         name: String,
///         count: i32,
///     }
/// }
///
/// let serializer = Serializer::for_type::<Item>().unwrap();
/// let item = Item { name: "torch".into(), count: 3 };
/// let bytes = serializer.serialize(&item).unwrap();
/// let back: Item = serializer.deserialize(&bytes).unwrap();
/// assert_eq!(back, item);
/// ```
pub struct Serializer {
    registry: Arc<PatcherRegistry>,
    patcher: Arc<dyn Patcher>,
    formatter: Box<dyn Formatter>,
}

impl core::fmt::Debug for Serializer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Serializer").finish_non_exhaustive()
    }
}

impl Serializer {
    /// A serializer for roots of type `T`, over a default registry.
    ///
    /// With the `auto_register` feature the schema starts from every type
    /// enrolled by [`reflect_record!`](crate::reflect_record) across the
    /// process, which is what lets by-name instantiation find concrete
    /// types behind [`ObjRef`](crate::reflect::ObjRef) fields.
    pub fn for_type<T: Describe>() -> Result<Self, SerializeError> {
        #[cfg(feature = "auto_register")]
        let mut schema = SchemaRegistry::auto_registered();
        #[cfg(not(feature = "auto_register"))]
        let mut schema = SchemaRegistry::new();
        schema.register::<T>();
        Self::with_registry::<T>(PatcherRegistry::new(Arc::new(schema)))
    }

    /// A serializer for roots of type `T` over an existing registry, for
    /// callers bringing their own factories or filters.
    pub fn with_registry<T: Describe>(
        registry: Arc<PatcherRegistry>,
    ) -> Result<Self, SerializeError> {
        let patcher = registry
            .patcher_for::<T>()
            .ok_or(SerializeError::UnsupportedRoot {
                type_name: core::any::type_name::<T>(),
            })?;
        Ok(Serializer {
            registry,
            patcher,
            formatter: Box::new(JsonFormatter),
        })
    }

    /// Swaps the byte format.
    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    fn context(&self) -> PatchContext {
        let mut cx = PatchContext::new();
        self.registry.prepare_context(&mut cx);
        cx
    }

    /// Snapshots a value into a node tree rooted at [`ROOT_NAME`].
    pub fn to_node(&self, value: &dyn Reflect) -> Option<ObjectNode> {
        let mut cx = self.context();
        self.patcher
            .patch_from(&mut cx, Some(value), ROOT_NAME.into())
    }

    /// Merges a node tree into an existing value, touching only the slots
    /// the tree names.
    pub fn apply_node<T: Reflect + Clone>(&self, target: &mut T, node: &ObjectNode) {
        let mut cx = self.context();
        let mut slot: Option<Box<dyn Reflect>> = Some(Box::new(target.clone()));
        self.patcher.patch_to(&mut cx, &mut slot, node);
        if let Some(patched) = slot.and_then(|v| v.take::<T>()) {
            *target = patched;
        }
    }

    /// Encodes a node tree with the bound format.
    pub fn encode(&self, node: &ObjectNode) -> Result<Vec<u8>, SerializeError> {
        Ok(self.formatter.serialize(Some(node))?)
    }

    /// Decodes a payload into a node tree.
    pub fn decode(&self, bytes: &[u8]) -> Result<Option<ObjectNode>, SerializeError> {
        Ok(self.formatter.deserialize(bytes)?)
    }

    /// Snapshots and encodes in one step.
    pub fn serialize(&self, value: &dyn Reflect) -> Result<Vec<u8>, SerializeError> {
        let node = self.to_node(value);
        Ok(self.formatter.serialize(node.as_ref())?)
    }

    /// Decodes and rebuilds a fresh `T`. An empty payload yields the
    /// default value.
    pub fn deserialize<T: Describe + Default>(&self, bytes: &[u8]) -> Result<T, SerializeError> {
        let Some(node) = self.decode(bytes)? else {
            return Ok(T::default());
        };
        let mut cx = self.context();
        let mut slot: Option<Box<dyn Reflect>> = Some(Box::new(T::default()));
        self.patcher.patch_to(&mut cx, &mut slot, &node);
        match slot {
            None => Ok(T::default()),
            Some(value) => value.take::<T>().ok_or(SerializeError::RootTypeMismatch {
                type_name: core::any::type_name::<T>(),
            }),
        }
    }

    /// Decodes and merges into an existing value.
    pub fn apply<T: Reflect + Clone>(
        &self,
        target: &mut T,
        bytes: &[u8],
    ) -> Result<(), SerializeError> {
        if let Some(node) = self.decode(bytes)? {
            self.apply_node(target, &node);
        }
        Ok(())
    }

    pub fn registry(&self) -> &Arc<PatcherRegistry> {
        &self.registry
    }
}
