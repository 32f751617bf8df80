//! Type and patcher registries.
//!
//! [`SchemaRegistry`] holds the [`TypeDescriptor`](crate::reflect::TypeDescriptor)s
//! of every participating type and can instantiate record types by their
//! wire name. [`PatcherRegistry`] turns descriptors into cached
//! [`Patcher`](crate::patch::Patcher)s by walking an ordered chain of
//! [`PatcherFactory`]s, first match wins.

mod factory;
mod patcher_registry;
mod schema;

pub use factory::{CoreFactory, PatcherFactory, RefFactory};
pub use patcher_registry::{FieldFilter, PatcherRegistry, TypeFilter};
pub use schema::SchemaRegistry;
#[cfg(feature = "auto_register")]
pub use schema::SchemaRegistration;
