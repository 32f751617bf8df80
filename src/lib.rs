#![doc = include_str!("../README.md")]

mod hash;
mod serializer;

pub mod node;
pub mod patch;
pub mod reflect;
pub mod registry;
pub mod wire;

pub use serializer::{SerializeError, Serializer};

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
}
