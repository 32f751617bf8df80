//! The bridge between live values and the engine.
//!
//! Rust has no runtime reflection, so live types participate through
//! ahead-of-time registered capabilities instead:
//!
//! - [`Reflect`] is the type-erased value surface (an [`Any`]-based
//!   erasure with cloning, so slot values can be taken, patched, and
//!   written back).
//! - [`Describe`] supplies a [`TypeDescriptor`] telling the engine what a
//!   type is: a primitive, a list, a record with named fields, or a
//!   shared [`ObjRef`] handle.
//! - [`ValueAccessor`] is "get/set one named slot on a live value":
//!   [`FieldAccessor`] for record fields, [`ElementAccessor`] for list
//!   positions, so both go through the same patching code path.
//! - [`reflect_record!`](crate::reflect_record) builds all of the above for
//!   a plain struct from a field table.
//!
//! [`Any`]: core::any::Any

mod accessor;
mod descriptor;
mod impls;
mod macros;
mod obj_ref;
mod reflect;

pub use accessor::{ElementAccessor, FieldAccessor, ValueAccessor};
pub use descriptor::{Describe, FieldDescriptor, ListShape, RecordShape, TypeDescriptor, TypeShape};
pub use obj_ref::ObjRef;
pub use reflect::Reflect;
