//! Patchers: the two-way bridge between live values and node trees.
//!
//! A [`Patcher`] handles exactly one concrete type. `patch_from` snapshots
//! a value into an [`ObjectNode`](crate::node::ObjectNode); `patch_to`
//! merges a node back into a live slot, touching only what the node names.
//! Both directions tolerate skew: a node that no longer matches the live
//! shape is skipped, never an error.
//!
//! Per-operation state (currently the reference identity table) travels in
//! a [`PatchContext`] threaded through every call.

mod context;
mod list;
mod patcher;
mod primitive;
mod record;
mod reference;

pub use context::{PatchContext, RefTable};
pub use list::ListPatcher;
pub use patcher::Patcher;
pub use primitive::PrimitivePatcher;
pub use record::RecordPatcher;
pub use reference::RefPatcher;
