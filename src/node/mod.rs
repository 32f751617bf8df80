//! The engine-independent tree representation of a value graph.
//!
//! A graph is mirrored into a tree of [`ObjectNode`]s: leaves are
//! [`PrimitiveNode`]s carrying an [`i32`], [`u32`], or [`String`] value,
//! everything else (records, lists, and polymorphic references) is a
//! [`ComplexNode`]. Nodes are pure data: they commit to no live type and
//! carry no behavior beyond accessors and sub-path extraction.

mod node_type;
mod object_node;

pub use node_type::{NodeType, Primitive};
pub use object_node::{ComplexNode, ObjectNode, PrimitiveNode};
