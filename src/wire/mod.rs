//! Flat wire form and pluggable byte formats.
//!
//! A node tree crosses the wire as a flat list of [`ComplexEntry`]s, one
//! per complex node, addressed by `/`-joined paths from the synthetic
//! [`ROOT_NAME`] root. Primitive children ride inline in their owning
//! entry. [`flatten`] and [`unflatten`] convert between the two shapes;
//! a [`Formatter`] turns the flat form into bytes, with [`JsonFormatter`]
//! as the stock implementation.

mod entry;
mod flatten;
mod format;

pub use entry::{ComplexEntry, IntEntry, RootEntry, StringEntry, UIntEntry};
pub use flatten::{flatten, unflatten, ROOT_NAME};
pub use format::{FormatError, Formatter, JsonFormatter};
