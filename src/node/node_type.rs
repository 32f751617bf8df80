use core::fmt;

// -----------------------------------------------------------------------------
// NodeType

/// The closed set of node kinds.
///
/// `Complex` covers records, lists, and polymorphic references alike;
/// list-ness and null-ness are separate fields on [`ComplexNode`], not
/// separate kinds.
///
/// [`ComplexNode`]: crate::node::ComplexNode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Int,
    UInt,
    String,
    Complex,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Int => "Int",
            NodeType::UInt => "UInt",
            NodeType::String => "String",
            NodeType::Complex => "Complex",
        };
        f.write_str(name)
    }
}

// -----------------------------------------------------------------------------
// Primitive

/// A primitive leaf value.
///
/// # Examples
///
/// ```
/// use objpatch::node::{NodeType, Primitive};
///
/// let value = Primitive::Int(-3);
/// assert_eq!(value.node_type(), NodeType::Int);
/// assert_eq!(value.as_int(), Some(-3));
/// assert_eq!(value.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int(i32),
    UInt(u32),
    String(String),
}

impl Primitive {
    /// Returns the [`NodeType`] this value belongs to.
    #[inline]
    pub fn node_type(&self) -> NodeType {
        match self {
            Primitive::Int(_) => NodeType::Int,
            Primitive::UInt(_) => NodeType::UInt,
            Primitive::String(_) => NodeType::String,
        }
    }

    /// Returns the contained `i32`, if this is an `Int`.
    #[inline]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Primitive::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the contained `u32`, if this is a `UInt`.
    #[inline]
    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Primitive::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the contained string, if this is a `String`.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i32> for Primitive {
    #[inline]
    fn from(v: i32) -> Self {
        Primitive::Int(v)
    }
}

impl From<u32> for Primitive {
    #[inline]
    fn from(v: u32) -> Self {
        Primitive::UInt(v)
    }
}

impl From<String> for Primitive {
    #[inline]
    fn from(v: String) -> Self {
        Primitive::String(v)
    }
}

impl From<&str> for Primitive {
    #[inline]
    fn from(v: &str) -> Self {
        Primitive::String(v.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeType, Primitive};

    #[test]
    fn node_type_of_values() {
        assert_eq!(Primitive::from(1_i32).node_type(), NodeType::Int);
        assert_eq!(Primitive::from(1_u32).node_type(), NodeType::UInt);
        assert_eq!(Primitive::from("a").node_type(), NodeType::String);
    }

    #[test]
    fn typed_accessors_reject_other_kinds() {
        let v = Primitive::UInt(7);
        assert_eq!(v.as_uint(), Some(7));
        assert_eq!(v.as_int(), None);
        assert_eq!(v.as_str(), None);
    }
}
