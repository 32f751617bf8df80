use std::borrow::Cow;

use crate::node::{NodeType, Primitive};

// -----------------------------------------------------------------------------
// PrimitiveNode

/// A leaf node holding one named primitive value.
///
/// The only representable "present but null" primitive is a string:
/// [`PrimitiveNode::null_string`] builds a node whose value is `None`.
/// Non-nullable kinds (`Int`, `UInt`) express absence by being omitted from
/// their parent instead.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveNode {
    ty: NodeType,
    name: Cow<'static, str>,
    value: Option<Primitive>,
}

impl PrimitiveNode {
    /// Creates a leaf from a value; the node kind is taken from the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use objpatch::node::{NodeType, PrimitiveNode};
    ///
    /// let node = PrimitiveNode::new("count", 3_u32);
    /// assert_eq!(node.name(), "count");
    /// assert_eq!(node.node_type(), NodeType::UInt);
    /// assert!(!node.is_null());
    /// ```
    pub fn new(name: impl Into<Cow<'static, str>>, value: impl Into<Primitive>) -> Self {
        let value = value.into();
        Self {
            ty: value.node_type(),
            name: name.into(),
            value: Some(value),
        }
    }

    /// Creates a string leaf that is present but null.
    pub fn null_string(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            ty: NodeType::String,
            name: name.into(),
            value: None,
        }
    }

    /// The node kind. Never [`NodeType::Complex`].
    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.ty
    }

    /// The slot name this leaf belongs to.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value, or `None` for a null string.
    #[inline]
    pub fn value(&self) -> Option<&Primitive> {
        self.value.as_ref()
    }

    /// Whether the value is a null string.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
}

// -----------------------------------------------------------------------------
// ComplexNode

/// An interior node: a record, a list, or a present-or-null subtree marker.
///
/// Children are always kept sorted by name using ordinal (byte-wise)
/// comparison; construction sorts, callers cannot rely on their own
/// ordering being preserved. For list nodes the child names are the decimal
/// element indices, and [`list_count`](Self::list_count) stays authoritative
/// even when some indices are omitted (sparse patches skip unchanged
/// elements).
///
/// `is_null` means the whole subtree does not exist on the live side; a null
/// node never has children.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexNode {
    name: Cow<'static, str>,
    is_list: bool,
    list_count: u32,
    is_null: bool,
    children: Vec<ObjectNode>,
}

impl ComplexNode {
    /// Creates a record node. Children are sorted by name; on duplicate
    /// names the first occurrence wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use objpatch::node::{ComplexNode, ObjectNode, PrimitiveNode};
    ///
    /// let node = ComplexNode::record("stats", vec![
    ///     ObjectNode::from(PrimitiveNode::new("z", 1)),
    ///     ObjectNode::from(PrimitiveNode::new("a", 2)),
    /// ]);
    /// let names: Vec<_> = node.children().iter().map(|c| c.name()).collect();
    /// assert_eq!(names, ["a", "z"]);
    /// ```
    pub fn record(name: impl Into<Cow<'static, str>>, children: Vec<ObjectNode>) -> Self {
        let mut children = children;
        children.sort_by(|a, b| a.name().cmp(b.name()));
        children.dedup_by(|b, a| a.name() == b.name());
        Self {
            name: name.into(),
            is_list: false,
            list_count: 0,
            is_null: false,
            children,
        }
    }

    /// Creates a list node with its authoritative element count. Children
    /// are named by decimal index and sorted by name.
    pub fn list(
        name: impl Into<Cow<'static, str>>,
        list_count: u32,
        children: Vec<ObjectNode>,
    ) -> Self {
        let mut children = children;
        children.sort_by(|a, b| a.name().cmp(b.name()));
        Self {
            name: name.into(),
            is_list: true,
            list_count,
            is_null: false,
            children,
        }
    }

    /// Creates a null record node: the live subtree does not exist.
    pub fn null(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            is_list: false,
            list_count: 0,
            is_null: true,
            children: Vec::new(),
        }
    }

    /// Creates a null list node.
    pub fn null_list(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            is_list: true,
            list_count: 0,
            is_null: true,
            children: Vec::new(),
        }
    }

    /// The slot name this subtree belongs to.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the children are positional list elements.
    #[inline]
    pub fn is_list(&self) -> bool {
        self.is_list
    }

    /// The live element count of a list node. Authoritative even when some
    /// indices are missing from [`children`](Self::children).
    #[inline]
    pub fn list_count(&self) -> u32 {
        self.list_count
    }

    /// Whether the live subtree is null. A null node has no children.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// The name-sorted children.
    #[inline]
    pub fn children(&self) -> &[ObjectNode] {
        &self.children
    }

    /// Consumes the node, yielding its children for rebuilding.
    pub fn into_children(self) -> Vec<ObjectNode> {
        self.children
    }

    /// Looks up a direct child by name.
    pub fn find_child(&self, name: &str) -> Option<&ObjectNode> {
        self.children
            .binary_search_by(|c| c.name().cmp(name))
            .ok()
            .map(|i| &self.children[i])
    }
}

// -----------------------------------------------------------------------------
// ObjectNode

/// One value or subtree of a mirrored graph. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectNode {
    Primitive(PrimitiveNode),
    Complex(ComplexNode),
}

impl ObjectNode {
    /// The node kind.
    #[inline]
    pub fn node_type(&self) -> NodeType {
        match self {
            ObjectNode::Primitive(p) => p.node_type(),
            ObjectNode::Complex(_) => NodeType::Complex,
        }
    }

    /// The slot name this node belongs to.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            ObjectNode::Primitive(p) => p.name(),
            ObjectNode::Complex(c) => c.name(),
        }
    }

    /// The primitive value, if this is a non-null leaf.
    #[inline]
    pub fn value(&self) -> Option<&Primitive> {
        match self {
            ObjectNode::Primitive(p) => p.value(),
            ObjectNode::Complex(_) => None,
        }
    }

    /// Whether this node marks a null value or subtree.
    #[inline]
    pub fn is_null(&self) -> bool {
        match self {
            ObjectNode::Primitive(p) => p.is_null(),
            ObjectNode::Complex(c) => c.is_null(),
        }
    }

    /// The children of a complex node; empty for leaves.
    #[inline]
    pub fn children(&self) -> &[ObjectNode] {
        match self {
            ObjectNode::Primitive(_) => &[],
            ObjectNode::Complex(c) => c.children(),
        }
    }

    /// This node as a complex node, if it is one.
    #[inline]
    pub fn as_complex(&self) -> Option<&ComplexNode> {
        match self {
            ObjectNode::Complex(c) => Some(c),
            ObjectNode::Primitive(_) => None,
        }
    }

    /// Extracts the subtree reachable by following named children along a
    /// `/`-delimited path, producing a new root that contains only that
    /// single chain.
    ///
    /// Intermediate flags (`is_list`, `list_count`, `is_null`) are kept, so
    /// a chain through a list node still applies as a sparse list patch.
    /// Returns `None` when called on a leaf; a missing path segment yields a
    /// chain that simply stops early (the resulting patch touches nothing
    /// below the last matched node).
    ///
    /// # Examples
    ///
    /// ```
    /// use objpatch::node::{ComplexNode, ObjectNode, PrimitiveNode};
    ///
    /// let root = ObjectNode::from(ComplexNode::record("root", vec![
    ///     ObjectNode::from(ComplexNode::record("a", vec![
    ///         ObjectNode::from(PrimitiveNode::new("c", 7)),
    ///         ObjectNode::from(PrimitiveNode::new("d", 9)),
    ///     ])),
    /// ]));
    ///
    /// let patch = root.create_patch("a/c").unwrap();
    /// let a = patch.children()[0].as_complex().unwrap();
    /// assert_eq!(a.children().len(), 1);
    /// assert_eq!(a.children()[0].name(), "c");
    /// ```
    pub fn create_patch(&self, path: &str) -> Option<ObjectNode> {
        let ObjectNode::Complex(node) = self else {
            return None;
        };

        let (target, trail) = match path.split_once('/') {
            Some((head, tail)) => (head, tail),
            None => (path, ""),
        };

        let mut kept = Vec::new();
        if let Some(child) = node.find_child(target) {
            if trail.is_empty() {
                kept.push(child.clone());
            } else if let Some(sub) = child.create_patch(trail) {
                kept.push(sub);
            }
        }

        Some(ObjectNode::Complex(ComplexNode {
            name: node.name.clone(),
            is_list: node.is_list,
            list_count: node.list_count,
            is_null: node.is_null,
            children: kept,
        }))
    }
}

impl From<PrimitiveNode> for ObjectNode {
    #[inline]
    fn from(node: PrimitiveNode) -> Self {
        ObjectNode::Primitive(node)
    }
}

impl From<ComplexNode> for ObjectNode {
    #[inline]
    fn from(node: ComplexNode) -> Self {
        ObjectNode::Complex(node)
    }
}

#[cfg(test)]
mod tests {
    use super::{ComplexNode, ObjectNode, PrimitiveNode};
    use crate::node::NodeType;

    fn leaf(name: &'static str, v: i32) -> ObjectNode {
        ObjectNode::from(PrimitiveNode::new(name, v))
    }

    #[test]
    fn record_children_are_sorted_and_unique() {
        let node = ComplexNode::record(
            "r",
            vec![leaf("b", 1), leaf("a", 2), leaf("b", 3), leaf("B", 4)],
        );
        let names: Vec<_> = node.children().iter().map(|c| c.name()).collect();
        // Ordinal comparison sorts uppercase before lowercase; the first
        // occurrence of a duplicate name wins.
        assert_eq!(names, ["B", "a", "b"]);
        assert_eq!(node.find_child("b").unwrap().value().unwrap().as_int(), Some(1));
    }

    #[test]
    fn null_node_has_no_children_and_overrides() {
        let node = ComplexNode::null("gone");
        assert!(node.is_null());
        assert!(node.children().is_empty());
        assert!(!node.is_list());

        let list = ComplexNode::null_list("gone");
        assert!(list.is_null() && list.is_list());
        assert_eq!(list.list_count(), 0);
    }

    #[test]
    fn null_string_leaf() {
        let node = PrimitiveNode::null_string("s");
        assert!(node.is_null());
        assert_eq!(node.node_type(), NodeType::String);
        assert_eq!(node.value(), None);
    }

    #[test]
    fn find_child_uses_ordinal_order() {
        let node = ComplexNode::list(
            "l",
            12,
            (0..12).map(|i| ObjectNode::from(PrimitiveNode::new(i.to_string(), i))).collect(),
        );
        // "10" sorts between "1" and "2"; lookup still lands.
        assert_eq!(node.find_child("10").unwrap().value().unwrap().as_int(), Some(10));
        assert!(node.find_child("12").is_none());
    }

    #[test]
    fn create_patch_keeps_single_chain() {
        let root = ObjectNode::from(ComplexNode::record(
            "root",
            vec![
                ObjectNode::from(ComplexNode::record(
                    "a",
                    vec![
                        ObjectNode::from(ComplexNode::record(
                            "b",
                            vec![leaf("c", 7), leaf("d", 9)],
                        )),
                        leaf("e", 1),
                    ],
                )),
                leaf("f", 2),
            ],
        ));

        let patch = root.create_patch("a/b/c").unwrap();
        assert_eq!(patch.children().len(), 1);
        let a = patch.children()[0].as_complex().unwrap();
        assert_eq!(a.children().len(), 1);
        let b = a.children()[0].as_complex().unwrap();
        assert_eq!(b.children().len(), 1);
        assert_eq!(b.children()[0].name(), "c");
        assert_eq!(b.children()[0].value().unwrap().as_int(), Some(7));
    }

    #[test]
    fn create_patch_missing_segment_stops_early() {
        let root = ObjectNode::from(ComplexNode::record("root", vec![leaf("a", 1)]));
        let patch = root.create_patch("missing/x").unwrap();
        assert!(patch.children().is_empty());
        // Leaves cannot be patched into.
        assert!(root.children()[0].create_patch("x").is_none());
    }

    #[test]
    fn create_patch_through_list_keeps_count() {
        let root = ObjectNode::from(ComplexNode::record(
            "root",
            vec![ObjectNode::from(ComplexNode::list(
                "items",
                4,
                vec![
                    ObjectNode::from(ComplexNode::record("1", vec![leaf("hp", 5)])),
                    ObjectNode::from(ComplexNode::record("3", vec![leaf("hp", 8)])),
                ],
            ))],
        ));

        let patch = root.create_patch("items/3").unwrap();
        let items = patch.children()[0].as_complex().unwrap();
        assert!(items.is_list());
        assert_eq!(items.list_count(), 4);
        assert_eq!(items.children().len(), 1);
        assert_eq!(items.children()[0].name(), "3");
    }
}
