use crate::hash::HashMap;
use crate::node::{ComplexNode, ObjectNode, Primitive, PrimitiveNode};
use crate::wire::{ComplexEntry, IntEntry, RootEntry, StringEntry, UIntEntry};

/// Path of the synthetic root entry. The root node's own name is replaced
/// by this sentinel on the wire, so payloads are addressed identically no
/// matter what the snapshot called its root.
pub const ROOT_NAME: &str = ":Root:";

/// Flattens a tree into wire entries, one per complex node, in pre-order.
///
/// Primitive children are inlined into their owner's entry; a primitive
/// root has no owner and flattens to an empty payload.
pub fn flatten(node: &ObjectNode) -> RootEntry {
    let mut entries = Vec::new();
    walk(&mut entries, None, node);
    RootEntry { entries }
}

fn walk(entries: &mut Vec<ComplexEntry>, parent_path: Option<&str>, node: &ObjectNode) {
    let ObjectNode::Complex(complex) = node else {
        return;
    };
    let path = match parent_path {
        None => ROOT_NAME.to_string(),
        Some(parent) => format!("{parent}/{}", complex.name()),
    };

    let index = entries.len();
    let mut entry = ComplexEntry::at(path);
    entry.nil = complex.is_null();
    entry.list = complex.is_list();
    entry.listc = i64::from(complex.list_count());
    entries.push(entry);

    for child in complex.children() {
        match child {
            ObjectNode::Primitive(leaf) => push_primitive(&mut entries[index], leaf),
            ObjectNode::Complex(_) => {
                let parent = entries[index].n.clone();
                walk(entries, Some(&parent), child);
            }
        }
    }
}

fn push_primitive(entry: &mut ComplexEntry, leaf: &PrimitiveNode) {
    let n = leaf.name().to_string();
    match leaf.value() {
        Some(Primitive::Int(v)) => entry.ints.push(IntEntry { n, v: *v }),
        Some(Primitive::UInt(v)) => entry.uints.push(UIntEntry { n, v: *v }),
        Some(Primitive::String(v)) => entry.strings.push(StringEntry {
            n,
            v: Some(v.clone()),
        }),
        None => entry.strings.push(StringEntry { n, v: None }),
    }
}

/// Rebuilds a tree from wire entries: `None` for an empty payload.
///
/// Entry order on the wire does not matter; paths are regrouped segment by
/// segment and node constructors re-sort children, so
/// `unflatten(flatten(t))` reproduces `t` exactly for any tree rooted at
/// [`ROOT_NAME`]. Duplicate paths keep their first occurrence, and a list
/// entry with a negative `listc` degrades to a null list.
pub fn unflatten(root: RootEntry) -> Option<ObjectNode> {
    let mut entries: Vec<(Vec<String>, ComplexEntry)> = root
        .entries
        .into_iter()
        .map(|e| (e.n.split('/').map(str::to_string).collect(), e))
        .collect();
    entries.sort_by(|(_, a), (_, b)| a.n.cmp(&b.n));
    entries.dedup_by(|(_, b), (_, a)| a.n == b.n);
    group(entries, 0).into_iter().next()
}

fn group(entries: Vec<(Vec<String>, ComplexEntry)>, depth: usize) -> Vec<ObjectNode> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<(Vec<String>, ComplexEntry)>> = HashMap::default();
    for item in entries {
        let Some(segment) = item.0.get(depth) else {
            continue;
        };
        if !buckets.contains_key(segment) {
            order.push(segment.clone());
        }
        buckets.entry(segment.clone()).or_default().push(item);
    }

    let mut nodes = Vec::with_capacity(order.len());
    for segment in order {
        let bucket = buckets.remove(&segment).unwrap_or_default();
        let here = depth + 1;
        let current = bucket.iter().position(|(path, _)| path.len() == here);

        let mut children = Vec::new();
        if let Some(i) = current {
            let entry = &bucket[i].1;
            for e in &entry.ints {
                children.push(PrimitiveNode::new(e.n.clone(), e.v).into());
            }
            for e in &entry.uints {
                children.push(PrimitiveNode::new(e.n.clone(), e.v).into());
            }
            for e in &entry.strings {
                children.push(match &e.v {
                    Some(v) => PrimitiveNode::new(e.n.clone(), v.clone()).into(),
                    None => PrimitiveNode::null_string(e.n.clone()).into(),
                });
            }
        }

        let deeper: Vec<_> = bucket
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != current)
            .map(|(_, item)| item.clone())
            .collect();
        children.extend(group(deeper, here));

        let node = match current.map(|i| &bucket[i].1) {
            Some(entry) if entry.list => {
                if entry.listc < 0 || entry.nil {
                    ComplexNode::null_list(segment)
                } else {
                    ComplexNode::list(segment, entry.listc as u32, children)
                }
            }
            Some(entry) if entry.nil => ComplexNode::null(segment),
            _ => ComplexNode::record(segment, children),
        };
        nodes.push(node.into());
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    fn leaf(name: &'static str, v: i32) -> ObjectNode {
        PrimitiveNode::new(name, v).into()
    }

    fn sample() -> ObjectNode {
        ComplexNode::record(
            ROOT_NAME,
            vec![
                leaf("hp", 12),
                PrimitiveNode::new("tag", "elite").into(),
                PrimitiveNode::null_string("nick").into(),
                ComplexNode::list(
                    "items",
                    3,
                    vec![
                        ComplexNode::record("0", vec![leaf("id", 1)]).into(),
                        ComplexNode::record("1", vec![leaf("id", 2)]).into(),
                        ComplexNode::null("2").into(),
                    ],
                )
                .into(),
                ComplexNode::null("owner").into(),
            ],
        )
        .into()
    }

    #[test]
    fn flatten_is_one_entry_per_complex_node() {
        let root = flatten(&sample());
        let paths: Vec<_> = root.entries.iter().map(|e| e.n.as_str()).collect();
        assert_eq!(
            paths,
            [
                ":Root:",
                ":Root:/items",
                ":Root:/items/0",
                ":Root:/items/1",
                ":Root:/items/2",
                ":Root:/owner",
            ]
        );

        let top = &root.entries[0];
        assert_eq!(top.ints.len(), 1);
        assert_eq!(top.strings.len(), 2);
        assert!(top.strings.iter().any(|s| s.n == "nick" && s.v.is_none()));

        let items = &root.entries[1];
        assert!(items.list);
        assert_eq!(items.listc, 3);
        assert!(root.entries[5].nil);
    }

    #[test]
    fn unflatten_reverses_flatten() {
        let tree = sample();
        let back = unflatten(flatten(&tree)).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn entry_order_does_not_matter() {
        let tree = sample();
        let mut root = flatten(&tree);
        root.entries.reverse();
        assert_eq!(unflatten(root).unwrap(), tree);
    }

    #[test]
    fn deep_nesting_round_trips() {
        let mut node: ObjectNode = ComplexNode::record("d12", vec![leaf("v", 12)]).into();
        for depth in (0..12).rev() {
            let name = if depth == 0 {
                ROOT_NAME.to_string()
            } else {
                format!("d{depth}")
            };
            node = ComplexNode::record(name, vec![node, leaf("v", depth)]).into();
        }
        let back = unflatten(flatten(&node)).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn empty_payload_and_primitive_root() {
        assert_eq!(unflatten(RootEntry::default()), None);
        let root = flatten(&leaf("x", 1));
        assert!(root.entries.is_empty());
    }

    #[test]
    fn negative_listc_degrades_to_null_list() {
        let root = RootEntry {
            entries: vec![
                {
                    let mut e = ComplexEntry::at(ROOT_NAME.to_string());
                    e.list = true;
                    e.listc = -1;
                    e
                },
                ComplexEntry::at(format!("{ROOT_NAME}/0")),
            ],
        };
        let node = unflatten(root).unwrap();
        let complex = node.as_complex().unwrap();
        assert!(complex.is_list() && complex.is_null());
        assert!(complex.children().is_empty());
        assert_eq!(node.node_type(), NodeType::Complex);
    }

    #[test]
    fn missing_interior_entry_becomes_plain_record() {
        // Only the grandchild arrived; the intermediate node is implied.
        let root = RootEntry {
            entries: vec![{
                let mut e = ComplexEntry::at(format!("{ROOT_NAME}/a/b"));
                e.ints.push(IntEntry {
                    n: String::from("v"),
                    v: 5,
                });
                e
            }],
        };
        let node = unflatten(root).unwrap();
        let a = node.as_complex().unwrap().find_child("a").unwrap();
        let b = a.as_complex().unwrap().find_child("b").unwrap();
        assert_eq!(b.children()[0].value().unwrap().as_int(), Some(5));
    }
}
