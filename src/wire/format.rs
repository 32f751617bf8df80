use std::error::Error;
use std::fmt;

use crate::node::ObjectNode;
use crate::wire::{flatten, unflatten, RootEntry};

/// Failure while encoding or decoding a wire payload.
#[derive(Debug)]
pub enum FormatError {
    Encode(Box<dyn Error + Send + Sync>),
    Decode(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Encode(e) => write!(f, "failed to encode payload: {e}"),
            FormatError::Decode(e) => write!(f, "failed to decode payload: {e}"),
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FormatError::Encode(e) | FormatError::Decode(e) => Some(e.as_ref()),
        }
    }
}

/// Byte format for the flattened wire form.
///
/// Formatters are interchangeable: the engine hands every implementation
/// the same [`RootEntry`]-shaped data via serde, so payloads written by one
/// format can be re-encoded by another without touching the tree.
pub trait Formatter: Send + Sync {
    /// Encodes a tree; `None` (an empty snapshot) encodes as an empty
    /// payload.
    fn serialize(&self, node: Option<&ObjectNode>) -> Result<Vec<u8>, FormatError>;

    /// Decodes a payload; an empty payload decodes to `None`.
    fn deserialize(&self, bytes: &[u8]) -> Result<Option<ObjectNode>, FormatError>;
}

/// The stock JSON format.
///
/// # Example
///
/// ```
/// use objpatch::node::{ComplexNode, ObjectNode, PrimitiveNode};
/// use objpatch::wire::{Formatter, JsonFormatter, ROOT_NAME};
///
/// let tree = ObjectNode::from(ComplexNode::record(ROOT_NAME, vec![
///     ObjectNode::from(PrimitiveNode::new("hp", 7)),
/// ]));
/// let bytes = JsonFormatter.serialize(Some(&tree)).unwrap();
/// let back = JsonFormatter.deserialize(&bytes).unwrap();
/// assert_eq!(back, Some(tree));
/// ```
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn serialize(&self, node: Option<&ObjectNode>) -> Result<Vec<u8>, FormatError> {
        let root = node.map(flatten).unwrap_or_default();
        serde_json::to_vec(&root).map_err(|e| FormatError::Encode(Box::new(e)))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Option<ObjectNode>, FormatError> {
        let root: RootEntry =
            serde_json::from_slice(bytes).map_err(|e| FormatError::Decode(Box::new(e)))?;
        Ok(unflatten(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ComplexNode, ObjectNode, PrimitiveNode};
    use crate::wire::ROOT_NAME;

    #[test]
    fn empty_snapshot_round_trips() {
        let bytes = JsonFormatter.serialize(None).unwrap();
        assert_eq!(JsonFormatter.deserialize(&bytes).unwrap(), None);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = JsonFormatter.deserialize(b"{not json").unwrap_err();
        assert!(matches!(err, FormatError::Decode(_)));
        assert!(err.to_string().contains("decode"));
    }

    #[test]
    fn payload_is_flat_json() {
        let tree: ObjectNode = ComplexNode::record(
            ROOT_NAME,
            vec![PrimitiveNode::new("hp", 7).into()],
        )
        .into();
        let bytes = JsonFormatter.serialize(Some(&tree)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, r#"{"entries":[{"n":":Root:","i32":[{"n":"hp","v":7}]}]}"#);
    }
}
