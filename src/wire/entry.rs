use serde::{Deserialize, Serialize};

/// The whole wire payload: every complex node of one tree, flattened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootEntry {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<ComplexEntry>,
}

/// One complex node, addressed by its `/`-joined path in `n`.
///
/// Primitive children ride inline in the typed vectors; complex children
/// are separate entries with longer paths. Field names are deliberately
/// terse, they dominate payload size. Defaulted fields are omitted when
/// encoding and tolerated when absent while decoding, which is what lets
/// wire payloads stay sparse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexEntry {
    pub n: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nil: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub list: bool,
    /// Signed on the wire; a negative count decodes as a null list.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub listc: i64,
    #[serde(default, rename = "i32", skip_serializing_if = "Vec::is_empty")]
    pub ints: Vec<IntEntry>,
    #[serde(default, rename = "u32", skip_serializing_if = "Vec::is_empty")]
    pub uints: Vec<UIntEntry>,
    #[serde(default, rename = "s", skip_serializing_if = "Vec::is_empty")]
    pub strings: Vec<StringEntry>,
}

impl ComplexEntry {
    pub(crate) fn at(path: String) -> Self {
        ComplexEntry {
            n: path,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntEntry {
    pub n: String,
    pub v: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UIntEntry {
    pub n: String,
    pub v: u32,
}

/// A string child; `v: None` is a present-but-null string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringEntry {
    pub n: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaulted_fields_are_omitted() {
        let entry = ComplexEntry::at(String::from("r/x"));
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"n":"r/x"}"#);
    }

    #[test]
    fn sparse_input_fills_defaults() {
        let entry: ComplexEntry =
            serde_json::from_str(r#"{"n":"r","list":true,"listc":3}"#).unwrap();
        assert!(entry.list);
        assert_eq!(entry.listc, 3);
        assert!(!entry.nil);
        assert!(entry.ints.is_empty());
    }

    #[test]
    fn null_string_survives_json() {
        let entry = StringEntry {
            n: String::from("label"),
            v: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"n":"label"}"#);
        let back: StringEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.v, None);
    }
}
