//! Structured values crossing the sandbox boundary.

use serde::{Deserialize, Serialize};

/// A structurally-cloneable value produced by executed code.
///
/// This is the tagged union carried by `console_log` payloads: primitives,
/// ordered sequences, keyed mappings, and two marshaling placeholders for
/// data that has no structural representation on the host side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Ordered sequence (a Lua table with keys `1..=n`).
    Seq(Vec<Value>),
    /// Keyed mapping. Pair order is the order previews display.
    Map(Vec<(String, Value)>),
    /// A value with no structural representation (function, thread,
    /// userdata). Carries the type name.
    Opaque(String),
    /// A table reached through itself during marshaling.
    Circular,
}

impl Value {
    /// Convenience constructor for string values.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// True for sequences and mappings - values with an expandable tree.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Seq(_) | Self::Map(_))
    }

    /// Number of direct children: sequence elements or mapping pairs.
    #[must_use]
    pub fn child_count(&self) -> usize {
        match self {
            Self::Seq(items) => items.len(),
            Self::Map(pairs) => pairs.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_string(&Value::Int(7)).unwrap();
        assert_eq!(json, r#"{"kind":"int","value":7}"#);

        let json = serde_json::to_string(&Value::Nil).unwrap();
        assert_eq!(json, r#"{"kind":"nil"}"#);
    }

    #[test]
    fn test_map_round_trip() {
        let value = Value::Map(vec![
            ("a".to_string(), Value::Int(1)),
            ("b".to_string(), Value::Seq(vec![Value::Bool(true), Value::Nil])),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_composite_classification() {
        assert!(Value::Seq(vec![]).is_composite());
        assert!(Value::Map(vec![]).is_composite());
        assert!(!Value::str("x").is_composite());
        assert!(!Value::Circular.is_composite());
    }

    #[test]
    fn test_child_count() {
        let seq = Value::Seq(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(seq.child_count(), 2);
        assert_eq!(Value::Float(1.5).child_count(), 0);
    }
}
