//! Per-value rendering: classes, previews, JSON-style encoding.

use luapad_core::Value;
use serde::Serialize;

use crate::tree::{self, TreeNode};

/// Elements shown before a sequence summary truncates.
const SEQ_PREVIEW_ITEMS: usize = 5;
/// Pairs shown before a mapping summary truncates.
const MAP_PREVIEW_PAIRS: usize = 3;
/// Nesting depth at which encoded previews collapse.
const ENCODE_DEPTH: usize = 3;

/// Placeholder for values that cannot be JSON-encoded.
pub const UNSERIALIZABLE: &str = "<unserializable value>";
/// Placeholder for a cycle hit during marshaling.
pub const CIRCULAR: &str = "<circular reference>";

/// Rendering class of a value, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueClass {
    String,
    Number,
    Boolean,
    Nil,
    Composite,
    Opaque,
}

/// Display form of one logged value.
#[derive(Debug, Clone, Serialize)]
pub struct ValueView {
    /// Styling class.
    pub class: ValueClass,
    /// Single-line text: verbatim for strings, a truncated summary for
    /// composites.
    pub preview: String,
    /// Full nested tree for composites; shown collapsed by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<TreeNode>,
}

/// Map one logged value to its display form.
#[must_use]
pub fn render(value: &Value) -> ValueView {
    match value {
        Value::Str(s) => plain(ValueClass::String, s.clone()),
        Value::Int(_) | Value::Float(_) => plain(ValueClass::Number, number_text(value)),
        Value::Bool(b) => plain(ValueClass::Boolean, b.to_string()),
        Value::Nil => plain(ValueClass::Nil, "nil".to_string()),
        Value::Seq(_) | Value::Map(_) => ValueView {
            class: ValueClass::Composite,
            preview: summary(value),
            tree: Some(tree::expand(value)),
        },
        Value::Opaque(name) => plain(ValueClass::Opaque, format!("<{name}>")),
        Value::Circular => plain(ValueClass::Opaque, CIRCULAR.to_string()),
    }
}

/// Truncated single-line summary of a composite value.
#[must_use]
pub fn summary(value: &Value) -> String {
    match value {
        Value::Seq(items) => seq_summary(items),
        Value::Map(pairs) => map_summary(pairs),
        other => encode(other),
    }
}

/// Compact JSON-style encoding used inside summaries.
///
/// Total: values with no JSON form encode as placeholders, and nesting
/// beyond the depth limit collapses instead of recursing forever.
#[must_use]
pub fn encode(value: &Value) -> String {
    encode_at(value, 0)
}

fn plain(class: ValueClass, preview: String) -> ValueView {
    ValueView {
        class,
        preview,
        tree: None,
    }
}

/// `(N) [e0, e1, ...]` - first five elements, ellipsis when more remain.
fn seq_summary(items: &[Value]) -> String {
    let shown: Vec<String> = items
        .iter()
        .take(SEQ_PREVIEW_ITEMS)
        .map(|v| encode_at(v, 1))
        .collect();
    let mut body = shown.join(", ");
    if items.len() > SEQ_PREVIEW_ITEMS {
        body.push_str(", ...");
    }
    format!("({}) [{}]", items.len(), body)
}

/// `(K) {k0: v0, ...}` - first three pairs, ellipsis when more remain.
fn map_summary(pairs: &[(String, Value)]) -> String {
    let shown: Vec<String> = pairs
        .iter()
        .take(MAP_PREVIEW_PAIRS)
        .map(|(k, v)| format!("{k}: {}", encode_at(v, 1)))
        .collect();
    let mut body = shown.join(", ");
    if pairs.len() > MAP_PREVIEW_PAIRS {
        body.push_str(", ...");
    }
    format!("({}) {{{}}}", pairs.len(), body)
}

fn encode_at(value: &Value, depth: usize) -> String {
    match value {
        Value::Nil => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(_) | Value::Float(_) => number_text(value),
        Value::Str(s) => json_string(s),
        Value::Seq(items) => {
            if depth >= ENCODE_DEPTH {
                return "[…]".to_string();
            }
            let body: Vec<String> = items.iter().map(|v| encode_at(v, depth + 1)).collect();
            format!("[{}]", body.join(", "))
        }
        Value::Map(pairs) => {
            if depth >= ENCODE_DEPTH {
                return "{…}".to_string();
            }
            let body: Vec<String> = pairs
                .iter()
                .map(|(k, v)| format!("{k}: {}", encode_at(v, depth + 1)))
                .collect();
            format!("{{{}}}", body.join(", "))
        }
        Value::Opaque(_) => UNSERIALIZABLE.to_string(),
        Value::Circular => CIRCULAR.to_string(),
    }
}

/// Default numeric formatting: integers bare, floats without trailing
/// zeros when whole.
fn number_text(value: &Value) -> String {
    match value {
        Value::Int(i) => i.to_string(),
        Value::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{n:.0}")
            } else {
                format!("{n}")
            }
        }
        _ => String::new(),
    }
}

fn json_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}
