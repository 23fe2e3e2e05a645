//! Expandable tree view of structured values.

use luapad_core::Value;
use serde::Serialize;

use crate::preview;

/// One node of the expansion tree. Leaves have no children.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    /// Key under the parent: sequence index (1-based, as typed in the
    /// source language) or mapping key. Absent at the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Single-line text for this node.
    pub text: String,
    /// Child nodes, in display order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

/// Expand a value into its full nested tree.
///
/// The tree is fully materialized here; collapsing to depth 0 is the
/// display layer's concern.
#[must_use]
pub fn expand(value: &Value) -> TreeNode {
    node(None, value)
}

fn node(key: Option<String>, value: &Value) -> TreeNode {
    match value {
        Value::Seq(items) => TreeNode {
            key,
            text: preview::summary(value),
            children: items
                .iter()
                .enumerate()
                .map(|(i, v)| node(Some((i + 1).to_string()), v))
                .collect(),
        },
        Value::Map(pairs) => TreeNode {
            key,
            text: preview::summary(value),
            children: pairs
                .iter()
                .map(|(k, v)| node(Some(k.clone()), v))
                .collect(),
        },
        leaf => TreeNode {
            key,
            text: preview::encode(leaf),
            children: Vec::new(),
        },
    }
}
