//! Rendering of logged playground values.
//!
//! Provides:
//! - `render` - Per-value display form (class + single-line preview)
//! - `encode` - Total JSON-style encoding with placeholders
//! - `expand` - Full nested tree view of structured values

pub mod preview;
pub mod tree;

pub use preview::{CIRCULAR, UNSERIALIZABLE, ValueClass, ValueView, encode, render};
pub use tree::{TreeNode, expand};
