//! YAML layer
//! - document.rs: ordered document tree with byte spans (tree-sitter based)
//! - edit.rs: non-overlapping text edits applied over the original source
//! - scalar.rs: scalar type resolution and style-aware rendering

pub mod document;
pub mod edit;
pub mod scalar;

pub use document::{
    CollectionStyle, Document, Entry, Mapping, Node, Scalar, Sequence, SequenceItem, YamlError,
};
pub use edit::{Editor, TextEdit};
pub use scalar::{ScalarStyle, ScalarType};
