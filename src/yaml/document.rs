//! Ordered YAML document tree built from the tree-sitter concrete syntax tree
//!
//! Every node keeps the byte span it occupies in the source so that callers
//! can rewrite a single value without re-emitting the rest of the document.
//!
//! ```text
//! stream
//!   document
//!     block_node
//!       block_mapping                  -> Node::Mapping
//!         block_mapping_pair           -> Entry { key, value }
//!           flow_node -> plain_scalar  -> Node::Scalar
//!           block_node
//!             block_sequence           -> Node::Sequence
//!               block_sequence_item    -> SequenceItem
//! ```

use std::ops::Range;

use tracing::warn;

use crate::yaml::scalar::{self, ScalarStyle, ScalarType};

/// Error type for building a document tree
#[derive(Debug, thiserror::Error)]
pub enum YamlError {
    /// The YAML grammar could not be loaded
    #[error("Tree-sitter error: {0}")]
    Language(String),

    /// tree-sitter produced no tree at all
    #[error("Failed to parse YAML")]
    ParseFailed,

    /// The source is not syntactically valid YAML
    #[error("invalid YAML syntax at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
}

/// Whether a collection is written in block or flow (`[...]`, `{...}`) form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStyle {
    Block,
    Flow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    /// Decoded value (quotes removed, escapes resolved)
    pub value: String,
    pub style: ScalarStyle,
    pub span: Range<usize>,
    pub column: usize,
}

impl Scalar {
    pub fn resolved_type(&self) -> ScalarType {
        scalar::resolve(&self.value, self.style)
    }

    /// Whether the value contains a `{{`/`${{` expression
    pub fn is_template(&self) -> bool {
        self.value.contains("{{")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceItem {
    /// For block sequences this starts at the `-` indicator
    pub span: Range<usize>,
    pub column: usize,
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub items: Vec<SequenceItem>,
    pub style: CollectionStyle,
    pub span: Range<usize>,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: Node,
    pub value: Option<Node>,
    pub span: Range<usize>,
    pub column: usize,
}

impl Entry {
    /// The key as a scalar string, if it is one
    pub fn key_str(&self) -> Option<&str> {
        self.key.as_scalar().map(|s| s.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    pub entries: Vec<Entry>,
    pub style: CollectionStyle,
    pub span: Range<usize>,
    pub column: usize,
}

impl Mapping {
    /// First entry whose key is exactly `key`
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key_str() == Some(key))
    }

    /// Column new entries should be indented to
    pub fn key_column(&self) -> usize {
        self.entries
            .first()
            .map(|e| e.column)
            .unwrap_or(self.column)
    }
}

/// A node of the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Sequence),
    Mapping(Mapping),
    Alias(Range<usize>),
}

impl Node {
    pub fn span(&self) -> Range<usize> {
        match self {
            Node::Scalar(s) => s.span.clone(),
            Node::Sequence(s) => s.span.clone(),
            Node::Mapping(m) => m.span.clone(),
            Node::Alias(span) => span.clone(),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Short human readable kind, used in schema errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(s) => match s.resolved_type() {
                ScalarType::Str => "string",
                ScalarType::Int => "integer",
                ScalarType::Float => "float",
                ScalarType::Bool => "boolean",
                ScalarType::Null => "null",
            },
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
            Node::Alias(_) => "alias",
        }
    }
}

/// A parsed YAML document. Only the first document of a stream is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Option<Node>,
}

impl Document {
    pub fn parse(source: &str) -> Result<Self, YamlError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_yaml::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set YAML language for tree-sitter: {}", e);
            YamlError::Language(e.to_string())
        })?;

        let tree = parser.parse(source, None).ok_or_else(|| {
            warn!("Failed to parse YAML content");
            YamlError::ParseFailed
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let at = first_error(root).unwrap_or(root).start_position();
            return Err(YamlError::Syntax {
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        let document = named_children(root)
            .into_iter()
            .find(|child| child.kind() == "document");
        let root = document.and_then(|doc| convert(doc, source));

        Ok(Self { root })
    }

    /// The root node when it is a mapping
    pub fn root_mapping(&self) -> Option<&Mapping> {
        self.root.as_ref().and_then(Node::as_mapping)
    }
}

fn first_error(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

/// Named children that carry content (comments, tags and anchors dropped)
fn named_children(node: tree_sitter::Node) -> Vec<tree_sitter::Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !matches!(child.kind(), "comment" | "tag" | "anchor"))
        .collect()
}

fn convert(node: tree_sitter::Node, source: &str) -> Option<Node> {
    let span = node.byte_range();
    let column = node.start_position().column;
    let text = &source[span.clone()];

    match node.kind() {
        "document" | "block_node" | "flow_node" => named_children(node)
            .into_iter()
            .find_map(|child| convert(child, source)),
        "plain_scalar" | "string_scalar" | "integer_scalar" | "float_scalar"
        | "boolean_scalar" | "null_scalar" => Some(Node::Scalar(Scalar {
            value: text.to_string(),
            style: ScalarStyle::Plain,
            span,
            column,
        })),
        "double_quote_scalar" => Some(Node::Scalar(Scalar {
            value: scalar::unescape_double(text),
            style: ScalarStyle::DoubleQuoted,
            span,
            column,
        })),
        "single_quote_scalar" => Some(Node::Scalar(Scalar {
            value: scalar::unescape_single(text),
            style: ScalarStyle::SingleQuoted,
            span,
            column,
        })),
        "block_scalar" => Some(Node::Scalar(Scalar {
            value: text.to_string(),
            style: ScalarStyle::Block,
            span,
            column,
        })),
        "alias" => Some(Node::Alias(span)),
        "block_mapping" | "flow_mapping" => {
            let style = if node.kind() == "block_mapping" {
                CollectionStyle::Block
            } else {
                CollectionStyle::Flow
            };
            let entries = named_children(node)
                .into_iter()
                .filter(|child| matches!(child.kind(), "block_mapping_pair" | "flow_pair"))
                .filter_map(|pair| convert_pair(pair, source))
                .collect();
            Some(Node::Mapping(Mapping {
                entries,
                style,
                span,
                column,
            }))
        }
        "block_sequence" => {
            let items = named_children(node)
                .into_iter()
                .filter(|child| child.kind() == "block_sequence_item")
                .map(|item| {
                    let item_span = item.byte_range();
                    let node = named_children(item)
                        .into_iter()
                        .find_map(|child| convert(child, source))
                        .unwrap_or_else(|| empty_scalar(item_span.end, item.end_position().column));
                    SequenceItem {
                        span: item_span,
                        column: item.start_position().column,
                        node,
                    }
                })
                .collect();
            Some(Node::Sequence(Sequence {
                items,
                style: CollectionStyle::Block,
                span,
                column,
            }))
        }
        "flow_sequence" => {
            let items = named_children(node)
                .into_iter()
                .filter_map(|child| {
                    let node = if child.kind() == "flow_pair" {
                        // `[a: b]` is a single-pair mapping
                        convert_pair(child, source).map(|entry| {
                            Node::Mapping(Mapping {
                                span: entry.span.clone(),
                                column: entry.column,
                                entries: vec![entry],
                                style: CollectionStyle::Flow,
                            })
                        })?
                    } else {
                        convert(child, source)?
                    };
                    Some(SequenceItem {
                        span: node.span(),
                        column: child.start_position().column,
                        node,
                    })
                })
                .collect();
            Some(Node::Sequence(Sequence {
                items,
                style: CollectionStyle::Flow,
                span,
                column,
            }))
        }
        _ => None,
    }
}

fn convert_pair(pair: tree_sitter::Node, source: &str) -> Option<Entry> {
    let key_node = pair.child_by_field_name("key")?;
    let key = convert(key_node, source)?;
    let value = pair
        .child_by_field_name("value")
        .and_then(|value| convert(value, source));
    Some(Entry {
        column: key_node.start_position().column,
        key,
        value,
        span: pair.byte_range(),
    })
}

fn empty_scalar(at: usize, column: usize) -> Node {
    Node::Scalar(Scalar {
        value: String::new(),
        style: ScalarStyle::Plain,
        span: at..at,
        column,
    })
}
