//! Span-based edits over the original YAML source
//!
//! Edits never overlap: each one replaces a byte range of the untouched
//! source, and insertions are zero-width ranges. Applying them in a single
//! forward pass leaves every other byte of the file as it was.

use std::ops::Range;

use crate::yaml::document::{CollectionStyle, Entry, Mapping, Node, Sequence};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub text: String,
}

/// Collects edits against one source text
pub struct Editor<'a> {
    source: &'a str,
    newline: &'static str,
    edits: Vec<TextEdit>,
}

impl<'a> Editor<'a> {
    pub fn new(source: &'a str) -> Self {
        let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
        Self {
            source,
            newline,
            edits: Vec::new(),
        }
    }

    pub fn is_changed(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Replace the whole text of `node`
    pub fn replace(&mut self, node: &Node, text: impl Into<String>) {
        self.push(node.span(), text.into());
    }

    /// Remove item `index` of `seq`, together with its line for block sequences
    pub fn remove_item(&mut self, seq: &Sequence, index: usize) {
        let Some(item) = seq.items.get(index) else {
            return;
        };
        let range = match seq.style {
            CollectionStyle::Block => {
                let start = self.line_start(item.span.start);
                if self.source[start..item.span.start].trim().is_empty() {
                    start..self.next_line_start(self.content_end(&item.span))
                } else {
                    item.span.clone()
                }
            }
            CollectionStyle::Flow => match index {
                0 => match seq.items.get(1) {
                    Some(next) => item.span.start..next.span.start,
                    None => item.span.clone(),
                },
                _ => seq.items[index - 1].span.end..item.span.end,
            },
        };
        self.push(range, String::new());
    }

    /// Add a new item after item `after` (or as the only item of an empty
    /// flow sequence when `after` is `None`)
    pub fn append_item(&mut self, seq: &Sequence, after: Option<usize>, text: &str) {
        let anchor = after.and_then(|i| seq.items.get(i));
        match (seq.style, anchor) {
            (CollectionStyle::Block, Some(item)) => {
                let at = self.line_end(self.content_end(&item.span));
                let indent = " ".repeat(item.column);
                self.push(at..at, format!("{}{indent}- {text}", self.newline));
            }
            (CollectionStyle::Flow, Some(item)) => {
                let at = item.span.end;
                self.push(at..at, format!(", {text}"));
            }
            (_, None) => {
                let at = seq.span.start + 1;
                self.push(at..at, text.to_string());
            }
        }
    }

    /// Add `key: value` as the last entry of `mapping`
    pub fn insert_entry(&mut self, mapping: &Mapping, key: &str, value: &str) {
        match (mapping.style, mapping.entries.last()) {
            (CollectionStyle::Block, Some(last)) => {
                let at = self.line_end(self.content_end(&last.span));
                let indent = " ".repeat(mapping.key_column());
                self.push(at..at, format!("{}{indent}{key}: {value}", self.newline));
            }
            (CollectionStyle::Flow, Some(last)) => {
                let at = last.span.end;
                self.push(at..at, format!(", {key}: {value}"));
            }
            (_, None) => {
                let at = mapping.span.start + 1;
                self.push(at..at, format!("{key}: {value}"));
            }
        }
    }

    /// Add `key:` holding the one-entry mapping `child_key: value` as the
    /// last entry of `mapping`
    pub fn insert_nested_entry(
        &mut self,
        mapping: &Mapping,
        key: &str,
        child_key: &str,
        value: &str,
    ) {
        match (mapping.style, mapping.entries.last()) {
            (CollectionStyle::Block, Some(last)) => {
                let at = self.line_end(self.content_end(&last.span));
                let indent = " ".repeat(mapping.key_column());
                let nl = self.newline;
                self.push(
                    at..at,
                    format!("{nl}{indent}{key}:{nl}{indent}  {child_key}: {value}"),
                );
            }
            _ => {
                let nested = format!("{{{child_key}: {value}}}");
                self.insert_entry(mapping, key, &nested);
            }
        }
    }

    /// Give an entry written as `key:` with no value the one-entry mapping
    /// `child_key: value`
    pub fn fill_empty_entry(
        &mut self,
        parent: &Mapping,
        entry: &Entry,
        child_key: &str,
        value: &str,
    ) {
        match parent.style {
            CollectionStyle::Block => {
                let at = self.line_end(self.content_end(&entry.span));
                let indent = " ".repeat(entry.column);
                self.push(
                    at..at,
                    format!("{}{indent}  {child_key}: {value}", self.newline),
                );
            }
            CollectionStyle::Flow => {
                let at = entry.span.end;
                self.push(at..at, format!(" {{{child_key}: {value}}}"));
            }
        }
    }

    /// Apply every edit to the source
    pub fn finish(mut self) -> String {
        self.edits
            .sort_by(|a, b| (a.range.start, a.range.end).cmp(&(b.range.start, b.range.end)));

        let mut out = String::with_capacity(self.source.len() + 64);
        let mut cursor = 0;
        for edit in &self.edits {
            debug_assert!(edit.range.start >= cursor, "overlapping edits");
            let start = edit.range.start.max(cursor);
            out.push_str(&self.source[cursor..start]);
            out.push_str(&edit.text);
            cursor = edit.range.end.max(cursor);
        }
        out.push_str(&self.source[cursor..]);
        out
    }

    fn push(&mut self, range: Range<usize>, text: String) {
        self.edits.push(TextEdit { range, text });
    }

    /// End of a span, ignoring a trailing line break the span may include
    fn content_end(&self, span: &Range<usize>) -> usize {
        let text = &self.source[span.clone()];
        let trimmed = text.trim_end_matches(['\n', '\r']);
        span.start + trimmed.len()
    }

    fn line_start(&self, pos: usize) -> usize {
        self.source[..pos].rfind('\n').map_or(0, |p| p + 1)
    }

    /// Position of the line break ending the line that holds `pos`
    fn line_end(&self, pos: usize) -> usize {
        let end = self.source[pos..]
            .find('\n')
            .map_or(self.source.len(), |p| pos + p);
        if end > 0 && self.source[..end].ends_with('\r') {
            end - 1
        } else {
            end
        }
    }

    fn next_line_start(&self, pos: usize) -> usize {
        self.source[pos..]
            .find('\n')
            .map_or(self.source.len(), |p| pos + p + 1)
    }
}
