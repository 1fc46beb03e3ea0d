//! Scalar resolution and rendering
//!
//! Resolution follows the YAML 1.2 core schema so that a plain `1.22` is seen
//! as a float and `1.13.1` as a string. Rendering additionally quotes the
//! YAML 1.1 boolean words (`on`, `yes`, ...).

use std::sync::LazyLock;

use regex::Regex;

static INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-+]?[0-9]+|0o[0-7]+|0x[0-9a-fA-F]+)$").unwrap());

static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
    )
    .unwrap()
});

const NULL_WORDS: &[&str] = &["", "~", "null", "Null", "NULL"];

const BOOL_WORDS: &[&str] = &["true", "True", "TRUE", "false", "False", "FALSE"];

const LEGACY_BOOL_WORDS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off",
    "OFF",
];

/// How a scalar was written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// Literal (`|`) or folded (`>`) block scalar
    Block,
}

/// Type a scalar resolves to under the core schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Str,
    Int,
    Float,
    Bool,
    Null,
}

/// Resolve the type of a scalar given its decoded value and style.
/// Only plain scalars are subject to implicit typing.
pub fn resolve(value: &str, style: ScalarStyle) -> ScalarType {
    if style != ScalarStyle::Plain {
        return ScalarType::Str;
    }
    if NULL_WORDS.contains(&value) {
        ScalarType::Null
    } else if BOOL_WORDS.contains(&value) {
        ScalarType::Bool
    } else if INT_RE.is_match(value) {
        ScalarType::Int
    } else if FLOAT_RE.is_match(value) {
        ScalarType::Float
    } else {
        ScalarType::Str
    }
}

/// Render `value` as a scalar, following the style of the scalar it replaces
/// or sits next to. Plain stays plain only when the value would still read
/// back as the same string.
pub fn render(value: &str, style: ScalarStyle) -> String {
    match style {
        ScalarStyle::SingleQuoted => single_quoted(value),
        ScalarStyle::DoubleQuoted => double_quoted(value),
        ScalarStyle::Plain | ScalarStyle::Block => {
            if needs_quotes(value) {
                double_quoted(value)
            } else {
                value.to_string()
            }
        }
    }
}

/// Whether a plain rendering of `value` would be misread or invalid
pub fn needs_quotes(value: &str) -> bool {
    if resolve(value, ScalarStyle::Plain) != ScalarType::Str
        || LEGACY_BOOL_WORDS.contains(&value)
    {
        return true;
    }
    if value.trim() != value {
        return true;
    }
    let starts_with_indicator = value.starts_with(|c: char| {
        matches!(
            c,
            '-' | '?' | ':' | ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>'
                | '\'' | '"' | '%' | '@' | '`'
        )
    });
    starts_with_indicator
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || value.contains(|c: char| c.is_control())
}

pub fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Decode the text of a double-quoted scalar, quotes included
pub(crate) fn unescape_double(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('/') => out.push('/'),
            Some(' ') => out.push(' '),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Decode the text of a single-quoted scalar, quotes included
pub(crate) fn unescape_single(raw: &str) -> String {
    raw.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(raw)
        .replace("''", "'")
}
