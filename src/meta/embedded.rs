//! Metadata embedded in component files.
//!
//! Two shapes are recognized, both holding a flat literal mapping:
//!
//! ```text
//! /* @meta { title: 'Users', auth: true } */       (also `// @meta {..}` and `<!-- @meta {..} -->`)
//! export const routeMeta = { title: "Users", roles: ['admin', 'editor'] }
//! ```
//!
//! This is a best-effort textual extraction, not an evaluator. Values may be
//! quoted strings, numbers, `true`/`false`/`null`, or `[...]` lists of those.
//! Nested objects, nested lists and expressions are rejected with a
//! [`MetaParseError`]. When both shapes are present, keys from the export win.

use std::io;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use serde_json::{Number, Value};
use thiserror::Error;

use crate::route::{DiscoveredFile, Meta};

static COMMENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:/\*+|<!--|//)\s*@meta\b\s*").expect("valid comment marker regex")
});

static EXPORT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+const\s+(?:routeMeta|meta)\s*(?::[^=]+)?=\s*")
        .expect("valid export marker regex")
});

/// Why an embedded literal could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaParseError {
    #[error("expected `{{` after the metadata marker")]
    MissingBlock,

    #[error("unterminated `{0}`")]
    Unterminated(char),

    #[error("nested objects are not supported")]
    NestedObject,

    #[error("nested lists are not supported")]
    NestedList,

    #[error("entry `{0}` has no `:` separator")]
    MissingSeparator(String),

    #[error("empty key")]
    EmptyKey,

    #[error("unsupported value `{0}`")]
    UnsupportedValue(String),
}

// ============================================================================
// Collection
// ============================================================================

/// Embedded metadata keyed by exact component file identity.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedMeta(FxHashMap<String, Meta>);

impl EmbeddedMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and extract metadata from every discovered file.
    ///
    /// Unreadable files are skipped silently; malformed literals are skipped
    /// with a warning. Neither aborts the pass.
    pub fn collect<F>(files: &[DiscoveredFile], mut read: F) -> Self
    where
        F: FnMut(&str) -> io::Result<String>,
    {
        let mut embedded = Self::new();
        for file in files {
            let identity = file.loader.identity();
            let source = match read(identity) {
                Ok(source) => source,
                Err(e) => {
                    crate::debug!("meta"; "cannot read {}: {}", identity, e);
                    continue;
                }
            };
            match extract(&source) {
                Ok(Some(meta)) => embedded.insert(identity, meta),
                Ok(None) => {}
                Err(e) => crate::log!("warn"; "skipping embedded metadata in {}: {}", identity, e),
            }
        }
        crate::debug!("meta"; "embedded metadata in {} of {} files", embedded.len(), files.len());
        embedded
    }

    pub fn insert(&mut self, identity: impl Into<String>, meta: Meta) {
        self.0.insert(identity.into(), meta);
    }

    #[inline]
    pub fn get(&self, identity: &str) -> Option<&Meta> {
        self.0.get(identity)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract embedded metadata from a component source.
///
/// Returns `Ok(None)` when the file carries no metadata marker at all.
pub fn extract(source: &str) -> Result<Option<Meta>, MetaParseError> {
    let comment = find_literal(source, &COMMENT_MARKER)?;
    let export = find_literal(source, &EXPORT_MARKER)?;

    if comment.is_none() && export.is_none() {
        return Ok(None);
    }

    let mut meta = Meta::new();
    for block in [comment, export].into_iter().flatten() {
        meta.extend(parse_object(block)?);
    }
    Ok(Some(meta))
}

/// Locate the `{...}` literal following a marker.
fn find_literal<'a>(source: &'a str, marker: &Regex) -> Result<Option<&'a str>, MetaParseError> {
    let Some(found) = marker.find(source) else {
        return Ok(None);
    };
    let rest = &source[found.end()..];
    if !rest.starts_with('{') {
        return Err(MetaParseError::MissingBlock);
    }
    balanced_block(rest).map(Some)
}

/// Slice from the leading `{` to its matching `}`, skipping quoted text.
fn balanced_block(source: &str) -> Result<&str, MetaParseError> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in source.char_indices() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&source[..=i]);
                }
            }
            _ => {}
        }
    }
    Err(MetaParseError::Unterminated('{'))
}

// ============================================================================
// Literal parsing
// ============================================================================

/// Parse a flat `{ key: value, ... }` literal.
fn parse_object(block: &str) -> Result<Meta, MetaParseError> {
    let inner = &block[1..block.len() - 1];
    let mut meta = Meta::new();

    for entry in split_top_level(inner)? {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (key, value) =
            split_key_value(entry).ok_or_else(|| MetaParseError::MissingSeparator(entry.to_string()))?;
        let key = unquote(key.trim()).unwrap_or(key.trim());
        if key.is_empty() {
            return Err(MetaParseError::EmptyKey);
        }
        meta.insert(key.to_string(), parse_value(value.trim())?);
    }
    Ok(meta)
}

fn parse_value(raw: &str) -> Result<Value, MetaParseError> {
    if raw.starts_with('{') {
        return Err(MetaParseError::NestedObject);
    }
    if let Some(inner) = raw.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or(MetaParseError::Unterminated('['))?;
        let items = split_top_level(inner)?
            .into_iter()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                if item.starts_with('[') {
                    Err(MetaParseError::NestedList)
                } else {
                    parse_scalar(item)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Value::Array(items));
    }
    parse_scalar(raw)
}

fn parse_scalar(raw: &str) -> Result<Value, MetaParseError> {
    if let Some(text) = unquote(raw) {
        return Ok(Value::String(unescape(text)));
    }
    match raw {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "null" | "undefined" => return Ok(Value::Null),
        _ => {}
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Ok(Value::Number(int.into()));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| MetaParseError::UnsupportedValue(raw.to_string()))
}

/// Inner text of a `'..'`, `".."` or `` `..` `` literal.
fn unquote(raw: &str) -> Option<&str> {
    let first = raw.chars().next()?;
    if !matches!(first, '\'' | '"' | '`') || raw.len() < 2 || !raw.ends_with(first) {
        return None;
    }
    Some(&raw[1..raw.len() - 1])
}

fn unescape(text: &str) -> String {
    text.replace("\\'", "'")
        .replace("\\\"", "\"")
        .replace("\\`", "`")
}

/// Split on commas outside quotes and brackets.
fn split_top_level(source: &str) -> Result<Vec<&str>, MetaParseError> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in source.char_indices() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '{' => return Err(MetaParseError::NestedObject),
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(MetaParseError::UnsupportedValue("]".to_string()))?;
            }
            ',' if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if let Some(q) = quote {
        return Err(MetaParseError::Unterminated(q));
    }
    if depth > 0 {
        return Err(MetaParseError::Unterminated('['));
    }
    parts.push(&source[start..]);
    Ok(parts)
}

/// Split `key: value` at the first colon outside quotes.
fn split_key_value(entry: &str) -> Option<(&str, &str)> {
    let mut quote: Option<char> = None;
    for (i, c) in entry.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if matches!(c, '\'' | '"' | '`') => quote = Some(c),
            None if c == ':' => return Some((&entry[..i], &entry[i + 1..])),
            None => {}
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
