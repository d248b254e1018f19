//! The extraction pipeline.
//!
//! 1. Fenced blocks are replaced by their inner content.
//! 2. The span from the first `[` to the last `]` is tried as a JSON array
//!    of strings.
//! 3. Otherwise the text is split on commas and newlines.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use tracing::{debug, instrument};

use mindscribe_shared::Keywords;

/// Which stage of the pipeline produced the keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordSource {
    /// A bracketed JSON array of strings.
    JsonArray,
    /// Comma/newline split of the cleaned text.
    Fallback,
}

/// Keywords together with the stage that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub keywords: Keywords,
    pub source: KeywordSource,
}

/// Extract keywords from raw model output.
///
/// Never fails. Returns an empty list when nothing usable is found.
pub fn extract(raw: &str) -> Keywords {
    extract_with_source(raw).keywords
}

/// Like [`extract`], also reporting which stage produced the result.
#[instrument(skip_all, fields(len = raw.len()))]
pub fn extract_with_source(raw: &str) -> Extraction {
    let cleaned = strip_fences(raw);

    if let Some(keywords) = parse_json_array(&cleaned) {
        debug!(count = keywords.len(), "keywords taken from JSON array");
        return Extraction {
            keywords,
            source: KeywordSource::JsonArray,
        };
    }

    let keywords = split_fragments(&cleaned);
    debug!(count = keywords.len(), "keywords taken from comma/newline split");
    Extraction {
        keywords,
        source: KeywordSource::Fallback,
    }
}

// ---------------------------------------------------------------------------
// Stage 1: fenced blocks
// ---------------------------------------------------------------------------

/// Replace every ```` ``` ```` fenced region with its body.
fn strip_fences(text: &str) -> Cow<'_, str> {
    static FENCE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"```[\s\S]*?```").expect("valid regex"));

    FENCE_RE.replace_all(text, |caps: &Captures<'_>| fence_body(&caps[0]).to_string())
}

/// Body of a single fenced region, without the fences, the language tag
/// line, or the newline before the closing fence.
fn fence_body(fenced: &str) -> &str {
    let inner = &fenced[3..fenced.len() - 3];
    if !inner.contains('\n') {
        return inner;
    }

    let inner = match inner.split_once('\n') {
        Some((tag, rest)) if is_language_tag(tag) => rest,
        _ => inner,
    };
    let inner = inner.strip_suffix('\n').unwrap_or(inner);
    inner.strip_suffix('\r').unwrap_or(inner)
}

fn is_language_tag(line: &str) -> bool {
    line.trim_end_matches('\r')
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '+' | '.'))
}

// ---------------------------------------------------------------------------
// Stage 2: bracketed JSON array
// ---------------------------------------------------------------------------

/// Parse the outermost `[ ... ]` span as an array of strings.
///
/// Returns `None` when there is no span, it is not valid JSON, any element
/// is not a string, or no keyword survives.
fn parse_json_array(text: &str) -> Option<Keywords> {
    static ARRAY_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[[\s\S]*\]").expect("valid regex"));

    if !(text.contains('[') && text.contains(']')) {
        return None;
    }
    let span = ARRAY_RE.find(text)?.as_str();

    let value: Value = match serde_json::from_str(span) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "bracketed span is not valid JSON, falling back");
            return None;
        }
    };

    let Value::Array(items) = value else {
        return None;
    };

    let mut keywords = Keywords::new();
    for item in items {
        match item {
            Value::String(s) => {
                keywords.push(s);
            }
            other => {
                debug!(element = %other, "array holds a non-string element, falling back");
                return None;
            }
        }
    }

    (!keywords.is_empty()).then_some(keywords)
}

// ---------------------------------------------------------------------------
// Stage 3: comma/newline split
// ---------------------------------------------------------------------------

/// Split on commas and newlines, dropping blanks and JSON debris.
fn split_fragments(text: &str) -> Keywords {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty() && !fragment.starts_with(['"', '[', ']']))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
