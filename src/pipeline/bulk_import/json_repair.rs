//! Cleanup of LLM JSON output.
//!
//! Repairs are applied one after another and the text is re-parsed after
//! each step, so a response that is already valid is never rewritten.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::error::ImportError;

static RE_TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").unwrap());
static RE_UNQUOTED_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)(\s*):"#).unwrap());
static RE_SINGLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"'([^'"\\]*)'"#).unwrap());

/// Extract a JSON block from LLM response text.
/// Handles fenced blocks and responses with text before/after the JSON.
pub fn extract_json_block(response: &str) -> Result<&str, ImportError> {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json") {
        let after_fence = &trimmed[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return Ok(after_fence[..end].trim());
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        if let Some(end) = after_fence.find("```") {
            let block = after_fence[..end].trim();
            if block.starts_with('{') || block.starts_with('[') {
                return Ok(block);
            }
        }
    }

    // Outermost object or array, whichever opens first
    let object = trimmed.find('{').zip(trimmed.rfind('}'));
    let array = trimmed.find('[').zip(trimmed.rfind(']'));
    let span = match (object, array) {
        (Some(o), Some(a)) => Some(if a.0 < o.0 { a } else { o }),
        (o, a) => o.or(a),
    };
    if let Some((start, end)) = span {
        if start < end {
            return Ok(&trimmed[start..=end]);
        }
    }

    Err(ImportError::JsonParsing(
        "No JSON block found in LLM response".to_string(),
    ))
}

/// Newlines and tabs become spaces (valid between tokens, invalid inside
/// strings); other control characters are dropped.
fn strip_control_chars(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

fn remove_trailing_commas(s: &str) -> String {
    RE_TRAILING_COMMA.replace_all(s, "$1").into_owned()
}

fn quote_keys(s: &str) -> String {
    RE_UNQUOTED_KEY.replace_all(s, r#"$1"$2"$3:"#).into_owned()
}

fn normalize_quotes(s: &str) -> String {
    RE_SINGLE_QUOTED.replace_all(s, r#""$1""#).into_owned()
}

const REPAIRS: &[(&str, fn(&str) -> String)] = &[
    ("control_chars", strip_control_chars),
    ("trailing_commas", remove_trailing_commas),
    ("unquoted_keys", quote_keys),
    ("single_quotes", normalize_quotes),
];

/// Parse an LLM response as JSON, repairing it progressively if needed.
pub fn parse_lenient_json(response: &str) -> Result<Value, ImportError> {
    let block = extract_json_block(response)?;
    let mut last_error = match serde_json::from_str::<Value>(block) {
        Ok(value) => return Ok(value),
        Err(e) => e.to_string(),
    };

    let mut text = block.to_string();
    for (step, repair) in REPAIRS {
        text = repair(&text);
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => {
                tracing::debug!(step = *step, "JSON repaired");
                return Ok(value);
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(ImportError::JsonParsing(last_error))
}
