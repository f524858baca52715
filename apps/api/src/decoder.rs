//! Resilient JSON decoding of generated text into schema records.
//!
//! Every generation call in the service ends here. Model output is parsed as-is
//! first and, failing that, from the first fenced code block it contains. The
//! parsed object is then checked against the target record's shape.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::models::Schema;

#[derive(Debug, Error)]
pub enum DecodeFailure {
    #[error("unparseable output: {reason}")]
    Unparseable { reason: String, raw: String },

    #[error("schema violation for {schema}: {details}")]
    SchemaViolation { schema: &'static str, details: String },
}

/// Decodes `raw` into `T`, recovering JSON wrapped in prose or a fenced block.
pub fn decode<T: Schema>(raw: &str) -> Result<T, DecodeFailure> {
    let value = parse_direct(raw)
        .or_else(|direct_err| {
            fenced_block(raw)
                .ok_or(direct_err)
                .and_then(parse_direct)
        })
        .map_err(|err| DecodeFailure::Unparseable {
            reason: err.to_string(),
            raw: raw.to_string(),
        })?;

    let record: T =
        serde_json::from_value(prune_nulls(value)).map_err(|err| DecodeFailure::SchemaViolation {
            schema: T::NAME,
            details: err.to_string(),
        })?;

    record
        .validate()
        .map_err(|details| DecodeFailure::SchemaViolation {
            schema: T::NAME,
            details,
        })?;

    debug!(schema = T::NAME, "decoded generated output");
    Ok(record)
}

#[derive(Debug, Error)]
enum ParseError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

fn parse_direct(text: &str) -> Result<Value, ParseError> {
    match serde_json::from_str::<Value>(text.trim())? {
        Value::Object(map) => Ok(Value::Object(map)),
        other => Err(ParseError::NotAnObject(kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Interior of the first ```json block, else of the first untagged ``` block.
fn fenced_block(text: &str) -> Option<&str> {
    let lower = text.to_ascii_lowercase();
    if let Some(start) = lower.find("```json") {
        let body = &text[start + "```json".len()..];
        return Some(until_closing_fence(body));
    }

    let start = text.find("```")?;
    let body = &text[start + 3..];
    // Skip a language tag on the opening line, if any.
    let body = match body.find('\n') {
        Some(newline) if !body[..newline].trim_start().starts_with('{') => &body[newline + 1..],
        _ => body,
    };
    Some(until_closing_fence(body))
}

fn until_closing_fence(body: &str) -> &str {
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Drops `null` object members so defaults apply. Array elements are kept in place.
fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_nulls).collect()),
        other => other,
    }
}
