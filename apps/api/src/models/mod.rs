//! Record shapes that generation output is decoded into.
//!
//! Field doc comments become schema descriptions via `schemars` and are embedded
//! in prompts as format instructions.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;

pub mod alignment;
pub mod job;
pub mod resume;
pub mod review;

/// A record shape that generated text can be decoded and validated against.
pub trait Schema: DeserializeOwned + JsonSchema {
    /// Stable name used in logs and decode failures.
    const NAME: &'static str;

    /// Semantic checks serde cannot express. Called after a successful parse.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Pretty-printed JSON schema for `T`, embedded in prompts as format instructions.
pub fn format_instructions<T: Schema>() -> String {
    let schema = schemars::schema_for!(T);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| format!("{{\"title\": \"{}\"}}", T::NAME))
}

/// Keeps only the non-blank strings of an optional-element list.
pub fn present(items: &[Option<String>]) -> impl Iterator<Item = &str> {
    items
        .iter()
        .filter_map(|item| item.as_deref())
        .map(str::trim)
        .filter(|item| !item.is_empty())
}
