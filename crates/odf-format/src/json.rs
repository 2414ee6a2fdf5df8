//! JSON pretty-printing with a two-space indent.

use serde_json::Value;

/// Parse `input` and re-serialise it with two-space indentation.
///
/// # Errors
///
/// Returns the parse error when `input` is not valid JSON.
pub fn pretty_print_json(input: &str) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(input)?;
    serde_json::to_string_pretty(&value)
}

/// Display rendering: malformed JSON is shown exactly as received.
#[must_use]
pub fn render_json(input: &str) -> String {
    pretty_print_json(input).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "json content did not parse; showing raw text");
        input.to_string()
    })
}

/// Pretty-print an already decoded value.
#[must_use]
pub fn render_value(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
