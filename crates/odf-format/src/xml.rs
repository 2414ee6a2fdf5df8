//! Indenting XML pretty-printer.
//!
//! # Design
//! - Purely textual: one token (tag or text node) per line, indented by depth.
//! - No awareness of namespaces, entities or CDATA; a `<` or `>` inside CDATA
//!   is scanned as markup.
//! - `pretty_print_xml` is strict and reports unterminated tags; `render_xml`
//!   picks the degraded rendering for display.

use thiserror::Error;

/// Indentation inserted per nesting level.
pub const INDENT_UNIT: &str = "  ";

/// Errors reported by the strict pretty-printer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum XmlFormatError {
    /// A `<` was found without a matching `>`.
    #[error("unterminated tag at byte {offset}")]
    UnterminatedTag {
        /// Byte offset of the offending `<` in the whitespace-collapsed input.
        offset: usize,
        /// Lines formatted before the scan halted.
        partial: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Opening,
    Closing,
    SelfClosing,
    Declaration,
}

impl TagKind {
    fn classify(tag: &str) -> Self {
        if tag.starts_with("</") {
            Self::Closing
        } else if tag.ends_with("/>") {
            Self::SelfClosing
        } else if tag.starts_with("<?") || tag.starts_with("<!") {
            Self::Declaration
        } else {
            Self::Opening
        }
    }
}

/// Pretty-print `input`, one token per line.
///
/// Input that already spans several lines and starts with `<` is returned
/// unchanged.
///
/// # Errors
///
/// Returns [`XmlFormatError::UnterminatedTag`] when a tag has no closing `>`;
/// the error carries everything formatted up to that point.
pub fn pretty_print_xml(input: &str) -> Result<String, XmlFormatError> {
    if is_preformatted(input) {
        return Ok(input.to_string());
    }

    let collapsed = collapse_inter_tag_whitespace(input);
    let mut output = String::with_capacity(collapsed.len() + collapsed.len() / 2);
    let mut depth = 0_usize;
    let mut offset = 0_usize;
    let mut rest = collapsed.as_str();

    while !rest.is_empty() {
        if rest.starts_with('<') {
            let Some(end) = rest.find('>') else {
                return Err(XmlFormatError::UnterminatedTag {
                    offset,
                    partial: output.trim().to_string(),
                });
            };
            let tag = &rest[..=end];
            let kind = TagKind::classify(tag);
            if kind == TagKind::Closing {
                depth = depth.saturating_sub(1);
            }
            push_line(&mut output, depth, tag);
            if kind == TagKind::Opening {
                depth += 1;
            }
            rest = &rest[end + 1..];
            offset += end + 1;
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            let text = rest[..end].trim();
            if !text.is_empty() {
                push_line(&mut output, depth, text);
            }
            rest = &rest[end..];
            offset += end;
        }
    }

    Ok(output.trim().to_string())
}

/// Display rendering that never fails.
///
/// An unterminated tag yields whatever was formatted before it; when nothing
/// was, the input is split at every `><` instead.
#[must_use]
pub fn render_xml(input: &str) -> String {
    match pretty_print_xml(input) {
        Ok(formatted) => formatted,
        Err(XmlFormatError::UnterminatedTag { offset, partial }) => {
            tracing::debug!(offset, "xml content has an unterminated tag");
            if partial.is_empty() {
                break_tags(input)
            } else {
                partial
            }
        }
    }
}

/// Best-effort fallback: put a line break between adjacent tags.
#[must_use]
pub fn break_tags(input: &str) -> String {
    input.replace("><", ">\n<")
}

fn is_preformatted(input: &str) -> bool {
    input.contains('\n') && input.trim_start().starts_with('<')
}

/// Remove whitespace runs sitting directly between `>` and `<`.
fn collapse_inter_tag_whitespace(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('>') {
        output.push_str(&rest[..=pos]);
        rest = &rest[pos + 1..];
        let trimmed = rest.trim_start();
        if trimmed.len() != rest.len() && trimmed.starts_with('<') {
            rest = trimmed;
        }
    }
    output.push_str(rest);
    output
}

fn push_line(output: &mut String, depth: usize, token: &str) {
    for _ in 0..depth {
        output.push_str(INDENT_UNIT);
    }
    output.push_str(token);
    output.push('\n');
}
