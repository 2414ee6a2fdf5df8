//! Document detail: header, formatted content and clipboard copy.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use odf_api_models::OdfDocument;
use odf_client::{ApiResult, DocumentsApi};
use odf_format::{ContentKind, format_content, highlight, render_value};
use owo_colors::OwoColorize;
use serde_json::Value;
use tracing::debug;

use crate::list::format_date;
use crate::render::RenderOptions;

/// Shown in parsed mode when the backend has no parsed representation.
pub const PARSED_PLACEHOLDER: &str = "Parsed content not available";

/// Which representation of the content to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailMode {
    /// Raw content, formatted and highlighted.
    #[default]
    Raw,
    /// Backend's structured representation as pretty JSON.
    Parsed,
}

impl DetailMode {
    /// Lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Parsed => "parsed",
        }
    }
}

/// A fetched document, plus its parsed form when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    /// The document.
    pub document: OdfDocument,
    /// Parsed representation, when it was requested and available.
    pub parsed: Option<Value>,
}

impl DetailView {
    /// Fetch document `id`; in parsed mode the parsed form is fetched
    /// alongside it.
    ///
    /// A missing parsed form is not an error; the view shows a placeholder.
    ///
    /// # Errors
    ///
    /// Returns the API error when the document itself cannot be fetched.
    pub async fn load<A: DocumentsApi + ?Sized>(
        api: &A,
        id: &str,
        mode: DetailMode,
    ) -> ApiResult<Self> {
        match mode {
            DetailMode::Raw => Ok(Self {
                document: api.get_document(id).await?,
                parsed: None,
            }),
            DetailMode::Parsed => {
                let (document, parsed) =
                    tokio::join!(api.get_document(id), api.get_parsed_content(id));
                let parsed = match parsed {
                    Ok(value) => Some(value),
                    Err(err) => {
                        debug!(id, error = %err, "parsed content unavailable");
                        None
                    }
                };
                Ok(Self {
                    document: document?,
                    parsed,
                })
            }
        }
    }

    /// Render in `mode`.
    #[must_use]
    pub fn render(&self, mode: DetailMode, options: RenderOptions) -> String {
        render_detail(&self.document, mode, self.parsed.as_ref(), options)
    }
}

/// Header block followed by the content in `mode`.
#[must_use]
pub fn render_detail(
    document: &OdfDocument,
    mode: DetailMode,
    parsed: Option<&Value>,
    options: RenderOptions,
) -> String {
    let title = format!("Document: {}", document.document_code);
    let mut output = if options.color {
        format!("{}\n", title.bold())
    } else {
        format!("{title}\n")
    };

    let mut fields = vec![
        ("id", document.id.clone()),
        ("type", type_with_subtype(document)),
        ("version", document.version.clone()),
        ("date", format_date(&document.date)),
        ("competition", document.competition_code.clone()),
    ];
    if let Some(status) = document.result_status.as_deref().filter(|s| !s.is_empty()) {
        fields.push(("status", status.to_string()));
    }
    if let Some(hash) = document.content_hash.as_deref().filter(|h| !h.is_empty()) {
        fields.push(("hash", hash.to_string()));
    }
    if let Some(units) = document.unit_codes.as_ref().filter(|units| !units.is_empty()) {
        fields.push(("units", units.join(", ")));
    }
    for (label, value) in fields {
        output.push_str(&format!("  {:<12} {value}\n", format!("{label}:")));
    }
    output.push('\n');

    let (kind, formatted) = format_content(&document.content);
    match mode {
        DetailMode::Raw => {
            push_section(&mut output, &format!("{} content", kind.label()), options);
            output.push_str(&highlight(kind, &formatted, options.color));
        }
        DetailMode::Parsed => {
            push_section(&mut output, "Parsed content", options);
            match parsed {
                Some(value) => output.push_str(&highlight(
                    ContentKind::Json,
                    &render_value(value),
                    options.color,
                )),
                None => output.push_str(PARSED_PLACEHOLDER),
            }
        }
    }
    output.push('\n');
    output
}

/// OSC 52 escape asking the terminal to put `text` on the clipboard.
#[must_use]
pub fn osc52_copy(text: &str) -> String {
    format!("\u{1b}]52;c;{}\u{7}", STANDARD.encode(text))
}

fn type_with_subtype(document: &OdfDocument) -> String {
    match document.document_subtype.as_deref() {
        Some(subtype) if !subtype.is_empty() => {
            format!("{} ({subtype})", document.document_type)
        }
        _ => document.document_type.clone(),
    }
}

fn push_section(output: &mut String, title: &str, options: RenderOptions) {
    if options.color {
        output.push_str(&title.underline().to_string());
    } else {
        output.push_str(title);
    }
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use odf_client::testing::{RecordedCall, ScriptedApi};
    use odf_test_support::assert::{assert_in_order, strip_ansi};
    use odf_test_support::fixtures::{sample_document, sample_json_document};
    use serde_json::json;

    #[test]
    fn raw_mode_shows_header_then_formatted_xml() {
        let rendered = render_detail(
            &sample_document("doc-1"),
            DetailMode::Raw,
            None,
            RenderOptions::default(),
        );
        assert_in_order(
            &rendered,
            &[
                "Document: SWMMFREESTY---------FNL-000100--",
                "type:        DT_RESULT",
                "version:     3",
                "date:        2024-07-28 19:42",
                "competition: OG2024",
                "status:      OFFICIAL",
                "hash:        9f2c1e",
                "XML content",
                "<OdfBody",
                "\n  <Competition>",
                "</OdfBody>",
            ],
        );
    }

    #[test]
    fn json_documents_are_titled_json_and_pretty_printed() {
        let rendered = render_detail(
            &sample_json_document("j"),
            DetailMode::Raw,
            None,
            RenderOptions::default(),
        );
        assert!(rendered.contains("type:        DT_SCHEDULE (UPDATE)"));
        assert!(!rendered.contains("status:"));
        assert_in_order(&rendered, &["JSON content", "{\n  \"schedule\": {"]);
    }

    #[test]
    fn parsed_mode_shows_value_or_placeholder() {
        let document = sample_document("doc-1");
        let value = json!({"units": 3});
        let rendered = render_detail(
            &document,
            DetailMode::Parsed,
            Some(&value),
            RenderOptions::default(),
        );
        assert_in_order(&rendered, &["Parsed content", "\"units\": 3"]);
        assert!(!rendered.contains("XML content"));

        let missing = render_detail(&document, DetailMode::Parsed, None, RenderOptions::default());
        assert!(missing.contains(PARSED_PLACEHOLDER));
    }

    #[test]
    fn colour_does_not_change_visible_text() {
        let document = sample_document("doc-1");
        let plain = render_detail(&document, DetailMode::Raw, None, RenderOptions::default());
        let coloured = render_detail(
            &document,
            DetailMode::Raw,
            None,
            RenderOptions {
                color: true,
                ..RenderOptions::default()
            },
        );
        assert_eq!(strip_ansi(&coloured), plain);
    }

    #[test]
    fn osc52_wraps_base64_content() {
        assert_eq!(osc52_copy("<a/>"), "\u{1b}]52;c;PGEvPg==\u{7}");
    }

    #[tokio::test]
    async fn raw_load_skips_parsed_content() {
        let api = ScriptedApi::new().with_document(sample_document("doc-1"));
        let view = DetailView::load(&api, "doc-1", DetailMode::Raw)
            .await
            .expect("document");
        assert_eq!(view.parsed, None);
        assert_eq!(api.calls(), vec![RecordedCall::Document("doc-1".into())]);
    }

    #[tokio::test]
    async fn parsed_load_tolerates_missing_parsed_content() {
        let api = ScriptedApi::new()
            .with_document(sample_document("doc-1"))
            .with_document(sample_document("doc-2"))
            .with_parsed("doc-2", json!({"ok": true}));
        let without = DetailView::load(&api, "doc-1", DetailMode::Parsed)
            .await
            .expect("document");
        assert_eq!(without.parsed, None);
        let with = DetailView::load(&api, "doc-2", DetailMode::Parsed)
            .await
            .expect("document");
        assert_eq!(with.parsed, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn missing_document_is_an_error() {
        let api = ScriptedApi::new();
        let err = DetailView::load(&api, "nope", DetailMode::Raw)
            .await
            .expect_err("404");
        assert_eq!(err.display_message(), "Document nope not found");
    }
}
