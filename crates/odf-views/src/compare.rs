//! Side-by-side comparison of two documents' raw content.
//!
//! No diff is computed; both documents are pretty-printed and laid out in two
//! panes of equal width.

use odf_api_models::DocumentComparison;
use odf_client::{ApiResult, DocumentsApi};
use odf_format::{ContentKind, highlight, render_xml};
use owo_colors::OwoColorize;

use crate::render::RenderOptions;

const SEPARATOR: &str = " | ";
const MIN_PANE_WIDTH: usize = 12;

/// A fetched comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareView {
    /// Both documents, in request order.
    pub comparison: DocumentComparison,
}

impl CompareView {
    /// Fetch the comparison of `first_id` and `second_id`.
    ///
    /// # Errors
    ///
    /// Returns the API error when either document cannot be fetched.
    pub async fn load<A: DocumentsApi + ?Sized>(
        api: &A,
        first_id: &str,
        second_id: &str,
    ) -> ApiResult<Self> {
        Ok(Self {
            comparison: api.compare(first_id, second_id).await?,
        })
    }

    /// Render both panes.
    #[must_use]
    pub fn render(&self, options: RenderOptions) -> String {
        render_compare(&self.comparison, options)
    }
}

/// Identifiers, then the two documents side by side.
#[must_use]
pub fn render_compare(comparison: &DocumentComparison, options: RenderOptions) -> String {
    let left_id = &comparison.document1.id;
    let right_id = &comparison.document2.id;
    let mut output = String::from("Comparing XML documents\n");
    output.push_str(&format!("  document 1: {left_id}\n  document 2: {right_id}\n\n"));

    let pane_width = (options.width.saturating_sub(SEPARATOR.len()) / 2).max(MIN_PANE_WIDTH);
    let left = render_xml(&comparison.document1.xml_content);
    let right = render_xml(&comparison.document2.xml_content);
    let left_lines: Vec<&str> = left.lines().collect();
    let right_lines: Vec<&str> = right.lines().collect();

    push_row(
        &mut output,
        &format!("Document 1 ({left_id})"),
        &format!("Document 2 ({right_id})"),
        pane_width,
        options,
        true,
    );
    output.push_str(&"-".repeat(pane_width));
    output.push_str(SEPARATOR);
    output.push_str(&"-".repeat(pane_width));
    output.push('\n');

    for index in 0..left_lines.len().max(right_lines.len()) {
        push_row(
            &mut output,
            left_lines.get(index).copied().unwrap_or(""),
            right_lines.get(index).copied().unwrap_or(""),
            pane_width,
            options,
            false,
        );
    }
    output
}

fn push_row(
    output: &mut String,
    left: &str,
    right: &str,
    width: usize,
    options: RenderOptions,
    heading: bool,
) {
    output.push_str(&pane_cell(left, width, options, heading));
    output.push_str(SEPARATOR);
    let right = pane_cell(right, width, options, heading);
    output.push_str(right.trim_end());
    output.push('\n');
}

/// `text` truncated or padded to exactly `width` visible columns.
fn pane_cell(text: &str, width: usize, options: RenderOptions, heading: bool) -> String {
    let count = text.chars().count();
    let (visible, padding) = if count > width {
        let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        truncated.push('\u{2026}');
        (truncated, 0)
    } else {
        (text.to_string(), width - count)
    };
    let decorated = match (options.color, heading) {
        (false, _) => visible,
        (true, true) => visible.bold().to_string(),
        (true, false) => highlight(ContentKind::Xml, &visible, true),
    };
    format!("{decorated}{}", " ".repeat(padding))
}
