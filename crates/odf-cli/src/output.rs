//! Output renderers for CLI commands.
//!
//! Table output reuses the view renderers; JSON output is the API payload.

use anyhow::anyhow;
use odf_api_models::{DocumentComparison, DocumentListResponse, OdfDocument};
use odf_views::{
    DetailMode, EMPTY_STATE, RenderOptions, render_compare, render_detail, render_list,
    render_table,
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_document_list(
    list: &DocumentListResponse,
    format: OutputFormat,
    options: RenderOptions,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(list),
        OutputFormat::Table => Ok(render_list(list, options)),
    }
}

pub(crate) fn render_document(
    document: &OdfDocument,
    mode: DetailMode,
    parsed: Option<&Value>,
    format: OutputFormat,
    options: RenderOptions,
) -> CliResult<String> {
    match (format, mode) {
        (OutputFormat::Json, DetailMode::Raw) => to_json(document),
        (OutputFormat::Json, DetailMode::Parsed) => {
            to_json(&json!({ "document": document, "parsed": parsed }))
        }
        (OutputFormat::Table, _) => Ok(render_detail(document, mode, parsed, options)),
    }
}

pub(crate) fn render_code_matches(
    document_code: &str,
    documents: &[OdfDocument],
    format: OutputFormat,
    options: RenderOptions,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&documents),
        OutputFormat::Table if documents.is_empty() => Ok(format!("{EMPTY_STATE}\n")),
        OutputFormat::Table => Ok(format!(
            "{} versions of {document_code}\n{}",
            documents.len(),
            render_table(documents, options)
        )),
    }
}

pub(crate) fn render_comparison(
    comparison: &DocumentComparison,
    format: OutputFormat,
    options: RenderOptions,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(comparison),
        OutputFormat::Table => Ok(render_compare(comparison, options)),
    }
}

pub(crate) fn render_disciplines(
    disciplines: &[String],
    rejected: &[String],
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&json!({ "disciplines": disciplines, "rejected": rejected })),
        OutputFormat::Table => {
            let mut text = String::new();
            if disciplines.is_empty() {
                text.push_str("no disciplines\n");
            }
            for code in disciplines {
                text.push_str(code);
                text.push('\n');
            }
            if !rejected.is_empty() {
                text.push_str(&format!("ignored malformed codes: {}\n", rejected.join(", ")));
            }
            Ok(text)
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}
