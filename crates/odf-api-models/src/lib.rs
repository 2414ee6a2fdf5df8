#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the ODF documents API.
//!
//! These types mirror the JSON contract served under `/odf-documents` and are
//! re-used by the client, the view models and the CLI so the wire shape stays a
//! single source of truth. Field names follow the backend's camelCase naming.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single ODF document as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OdfDocument {
    /// Opaque identifier assigned by the backend.
    pub id: String,
    /// Competition the document belongs to.
    pub competition_code: String,
    /// ODF document code (e.g. `SWMMFREESTY---------FNL-000100--`).
    pub document_code: String,
    /// Document type (e.g. `DT_RESULT`).
    pub document_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional document subtype.
    pub document_subtype: Option<String>,
    /// Document version as published by the feed.
    pub version: String,
    /// Publication timestamp as sent by the backend.
    pub date: String,
    /// Raw document content (XML or JSON).
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Result status (e.g. `OFFICIAL`) when the document carries one.
    pub result_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Unit codes referenced by the document.
    pub unit_codes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Content hash computed by the backend.
    pub content_hash: Option<String>,
    /// Record creation timestamp.
    pub created_at: String,
    /// Record update timestamp.
    pub updated_at: String,
}

impl OdfDocument {
    /// Publication date parsed into UTC when the backend value is recognisable.
    #[must_use]
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }

    /// Type label including the subtype when present (`DT_RESULT • FINAL`).
    #[must_use]
    pub fn type_label(&self) -> String {
        match self.document_subtype.as_deref() {
            Some(subtype) if !subtype.is_empty() => {
                format!("{} \u{2022} {subtype}", self.document_type)
            }
            _ => self.document_type.clone(),
        }
    }
}

/// Paginated document list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListResponse {
    #[serde(default)]
    /// Documents on the current page, in backend order.
    pub documents: Vec<OdfDocument>,
    #[serde(default)]
    /// Total number of documents matching the filters.
    pub total: u64,
    #[serde(default = "default_page")]
    /// Current page (1-based).
    pub page: u32,
    #[serde(default)]
    /// Page size used by the backend.
    pub page_size: u32,
}

const fn default_page() -> u32 {
    1
}

impl DocumentListResponse {
    /// Number of pages implied by `total` and `page_size`.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Whether the result set spans more than one page.
    #[must_use]
    pub fn is_paginated(&self) -> bool {
        self.total > u64::from(self.page_size)
    }
}

/// Raw content of one side of a comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComparedDocument {
    /// Document identifier.
    pub id: String,
    /// Raw XML content of the document.
    pub xml_content: String,
}

/// Pair of documents returned by the compare endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentComparison {
    #[serde(rename = "document1")]
    /// Left-hand document.
    pub document1: ComparedDocument,
    #[serde(rename = "document2")]
    /// Right-hand document.
    pub document2: ComparedDocument,
}

/// Disciplines known to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DisciplineListResponse {
    #[serde(default)]
    /// Three-letter discipline codes.
    pub disciplines: Vec<String>,
}

/// Query parameters accepted by the list endpoint. Absent values are not sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Requested page (1-based).
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Requested page size.
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Competition code filter.
    pub competition_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Document code filter.
    pub document_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Document type filter.
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Document subtype filter.
    pub document_subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Three-letter discipline filter.
    pub discipline: Option<String>,
}

impl DocumentListParams {
    /// Query pairs in wire order, skipping absent values.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize", page_size.to_string()));
        }
        let text_filters = [
            ("competitionCode", &self.competition_code),
            ("documentCode", &self.document_code),
            ("documentType", &self.document_type),
            ("documentSubtype", &self.document_subtype),
            ("discipline", &self.discipline),
        ];
        for (name, value) in text_filters {
            if let Some(value) = value {
                pairs.push((name, value.clone()));
            }
        }
        pairs
    }
}

/// `message` field of a server error body: a single string or a list of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ServerMessage {
    /// Single message.
    Text(String),
    /// Several validation messages.
    Many(Vec<String>),
}

impl ServerMessage {
    /// Flatten into one line.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Many(items) => items.join("; "),
        }
    }
}

/// Error payload the backend attaches to non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServerErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Human-readable message.
    pub message: Option<ServerMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Short error label (e.g. `Not Found`).
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Status code echoed by the server.
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Machine-readable error code.
    pub code: Option<String>,
}

impl ServerErrorBody {
    /// Server message when present and non-empty.
    #[must_use]
    pub fn message_text(&self) -> Option<String> {
        self.message
            .as_ref()
            .map(ServerMessage::joined)
            .filter(|text| !text.trim().is_empty())
    }

    /// Short error label when present and non-empty.
    #[must_use]
    pub fn error_text(&self) -> Option<String> {
        self.error.clone().filter(|text| !text.trim().is_empty())
    }
}

/// Parse the timestamp shapes the backend is known to emit.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (treated as UTC) and
/// bare dates.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
