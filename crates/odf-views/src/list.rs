//! Document list: controller and table rendering.

use odf_api_models::{DocumentListParams, DocumentListResponse, OdfDocument, parse_timestamp};
use odf_client::{ApiError, DocumentsApi};
use owo_colors::OwoColorize;
use tracing::debug;

use crate::filters::{DocumentFilters, FilterError, FilterField};
use crate::render::RenderOptions;
use crate::status::render_error;

/// Shown instead of rows when a page is empty.
pub const EMPTY_STATE: &str = "No documents found";

const HEADERS: [&str; 5] = ["CODE", "TYPE", "VERSION", "DATE", "ID"];

/// Outcome of the latest list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    /// Nothing requested yet.
    Idle,
    /// Filters are invalid; no request was issued.
    Invalid(FilterError),
    /// Page received.
    Loaded(DocumentListResponse),
    /// Request failed.
    Failed(ApiError),
}

/// Filters, pagination and the latest result of the list view.
#[derive(Debug, Clone)]
pub struct ListController {
    filters: DocumentFilters,
    page: u32,
    page_size: u32,
    state: ListState,
}

impl ListController {
    /// First page, no filters.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            filters: DocumentFilters {
                competition_code: String::new(),
                document_code: String::new(),
                document_type: String::new(),
                document_subtype: String::new(),
                discipline: String::new(),
            },
            page: 1,
            page_size,
            state: ListState::Idle,
        }
    }

    /// Applied filters.
    #[must_use]
    pub const fn filters(&self) -> &DocumentFilters {
        &self.filters
    }

    /// Current page (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Latest outcome.
    #[must_use]
    pub const fn state(&self) -> &ListState {
        &self.state
    }

    /// Change one filter; any change returns to page 1.
    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) -> bool {
        let changed = self.filters.set(field, value);
        if changed {
            self.page = 1;
        }
        changed
    }

    /// Replace every filter; any change returns to page 1.
    pub fn set_filters(&mut self, filters: DocumentFilters) -> bool {
        if self.filters == filters {
            return false;
        }
        self.filters = filters;
        self.page = 1;
        true
    }

    /// Drop every filter.
    pub fn clear_filters(&mut self) -> bool {
        self.set_filters(DocumentFilters::default())
    }

    /// Jump to `page` (clamped to at least 1). Returns whether it changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        let changed = self.page != page;
        self.page = page;
        changed
    }

    /// Advance one page when the loaded result has a next page.
    pub fn next_page(&mut self) -> bool {
        match &self.state {
            ListState::Loaded(list) if list.has_next() => self.set_page(self.page + 1),
            _ => false,
        }
    }

    /// Go back one page when not on the first.
    pub fn previous_page(&mut self) -> bool {
        self.page > 1 && self.set_page(self.page - 1)
    }

    /// Query parameters for the current page and filters.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidDiscipline`] when the request must not be
    /// sent.
    pub fn params(&self) -> Result<DocumentListParams, FilterError> {
        self.filters.to_params(self.page, self.page_size)
    }

    /// Request the current page unless the filters are invalid.
    pub async fn load<A: DocumentsApi + ?Sized>(&mut self, api: &A) -> &ListState {
        self.state = match self.params() {
            Err(err) => {
                debug!(error = %err, "list request blocked by invalid filters");
                ListState::Invalid(err)
            }
            Ok(params) => match api.list_documents(&params).await {
                Ok(list) => ListState::Loaded(list),
                Err(err) => ListState::Failed(err),
            },
        };
        &self.state
    }

    /// Render the latest outcome.
    #[must_use]
    pub fn render(&self, options: RenderOptions) -> String {
        let mut output = format!("filters: {}\n", self.filters.summary());
        match &self.state {
            ListState::Idle => output.push_str("Loading documents...\n"),
            ListState::Invalid(_) => {
                if let Some(hint) = self.filters.hint() {
                    if options.color {
                        output.push_str(&hint.yellow().to_string());
                    } else {
                        output.push_str(hint);
                    }
                    output.push('\n');
                }
            }
            ListState::Loaded(list) => output.push_str(&render_list(list, options)),
            ListState::Failed(err) => output.push_str(&render_error("documents", err, options.color)),
        }
        output
    }
}

/// `YYYY-MM-DD HH:MM` in UTC when `raw` parses, otherwise `raw` unchanged.
#[must_use]
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw).map_or_else(
        || raw.to_string(),
        |date| date.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Stats line, table and, when there is more than one page, a footer.
#[must_use]
pub fn render_list(list: &DocumentListResponse, options: RenderOptions) -> String {
    let total_pages = list.total_pages().max(1);
    let mut output = format!(
        "{} documents | page {} / {} | {} per page\n",
        list.total, list.page, total_pages, list.page_size
    );

    if list.documents.is_empty() {
        output.push('\n');
        output.push_str(EMPTY_STATE);
        output.push('\n');
    } else {
        output.push_str(&render_table(&list.documents, options));
    }

    if list.is_paginated() {
        let previous = if list.has_previous() { "< prev" } else { "      " };
        let next = if list.has_next() { "next >" } else { "" };
        output.push_str(&format!(
            "\n{previous}  Page {} of {total_pages}  {next}\n",
            list.page
        ));
    }
    output
}

/// Table of documents with a header row; nothing for an empty slice.
#[must_use]
pub fn render_table(documents: &[OdfDocument], options: RenderOptions) -> String {
    if documents.is_empty() {
        return String::new();
    }
    let rows: Vec<[String; 5]> = documents.iter().map(row).collect();
    let mut widths = HEADERS.map(str::len);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = join_padded(&HEADERS.map(str::to_string), &widths);
    let mut output = if options.color {
        header.bold().to_string()
    } else {
        header
    };
    output.push('\n');
    for cells in &rows {
        let line = join_padded(cells, &widths);
        if options.color {
            let (code, rest) = line.split_at(cells[0].len());
            output.push_str(&code.cyan().to_string());
            output.push_str(rest);
        } else {
            output.push_str(&line);
        }
        output.push('\n');
    }
    output
}

fn row(document: &OdfDocument) -> [String; 5] {
    [
        document.document_code.clone(),
        document.type_label(),
        format!("v{}", document.version),
        format_date(&document.date),
        document.id.clone(),
    ]
}

fn join_padded(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let mut line = String::new();
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if index + 1 == cells.len() {
            line.push_str(cell);
        } else {
            let padding = width.saturating_sub(cell.chars().count());
            line.push_str(cell);
            line.push_str(&" ".repeat(padding + 2));
        }
    }
    line.trim_end().to_string()
}
