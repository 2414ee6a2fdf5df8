//! Content sniffing and format dispatch.

use crate::json::render_json;
use crate::xml::render_xml;

/// Markup family of a document's raw content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// XML (declaration or ODF root element).
    Xml,
    /// Anything else is treated as JSON.
    Json,
}

impl ContentKind {
    /// Classify raw content by its leading XML declaration or ODF root element.
    #[must_use]
    pub fn detect(content: &str) -> Self {
        let trimmed = content.trim_start();
        if trimmed.starts_with("<?xml") || trimmed.starts_with("<OdfBody") {
            Self::Xml
        } else {
            Self::Json
        }
    }

    /// Short label used in view headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Xml => "XML",
            Self::Json => "JSON",
        }
    }
}

/// Format raw content for display according to its detected kind.
#[must_use]
pub fn format_content(content: &str) -> (ContentKind, String) {
    let kind = ContentKind::detect(content);
    let formatted = match kind {
        ContentKind::Xml => render_xml(content),
        ContentKind::Json => render_json(content),
    };
    (kind, formatted)
}
