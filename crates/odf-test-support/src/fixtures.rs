//! Sample documents and API responses.

use odf_api_models::{ComparedDocument, DocumentComparison, DocumentListResponse, OdfDocument};

/// Minified ODF result document, as the feed delivers it.
pub const MINIFIED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?><OdfBody CompetitionCode="OG2024" DocumentCode="SWMMFREESTY---------FNL-000100--" DocumentType="DT_RESULT" Version="3"><Competition><Result Rank="1" SortOrder="1"><Competitor Code="1001" Type="A"/></Result></Competition></OdfBody>"#;

/// Same document as [`MINIFIED_XML`] with a newer version and rank change.
pub const MINIFIED_XML_V4: &str = r#"<?xml version="1.0" encoding="UTF-8"?><OdfBody CompetitionCode="OG2024" DocumentCode="SWMMFREESTY---------FNL-000100--" DocumentType="DT_RESULT" Version="4"><Competition><Result Rank="2" SortOrder="2"><Competitor Code="1001" Type="A"/></Result></Competition></OdfBody>"#;

/// Document code shared by every sample.
pub const SAMPLE_DOCUMENT_CODE: &str = "SWMMFREESTY---------FNL-000100--";

/// XML result document with the given id.
#[must_use]
pub fn sample_document(id: &str) -> OdfDocument {
    OdfDocument {
        id: id.to_string(),
        competition_code: "OG2024".to_string(),
        document_code: SAMPLE_DOCUMENT_CODE.to_string(),
        document_type: "DT_RESULT".to_string(),
        document_subtype: None,
        version: "3".to_string(),
        date: "2024-07-28T19:42:05.000Z".to_string(),
        content: MINIFIED_XML.to_string(),
        result_status: Some("OFFICIAL".to_string()),
        unit_codes: Some(vec!["SWMMFREESTY---------FNL-000100--".to_string()]),
        content_hash: Some("9f2c1e".to_string()),
        created_at: "2024-07-28T19:42:06.000Z".to_string(),
        updated_at: "2024-07-28T19:42:06.000Z".to_string(),
    }
}

/// Document whose content is JSON rather than XML.
#[must_use]
pub fn sample_json_document(id: &str) -> OdfDocument {
    OdfDocument {
        document_type: "DT_SCHEDULE".to_string(),
        document_subtype: Some("UPDATE".to_string()),
        content: r#"{"schedule":{"units":[{"code":"U1","start":"09:00"}],"final":true}}"#
            .to_string(),
        result_status: None,
        ..sample_document(id)
    }
}

/// First page of a list holding `count` documents (`doc-1`…) out of `total`.
#[must_use]
pub fn sample_list(count: usize, total: u64) -> DocumentListResponse {
    DocumentListResponse {
        documents: (1..=count)
            .map(|index| sample_document(&format!("doc-{index}")))
            .collect(),
        total,
        page: 1,
        page_size: 20,
    }
}

/// Empty first page.
#[must_use]
pub fn empty_list() -> DocumentListResponse {
    sample_list(0, 0)
}

/// Comparison of two versions of the sample document.
#[must_use]
pub fn sample_comparison(first_id: &str, second_id: &str) -> DocumentComparison {
    DocumentComparison {
        document1: ComparedDocument {
            id: first_id.to_string(),
            xml_content: MINIFIED_XML.to_string(),
        },
        document2: ComparedDocument {
            id: second_id.to_string(),
            xml_content: MINIFIED_XML_V4.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_list_numbers_documents_from_one() {
        let list = sample_list(2, 42);
        let ids: Vec<_> = list.documents.iter().map(|doc| doc.id.as_str()).collect();
        assert_eq!(ids, vec!["doc-1", "doc-2"]);
        assert_eq!(list.total, 42);
        assert!(list.is_paginated());
    }

    #[test]
    fn json_sample_keeps_identity_fields() {
        let document = sample_json_document("j");
        assert_eq!(document.id, "j");
        assert!(document.content.starts_with('{'));
        assert_eq!(document.type_label(), "DT_SCHEDULE \u{2022} UPDATE");
    }
}
