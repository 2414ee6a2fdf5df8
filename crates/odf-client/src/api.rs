//! The seam between views and the documents API.

use async_trait::async_trait;
use odf_api_models::{
    DisciplineListResponse, DocumentComparison, DocumentListParams, DocumentListResponse,
    OdfDocument,
};
use serde_json::Value;

use crate::error::ApiResult;

/// Read operations offered by the documents API.
#[async_trait]
pub trait DocumentsApi: Send + Sync {
    /// Fetch one page of documents matching `params`.
    async fn list_documents(&self, params: &DocumentListParams) -> ApiResult<DocumentListResponse>;
    /// Fetch a single document.
    async fn get_document(&self, id: &str) -> ApiResult<OdfDocument>;
    /// Fetch the backend's structured representation of a document.
    async fn get_parsed_content(&self, id: &str) -> ApiResult<Value>;
    /// Fetch every document published under `document_code`.
    async fn find_by_document_code(&self, document_code: &str) -> ApiResult<Vec<OdfDocument>>;
    /// Fetch the raw content of two documents.
    async fn compare(&self, first_id: &str, second_id: &str) -> ApiResult<DocumentComparison>;
    /// Fetch the disciplines known to the backend.
    async fn list_disciplines(&self) -> ApiResult<DisciplineListResponse>;
}
