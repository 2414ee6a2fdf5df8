//! Scripted in-memory [`DocumentsApi`] for tests of code built on the client.
//!
//! Enabled with the `test-util` feature.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use odf_api_models::{
    ComparedDocument, DisciplineListResponse, DocumentComparison, DocumentListParams,
    DocumentListResponse, OdfDocument,
};
use serde_json::Value;

use crate::api::DocumentsApi;
use crate::error::{ApiError, ApiResult};

/// One call observed by [`ScriptedApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// `list_documents` with its parameters.
    List(DocumentListParams),
    /// `get_document`.
    Document(String),
    /// `get_parsed_content`.
    Parsed(String),
    /// `find_by_document_code`.
    DocumentCode(String),
    /// `compare`.
    Compare(String, String),
    /// `list_disciplines`.
    Disciplines,
}

/// Canned responses plus a log of every call made.
///
/// Unknown ids answer with a 404 carrying the backend's message format.
#[derive(Debug)]
pub struct ScriptedApi {
    list: ApiResult<DocumentListResponse>,
    documents: HashMap<String, OdfDocument>,
    parsed: HashMap<String, Value>,
    disciplines: Vec<String>,
    delay: Duration,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for ScriptedApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedApi {
    /// Script with an empty list and no documents.
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: Ok(DocumentListResponse {
                page_size: 20,
                ..DocumentListResponse::default()
            }),
            documents: HashMap::new(),
            parsed: HashMap::new(),
            disciplines: Vec::new(),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer list requests with `response`; its documents also become
    /// available by id.
    #[must_use]
    pub fn with_list(mut self, response: DocumentListResponse) -> Self {
        for document in &response.documents {
            self.documents
                .insert(document.id.clone(), document.clone());
        }
        self.list = Ok(response);
        self
    }

    /// Fail list requests with `err`.
    #[must_use]
    pub fn with_list_error(mut self, err: ApiError) -> Self {
        self.list = Err(err);
        self
    }

    /// Make `document` available by id and by document code.
    #[must_use]
    pub fn with_document(mut self, document: OdfDocument) -> Self {
        self.documents.insert(document.id.clone(), document);
        self
    }

    /// Parsed representation served for `id`.
    #[must_use]
    pub fn with_parsed(mut self, id: &str, value: Value) -> Self {
        self.parsed.insert(id.to_string(), value);
        self
    }

    /// Disciplines served by `list_disciplines`.
    #[must_use]
    pub fn with_disciplines(mut self, disciplines: &[&str]) -> Self {
        self.disciplines = disciplines.iter().map(ToString::to_string).collect();
        self
    }

    /// Delay applied before every answer.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every call made so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock_calls().clone()
    }

    /// Parameters of every list call made so far.
    #[must_use]
    pub fn list_calls(&self) -> Vec<DocumentListParams> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::List(params) => Some(params.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn record(&self, call: RecordedCall) {
        self.lock_calls().push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn document(&self, id: &str) -> ApiResult<OdfDocument> {
        self.documents
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(&format!("Document {id} not found")))
    }
}

fn not_found(message: &str) -> ApiError {
    let body = serde_json::json!({
        "message": message,
        "error": "Not Found",
        "statusCode": 404,
    });
    ApiError::from_status(404, body.to_string().as_bytes())
}

#[async_trait]
impl DocumentsApi for ScriptedApi {
    async fn list_documents(&self, params: &DocumentListParams) -> ApiResult<DocumentListResponse> {
        self.record(RecordedCall::List(params.clone())).await;
        let mut response = self.list.clone()?;
        if let Some(page) = params.page {
            response.page = page;
        }
        Ok(response)
    }

    async fn get_document(&self, id: &str) -> ApiResult<OdfDocument> {
        self.record(RecordedCall::Document(id.to_string())).await;
        self.document(id)
    }

    async fn get_parsed_content(&self, id: &str) -> ApiResult<Value> {
        self.record(RecordedCall::Parsed(id.to_string())).await;
        self.parsed
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(&format!("Document {id} not found")))
    }

    async fn find_by_document_code(&self, document_code: &str) -> ApiResult<Vec<OdfDocument>> {
        self.record(RecordedCall::DocumentCode(document_code.to_string()))
            .await;
        let mut matches: Vec<OdfDocument> = self
            .documents
            .values()
            .filter(|document| document.document_code == document_code)
            .cloned()
            .collect();
        matches.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(matches)
    }

    async fn compare(&self, first_id: &str, second_id: &str) -> ApiResult<DocumentComparison> {
        self.record(RecordedCall::Compare(
            first_id.to_string(),
            second_id.to_string(),
        ))
        .await;
        let side = |id: &str| {
            self.document(id).map(|document| ComparedDocument {
                id: document.id,
                xml_content: document.content,
            })
        };
        Ok(DocumentComparison {
            document1: side(first_id)?,
            document2: side(second_id)?,
        })
    }

    async fn list_disciplines(&self) -> ApiResult<DisciplineListResponse> {
        self.record(RecordedCall::Disciplines).await;
        Ok(DisciplineListResponse {
            disciplines: self.disciplines.clone(),
        })
    }
}
