//! `DocumentsApi` decorator routing every call through a [`QueryCache`].

use std::sync::Arc;

use async_trait::async_trait;
use odf_api_models::{
    DisciplineListResponse, DocumentComparison, DocumentListParams, DocumentListResponse,
    OdfDocument,
};
use serde_json::Value;

use crate::api::DocumentsApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::ApiResult;

/// Cached view of an inner [`DocumentsApi`].
pub struct CachedDocuments<A> {
    api: A,
    cache: Arc<QueryCache>,
}

impl<A: DocumentsApi> CachedDocuments<A> {
    /// Wrap `api`, storing results in `cache`.
    pub const fn new(api: A, cache: Arc<QueryCache>) -> Self {
        Self { api, cache }
    }

    /// Shared cache, for invalidation.
    #[must_use]
    pub const fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Uncached API.
    #[must_use]
    pub const fn inner(&self) -> &A {
        &self.api
    }
}

#[async_trait]
impl<A: DocumentsApi> DocumentsApi for CachedDocuments<A> {
    async fn list_documents(&self, params: &DocumentListParams) -> ApiResult<DocumentListResponse> {
        let api = &self.api;
        self.cache
            .fetch(QueryKey::list(params), move || api.list_documents(params))
            .await
    }

    async fn get_document(&self, id: &str) -> ApiResult<OdfDocument> {
        let api = &self.api;
        self.cache
            .fetch(QueryKey::detail(id), move || api.get_document(id))
            .await
    }

    async fn get_parsed_content(&self, id: &str) -> ApiResult<Value> {
        let api = &self.api;
        self.cache
            .fetch(QueryKey::parsed(id), move || api.get_parsed_content(id))
            .await
    }

    async fn find_by_document_code(&self, document_code: &str) -> ApiResult<Vec<OdfDocument>> {
        let api = &self.api;
        self.cache
            .fetch(QueryKey::document_code(document_code), move || {
                api.find_by_document_code(document_code)
            })
            .await
    }

    async fn compare(&self, first_id: &str, second_id: &str) -> ApiResult<DocumentComparison> {
        let api = &self.api;
        self.cache
            .fetch(QueryKey::compare(first_id, second_id), move || {
                api.compare(first_id, second_id)
            })
            .await
    }

    async fn list_disciplines(&self) -> ApiResult<DisciplineListResponse> {
        let api = &self.api;
        self.cache
            .fetch(QueryKey::disciplines(), move || api.list_disciplines())
            .await
    }
}
