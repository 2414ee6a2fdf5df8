//! `reqwest` implementation of the documents API.

use std::time::Duration;

use async_trait::async_trait;
use odf_api_models::{
    DisciplineListResponse, DocumentComparison, DocumentListParams, DocumentListResponse,
    OdfDocument,
};
use odf_config::ClientConfig;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::api::DocumentsApi;
use crate::error::{ApiError, ApiResult};

/// Header carrying the per-process request identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

const DOCUMENTS_ROOT: &str = "odf-documents";

/// Client for the `/odf-documents` endpoints.
#[derive(Debug, Clone)]
pub struct OdfClient {
    http: Client,
    base_url: Url,
}

impl OdfClient {
    /// Build a client from configuration, tagging every request with
    /// `request_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when `request_id` is not a valid header
    /// value and [`ApiError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, request_id: &str) -> ApiResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(request_id).map_err(|_| ApiError::InvalidUrl {
            message: "request identifier contains invalid characters".to_string(),
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(10)))
            .default_headers(default_headers)
            .build()
            .map_err(|err| ApiError::Transport {
                message: format!("failed to build HTTP client: {err}"),
            })?;

        Ok(Self::with_http(http, config.api_url.clone()))
    }

    /// Wrap an existing HTTP client.
    #[must_use]
    pub const fn with_http(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of `/odf-documents/<segments…>`; each segment is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                message: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .push(DOCUMENTS_ROOT)
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let path = url.path().to_string();
        debug!(%path, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| ApiError::from_transport(&err, &path))?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::from_transport(&err, &path))?;
        serde_json::from_slice(&bytes).map_err(|err| {
            tracing::error!(%path, error = %err, "response body did not match the expected shape");
            ApiError::Decode {
                path,
                message: err.to_string(),
            }
        })
    }
}

#[async_trait]
impl DocumentsApi for OdfClient {
    #[instrument(skip(self), level = "debug")]
    async fn list_documents(&self, params: &DocumentListParams) -> ApiResult<DocumentListResponse> {
        let mut url = self.endpoint(&[])?;
        let pairs = params.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        self.get_json(url).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_document(&self, id: &str) -> ApiResult<OdfDocument> {
        self.get_json(self.endpoint(&[id])?).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_parsed_content(&self, id: &str) -> ApiResult<Value> {
        self.get_json(self.endpoint(&[id, "parsed"])?).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn find_by_document_code(&self, document_code: &str) -> ApiResult<Vec<OdfDocument>> {
        self.get_json(self.endpoint(&["document-code", document_code])?)
            .await
    }

    #[instrument(skip(self), level = "debug")]
    async fn compare(&self, first_id: &str, second_id: &str) -> ApiResult<DocumentComparison> {
        self.get_json(self.endpoint(&["compare", first_id, second_id])?)
            .await
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_disciplines(&self) -> ApiResult<DisciplineListResponse> {
        self.get_json(self.endpoint(&["disciplines"])?).await
    }
}
