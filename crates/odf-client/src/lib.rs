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

//! HTTP access to the ODF documents API.
//!
//! Layout:
//! - `error.rs`: `ApiError`, decoded once at the HTTP boundary and logged there
//! - `client.rs`: `OdfClient`, the `reqwest` implementation of the endpoints
//! - `api.rs`: `DocumentsApi`, the seam views depend on
//! - `cache.rs`: `QueryCache` with keys, freshness, retries and deduplication
//! - `cached.rs`: `CachedDocuments`, a `DocumentsApi` routed through the cache
//! - `testing.rs`: `ScriptedApi`, an in-memory fake behind the `test-util` feature

pub mod api;
pub mod cache;
pub mod cached;
pub mod client;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use api::DocumentsApi;
pub use cache::{Operation, QueryCache, QueryKey};
pub use cached::CachedDocuments;
pub use client::{HEADER_REQUEST_ID, OdfClient};
pub use error::{ApiError, ApiResult};
