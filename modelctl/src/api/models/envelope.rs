//! Uniform response envelopes.
//!
//! Every endpoint wraps its payload the same way: single items in a `data`
//! envelope, collections in a list envelope with paging metadata, deletes in
//! an empty envelope. Errors use the mirror-image shape produced by
//! [`crate::errors::Error`]'s `IntoResponse`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn success() -> String {
    "success".to_string()
}

/// Envelope for a single resource
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DataResponse<T> {
    #[serde(default = "success")]
    #[schema(example = "success")]
    pub status: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: success(),
            data,
        }
    }
}

/// Envelope for a page of resources
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    #[serde(default = "success")]
    #[schema(example = "success")]
    pub status: String,
    pub data: Vec<T>,
    /// Number of items on this page
    pub fetched_count: i64,
    /// Number of items matching the filters, ignoring pagination
    pub total_count: i64,
    /// Whether more items exist beyond this page in the requested direction
    pub has_more: bool,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, total_count: i64, has_more: bool) -> Self {
        Self {
            status: success(),
            fetched_count: data.len() as i64,
            data,
            total_count,
            has_more,
        }
    }
}

/// Envelope carrying no payload, returned by deletes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmptyResponse {
    #[serde(default = "success")]
    #[schema(example = "success")]
    pub status: String,
}

impl EmptyResponse {
    pub fn new() -> Self {
        Self { status: success() }
    }
}

impl Default for EmptyResponse {
    fn default() -> Self {
        Self::new()
    }
}
