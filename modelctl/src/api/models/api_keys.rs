//! API request/response models for API keys.

use crate::crypto::mask_secret;
use crate::db::models::api_keys::{ApiKeyCreateDBRequest, ApiKeyDBResponse, ApiKeyUpdateDBRequest};
use crate::types::ApiKeyId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// API Key request models.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyCreate {
    pub name: String,
}

// API Key update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyUpdate {
    pub name: Option<String>,
}

/// Query parameters for fetching a single key.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct GetApiKeyQuery {
    /// Return the secret token verbatim instead of the masked form
    #[param(default = false)]
    pub plain: Option<bool>,
}

/// Resource-specific list filters, flattened alongside the shared
/// pagination parameters in the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ApiKeySearchQuery {
    /// Case-insensitive substring match on the key id
    pub id_search: Option<String>,
    /// Case-insensitive substring match on the key name
    pub name_search: Option<String>,
}

// API Key response models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyResponse {
    pub apikey_id: ApiKeyId,
    /// The secret token; full only on create or `plain=true` gets
    pub apikey: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ApiKeyResponse {
    /// Response revealing the token verbatim
    pub fn plain(db: ApiKeyDBResponse) -> Self {
        Self {
            apikey_id: db.id,
            apikey: db.token,
            name: db.name,
            created_at: db.created_at,
        }
    }

    /// Response with the token masked for display
    pub fn masked(db: ApiKeyDBResponse) -> Self {
        Self {
            apikey: mask_secret(&db.token),
            apikey_id: db.id,
            name: db.name,
            created_at: db.created_at,
        }
    }
}

impl From<ApiKeyCreate> for ApiKeyCreateDBRequest {
    fn from(create: ApiKeyCreate) -> Self {
        Self { name: create.name }
    }
}

impl From<ApiKeyUpdate> for ApiKeyUpdateDBRequest {
    fn from(update: ApiKeyUpdate) -> Self {
        Self { name: update.name }
    }
}
