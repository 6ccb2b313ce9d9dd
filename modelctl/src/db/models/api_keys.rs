//! Database models for API keys.

use crate::types::ApiKeyId;
use chrono::{DateTime, Utc};

/// Database request for creating a new API key
#[derive(Debug, Clone)]
pub struct ApiKeyCreateDBRequest {
    pub name: String,
}

/// Database request for updating an API key
#[derive(Debug, Clone, Default)]
pub struct ApiKeyUpdateDBRequest {
    pub name: Option<String>,
}

/// Database response for an API key
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKeyDBResponse {
    pub id: ApiKeyId,
    pub name: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}
