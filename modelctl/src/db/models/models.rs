//! Database models for model configurations.
//!
//! The `credentials` column always holds the AES-GCM encrypted blob; plaintext
//! credentials never touch the database.

use crate::types::ModelId;
use chrono::{DateTime, Utc};

/// Database request for creating a new model configuration
#[derive(Debug, Clone)]
pub struct ModelCreateDBRequest {
    pub name: String,
    pub model_schema_id: String,
    pub provider_id: String,
    pub model_type: String,
    /// Encrypted credentials blob
    pub credentials: String,
}

/// Database request for updating a model configuration
#[derive(Debug, Clone, Default)]
pub struct ModelUpdateDBRequest {
    pub name: Option<String>,
    /// Encrypted credentials blob, when the caller supplied new credentials
    pub credentials: Option<String>,
}

/// Database response for a model configuration
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ModelDBResponse {
    pub id: ModelId,
    pub name: String,
    pub model_schema_id: String,
    pub provider_id: String,
    pub model_type: String,
    /// Encrypted credentials blob as stored
    pub credentials: String,
    pub created_at: DateTime<Utc>,
}
