//! API request/response models for model configurations.
//!
//! Credential plaintext exists only inside a request's lifetime: create and
//! update payloads are encrypted before they reach the repository, and
//! responses always carry `display_credentials` with every value masked.

use crate::crypto::{decrypt_with_env_key, encrypt_with_env_key, mask_secret};
use crate::db::models::models::{ModelDBResponse, ModelUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::schemas::ModelSchema;
use crate::types::ModelId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

// Model request models.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelCreate {
    pub name: String,
    /// Id of a schema from the catalog; fixes provider and type permanently
    pub model_schema_id: String,
    /// JSON object of credential fields, stored encrypted
    #[schema(value_type = Object)]
    pub credentials: Value,
}

// Model update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ModelUpdate {
    pub name: Option<String>,
    /// Immutable; accepted only when it matches the stored value
    pub model_schema_id: Option<String>,
    /// Replacement credential object, stored encrypted
    #[schema(value_type = Option<Object>)]
    pub credentials: Option<Value>,
}

/// Resource-specific list filters, flattened alongside the shared
/// pagination parameters in the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ModelSearchQuery {
    /// Case-insensitive substring match on the model id
    pub id_search: Option<String>,
    /// Case-insensitive substring match on the model name
    pub name_search: Option<String>,
    /// Exact match on the provider derived from the schema
    pub provider_id: Option<String>,
    /// Exact match on the model type (`chat`, `completion`, `embedding`)
    #[serde(rename = "type")]
    pub model_type: Option<String>,
}

// Model response models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelResponse {
    pub model_id: ModelId,
    pub name: String,
    pub model_schema_id: String,
    pub provider_id: String,
    pub model_type: String,
    /// Credential object with every value masked
    #[schema(value_type = Object)]
    pub display_credentials: Value,
    pub created_at: DateTime<Utc>,
}

impl ModelResponse {
    /// Build a response from a stored row, masking the credentials.
    pub fn from_db(db: ModelDBResponse) -> Result<Self> {
        let display_credentials = display_credentials(&db.credentials)?;
        Ok(Self {
            model_id: db.id,
            name: db.name,
            model_schema_id: db.model_schema_id,
            provider_id: db.provider_id,
            model_type: db.model_type,
            display_credentials,
            created_at: db.created_at,
        })
    }
}

impl ModelCreate {
    /// Validate the credentials payload and encrypt it, deriving the stored
    /// columns from the catalog schema.
    pub fn into_db_request(self, schema: &ModelSchema) -> Result<crate::db::models::models::ModelCreateDBRequest> {
        let credentials = encrypt_credentials(&self.credentials)?;
        Ok(crate::db::models::models::ModelCreateDBRequest {
            name: self.name,
            model_schema_id: schema.id.to_string(),
            provider_id: schema.provider_id.to_string(),
            model_type: schema.model_type.as_str().to_string(),
            credentials,
        })
    }
}

impl ModelUpdate {
    /// Encrypt the replacement credentials, if any. The immutability check on
    /// `model_schema_id` happens in the handler where the stored row is known.
    pub fn into_db_request(self) -> Result<ModelUpdateDBRequest> {
        let credentials = match &self.credentials {
            Some(value) => Some(encrypt_credentials(value)?),
            None => None,
        };
        Ok(ModelUpdateDBRequest {
            name: self.name,
            credentials,
        })
    }
}

/// Validate that credentials are a JSON object and encrypt them for storage.
pub fn encrypt_credentials(credentials: &Value) -> Result<String> {
    if !credentials.is_object() {
        return Err(Error::Validation {
            message: "credentials must be a JSON object".to_string(),
        });
    }
    let plaintext = serde_json::to_vec(credentials).map_err(|e| Error::Other(e.into()))?;
    encrypt_with_env_key(&plaintext).map_err(Error::Other)
}

/// Decrypt a stored credentials blob and mask every value for display.
fn display_credentials(encrypted: &str) -> Result<Value> {
    let plaintext = decrypt_with_env_key(encrypted).map_err(Error::Other)?;
    let credentials: Value = serde_json::from_slice(&plaintext).map_err(|e| Error::Other(e.into()))?;

    let masked = match credentials {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| {
                let masked = match value {
                    Value::String(s) => Value::String(mask_secret(&s)),
                    _ => Value::String("****".to_string()),
                };
                (key, masked)
            })
            .collect(),
        // Stored blobs are always objects; anything else masks entirely
        _ => serde_json::Map::new(),
    };

    Ok(Value::Object(masked))
}
