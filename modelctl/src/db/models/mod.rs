//! Database record models matching table schemas.
//!
//! This module contains struct definitions that directly correspond to database
//! table rows. These models are used by repositories to return query results
//! and accept insertion/update data.
//!
//! # Design Principles
//!
//! - **Schema Mapping**: Each model struct matches a database table schema
//! - **SQLx Integration**: Models derive `sqlx::FromRow` for query results
//! - **Separation**: Database models are distinct from API models to allow
//!   independent evolution of storage and API representations
//!
//! # Conversion to API Models
//!
//! API models own the conversion, because it is where secret handling
//! happens (token masking, credential decryption):
//!
//! ```ignore
//! use modelctl::db::models::api_keys::ApiKeyDBResponse;
//! use modelctl::api::models::api_keys::ApiKeyResponse;
//!
//! let db_key: ApiKeyDBResponse = /* ... */;
//! let api_response = ApiKeyResponse::masked(db_key);
//! ```

pub mod api_keys;
pub mod models;
