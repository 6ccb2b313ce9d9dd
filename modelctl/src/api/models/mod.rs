//! API request and response data models.
//!
//! This module contains the data structures used for HTTP request
//! deserialization and response serialization. These models define the public
//! API contract.
//!
//! # Design Principles
//!
//! - **Separation of Concerns**: API models are distinct from database models,
//!   allowing independent evolution of API and storage representations
//! - **Validation**: Models use serde for deserialization; cross-field rules
//!   (pagination combinations, immutable fields) are checked explicitly
//! - **OpenAPI**: All models are annotated with `utoipa` for automatic API docs
//!
//! # Modules
//!
//! - [`api_keys`]: API key payloads (secrets are masked outside create/plain)
//! - [`models`]: Model configuration payloads (credentials always masked)
//! - [`envelope`]: The uniform success envelopes
//! - [`pagination`]: Shared list-query parameters and their validation

pub mod api_keys;
pub mod envelope;
pub mod models;
pub mod pagination;
