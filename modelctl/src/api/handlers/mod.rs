//! HTTP request handlers for all API endpoints.
//!
//! This module contains Axum route handlers organized by resource type.
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Business logic execution via database repositories
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`api_keys`]: API key CRUD with token masking and quota enforcement
//! - [`health`]: Unauthenticated liveness endpoint
//! - [`models`]: Model configuration CRUD with encrypted credentials
//!
//! # Authentication
//!
//! Everything under `/api/v1` sits behind the admin bearer token middleware
//! in [`crate::auth::middleware`]. The health endpoint and API docs do not.
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which automatically converts to
//! appropriate HTTP status codes and JSON error envelopes.

pub mod api_keys;
pub mod health;
pub mod models;
