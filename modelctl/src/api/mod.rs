//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **API keys** (`/api/v1/apikeys/*`): Key issuance, masking, revocation
//! - **Models** (`/api/v1/models/*`): Model configurations and credentials
//! - **Health** (`/health`): Unauthenticated liveness check
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/docs` when the server is running.

pub mod handlers;
pub mod models;
