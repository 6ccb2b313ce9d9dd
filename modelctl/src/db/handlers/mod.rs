//! Repository implementations for database access.
//!
//! This module provides repository structs for each major entity in the system.
//! Repositories follow a consistent pattern and implement the [`Repository`] trait.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed CRUD operations
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//! - Uses the connection's transaction for ACID guarantees
//!
//! # Common Pattern
//!
//! All repositories follow this usage pattern:
//!
//! ```ignore
//! use modelctl::db::handlers::{ApiKeys, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = ApiKeys::new(&mut conn);
//!     let page = repo.list(&Default::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod api_keys;
pub mod models;
pub mod paging;
pub mod repository;

pub use api_keys::ApiKeys;
pub use models::Models;
pub use repository::{Page, Repository};
