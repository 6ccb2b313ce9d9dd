//! Base repository trait for database operations.

/// Contains the Repository trait.
///
/// A repository is basically a data access layer for a postgres table. It
/// provides methods for creating, reading, updating, and deleting entities, as
/// well as listing them with pagination filters.
use crate::db::errors::Result;

/// One page of results from a [`Repository::list`] call.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The rows on this page, in the requested order
    pub items: Vec<T>,
    /// Count of rows matching the filters, ignoring pagination
    pub total_count: i64,
    /// Whether more rows exist beyond this page in the requested direction
    pub has_more: bool,
}

/// Base repository trait providing common database operations
///
/// This trait has separate associated types for create requests, update requests, and responses.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The request type for updating entities
    type UpdateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity. When `max_count` is positive, the insert is
    /// refused with [`crate::db::errors::DbError::LimitReached`] once the
    /// table already holds that many rows. The count and insert run under a
    /// per-table advisory lock, so concurrent creates cannot slip past the
    /// limit between the check and the insert.
    async fn create(&mut self, request: &Self::CreateRequest, max_count: i64) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&mut self, id: &Self::Id) -> Result<Option<Self::Response>>;

    /// List entities with filtering and pagination
    async fn list(&mut self, filter: &Self::Filter) -> Result<Page<Self::Response>>;

    /// Delete an entity by ID
    async fn delete(&mut self, id: &Self::Id) -> Result<bool>;

    /// Update an entity by ID
    async fn update(&mut self, id: &Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response>;
}
