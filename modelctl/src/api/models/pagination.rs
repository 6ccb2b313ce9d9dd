//! Shared pagination types for API query parameters.
//!
//! All list endpoints accept the same pagination surface: a `limit`, a sort
//! `order` over `(created_at, id)`, and either an `offset` or one of the
//! `after`/`before` cursors. Cursors name the id of an existing row and page
//! relative to its position. Invalid combinations are rejected up front with a
//! validation error rather than silently clamped.

use crate::errors::{Error, Result};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Default number of items to return per page.
pub const DEFAULT_LIMIT: i64 = 20;

/// Maximum number of items that can be requested per page.
pub const MAX_LIMIT: i64 = 100;

/// Sort direction over `(created_at, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Cursor position relative to a named row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// Page strictly after the named row, in sort order
    After(String),
    /// Page strictly before the named row, in sort order
    Before(String),
}

/// Raw pagination query parameters as received from the client.
///
/// Call [`PaginationParams::validate`] to turn these into a [`Pagination`];
/// all range and exclusivity checks happen there.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    /// Maximum number of items to return (default: 20, max: 100)
    #[param(default = 20, minimum = 1, maximum = 100)]
    pub limit: Option<i64>,

    /// Sort direction over creation time (default: desc)
    pub order: Option<SortOrder>,

    /// Id of an existing entry; returns the page after it
    pub after: Option<String>,

    /// Id of an existing entry; returns the page before it
    pub before: Option<String>,

    /// Number of items to skip from the start of the result set
    #[param(default = 0, minimum = 0)]
    pub offset: Option<i64>,
}

/// Validated pagination settings consumed by the repositories.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub limit: i64,
    pub order: SortOrder,
    pub cursor: Option<Cursor>,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            order: SortOrder::default(),
            cursor: None,
            offset: 0,
        }
    }
}

impl PaginationParams {
    /// Validate the raw parameters.
    ///
    /// Rejects with a validation error when:
    /// - `limit` is outside `1..=100`
    /// - both `after` and `before` are supplied
    /// - `offset` is combined with either cursor
    /// - `offset` is negative
    pub fn validate(&self) -> Result<Pagination> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(Error::Validation {
                message: format!("limit must be between 1 and {MAX_LIMIT}, got {limit}"),
            });
        }

        let cursor = match (&self.after, &self.before) {
            (Some(_), Some(_)) => {
                return Err(Error::Validation {
                    message: "after and before cannot be combined".to_string(),
                });
            }
            (Some(after), None) => Some(Cursor::After(after.clone())),
            (None, Some(before)) => Some(Cursor::Before(before.clone())),
            (None, None) => None,
        };

        if cursor.is_some() && self.offset.is_some() {
            return Err(Error::Validation {
                message: "offset cannot be combined with a cursor".to_string(),
            });
        }

        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(Error::Validation {
                message: format!("offset must be non-negative, got {offset}"),
            });
        }

        Ok(Pagination {
            limit,
            order: self.order.unwrap_or_default(),
            cursor,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let p = PaginationParams::default().validate().expect("defaults are valid");
        assert_eq!(p.limit, DEFAULT_LIMIT);
        assert_eq!(p.order, SortOrder::Desc);
        assert_eq!(p.cursor, None);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_limit_bounds() {
        for bad in [0, -5, 101, 1000] {
            let params = PaginationParams {
                limit: Some(bad),
                ..Default::default()
            };
            assert!(params.validate().is_err(), "limit {bad} should be rejected");
        }

        for good in [1, 50, 100] {
            let params = PaginationParams {
                limit: Some(good),
                ..Default::default()
            };
            assert_eq!(params.validate().expect("valid limit").limit, good);
        }
    }

    #[test]
    fn test_both_cursors_rejected() {
        let params = PaginationParams {
            after: Some("a".to_string()),
            before: Some("b".to_string()),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_offset_with_cursor_rejected() {
        let params = PaginationParams {
            after: Some("a".to_string()),
            offset: Some(10),
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = PaginationParams {
            before: Some("b".to_string()),
            offset: Some(0),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_negative_offset_rejected() {
        let params = PaginationParams {
            offset: Some(-1),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_cursor_selection() {
        let params = PaginationParams {
            after: Some("row1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.validate().expect("valid").cursor,
            Some(Cursor::After("row1".to_string()))
        );

        let params = PaginationParams {
            before: Some("row2".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.validate().expect("valid").cursor,
            Some(Cursor::Before("row2".to_string()))
        );
    }

    #[test]
    fn test_order_parsing() {
        let params: PaginationParams = serde_urlencoded::from_str("order=asc&limit=5").expect("should parse");
        let p = params.validate().expect("valid");
        assert_eq!(p.order, SortOrder::Asc);
        assert_eq!(p.limit, 5);
    }
}
