//! Keyset pagination helpers shared by the repositories.
//!
//! List queries sort on the compound key `(created_at, id)`; the id tie-break
//! makes the order total even when rows share a timestamp. Cursors name an
//! existing row id and page strictly past its position with a row-value
//! comparison, so pages stay stable while neighbouring rows come and go.

use crate::api::models::pagination::{Cursor, Pagination, SortOrder};
use crate::db::errors::{DbError, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Postgres, QueryBuilder};

/// Sort-key position of a cursor row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CursorRow {
    pub created_at: DateTime<Utc>,
    pub id: String,
}

/// A cursor resolved to its row position plus the paging direction.
#[derive(Debug, Clone)]
pub struct ResolvedCursor {
    pub row: CursorRow,
    /// True for `before` cursors, false for `after`
    pub backwards: bool,
}

/// Look up the sort-key position of the row a cursor names.
///
/// `table` must be a trusted, compile-time table name; only the cursor id is
/// bound as a parameter. Unknown ids fail with [`DbError::InvalidCursor`].
pub async fn resolve_cursor(db: &mut PgConnection, table: &str, cursor: &Cursor) -> Result<ResolvedCursor> {
    let (id, backwards) = match cursor {
        Cursor::After(id) => (id, false),
        Cursor::Before(id) => (id, true),
    };

    let row = sqlx::query_as::<_, CursorRow>(&format!("SELECT created_at, id FROM {table} WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *db)
        .await?
        .ok_or_else(|| DbError::InvalidCursor { cursor: id.clone() })?;

    Ok(ResolvedCursor { row, backwards })
}

/// Append the cursor comparison, ORDER BY, LIMIT and OFFSET clauses to a
/// list query whose WHERE conditions have already been pushed.
///
/// Fetches one row more than `limit` so the caller can derive `has_more`;
/// use [`finish_page`] to trim the overshoot. A `before` cursor scans in the
/// reversed direction (nearest rows first), which `finish_page` undoes.
pub fn push_page_clauses(
    qb: &mut QueryBuilder<'_, Postgres>,
    pagination: &Pagination,
    resolved: Option<&ResolvedCursor>,
) {
    // Scan direction flips for before-cursors so LIMIT keeps the rows
    // adjacent to the cursor rather than the far end of the table.
    let ascending = match resolved {
        Some(r) => (pagination.order == SortOrder::Asc) != r.backwards,
        None => pagination.order == SortOrder::Asc,
    };

    if let Some(r) = resolved {
        let op = if ascending { ">" } else { "<" };
        qb.push(format!(" AND (created_at, id) {op} ("));
        qb.push_bind(r.row.created_at);
        qb.push(", ");
        qb.push_bind(r.row.id.clone());
        qb.push(")");
    }

    let dir = if ascending { "ASC" } else { "DESC" };
    qb.push(format!(" ORDER BY created_at {dir}, id {dir} LIMIT "));
    qb.push_bind(pagination.limit + 1);
    if pagination.offset > 0 {
        qb.push(" OFFSET ");
        qb.push_bind(pagination.offset);
    }
}

/// Trim the has-more overshoot row and restore the requested order for pages
/// that were scanned backwards. Returns the page items and the has_more flag.
pub fn finish_page<T>(mut rows: Vec<T>, pagination: &Pagination, resolved: Option<&ResolvedCursor>) -> (Vec<T>, bool) {
    let has_more = rows.len() as i64 > pagination.limit;
    rows.truncate(pagination.limit as usize);

    if resolved.is_some_and(|r| r.backwards) {
        rows.reverse();
    }

    (rows, has_more)
}

/// Escape a user-supplied search term for use inside an ILIKE pattern and
/// wrap it for substring matching.
pub fn like_pattern(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}
