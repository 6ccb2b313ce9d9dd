use crate::api::models::pagination::Pagination;
use crate::crypto::{generate_api_key_token, generate_id};
use crate::db::errors::DbError;
use crate::db::errors::Result;
use crate::db::handlers::paging::{finish_page, like_pattern, push_page_clauses, resolve_cursor};
use crate::db::handlers::repository::{Page, Repository};
use crate::db::models::api_keys::{ApiKeyCreateDBRequest, ApiKeyDBResponse, ApiKeyUpdateDBRequest};
use crate::types::{ApiKeyId, abbrev_id};
use sqlx::{Acquire, PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Advisory lock key serializing quota-checked creates on the api_keys table
const API_KEYS_CREATE_LOCK: i64 = 0x6d63_746c_0001;

const SELECT_COLUMNS: &str = "SELECT id, name, token, created_at FROM api_keys";

/// Filter for listing API keys
#[derive(Debug, Clone, Default)]
pub struct ApiKeyFilter {
    pub pagination: Pagination,
    pub id_search: Option<String>,
    pub name_search: Option<String>,
}

pub struct ApiKeys<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for ApiKeys<'c> {
    type CreateRequest = ApiKeyCreateDBRequest;
    type UpdateRequest = ApiKeyUpdateDBRequest;
    type Response = ApiKeyDBResponse;
    type Id = ApiKeyId;
    type Filter = ApiKeyFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest, max_count: i64) -> Result<Self::Response> {
        let id = generate_id();
        let token = generate_api_key_token(&id);

        let mut tx = self.db.begin().await?;

        if max_count > 0 {
            // The advisory lock serializes concurrent creates for the
            // duration of the transaction, so the count below cannot go
            // stale before the insert lands.
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(API_KEYS_CREATE_LOCK)
                .execute(&mut *tx)
                .await?;

            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM api_keys")
                .fetch_one(&mut *tx)
                .await?;

            if count >= max_count {
                return Err(DbError::LimitReached {
                    resource: "api_keys",
                    max_count,
                });
            }
        }

        sqlx::query("INSERT INTO api_keys (id, name, token) VALUES ($1, $2, $3)")
            .bind(&id)
            .bind(&request.name)
            .bind(&token)
            .execute(&mut *tx)
            .await?;

        // Read the row back so the response carries the database-assigned
        // creation timestamp.
        let api_key = sqlx::query_as::<_, ApiKeyDBResponse>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(&id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(api_key)
    }

    #[instrument(skip(self), fields(api_key_id = %abbrev_id(id)), err)]
    async fn get_by_id(&mut self, id: &Self::Id) -> Result<Option<Self::Response>> {
        let api_key = sqlx::query_as::<_, ApiKeyDBResponse>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(api_key)
    }

    #[instrument(skip(self, filter), fields(limit = filter.pagination.limit), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Page<Self::Response>> {
        let resolved = match &filter.pagination.cursor {
            Some(cursor) => Some(resolve_cursor(self.db, "api_keys", cursor).await?),
            None => None,
        };

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM api_keys WHERE 1=1");
        push_filters(&mut count_qb, filter);
        let total_count: i64 = count_qb.build_query_scalar().fetch_one(&mut *self.db).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("{SELECT_COLUMNS} WHERE 1=1"));
        push_filters(&mut qb, filter);
        push_page_clauses(&mut qb, &filter.pagination, resolved.as_ref());

        let rows = qb
            .build_query_as::<ApiKeyDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;

        let (items, has_more) = finish_page(rows, &filter.pagination, resolved.as_ref());

        Ok(Page {
            items,
            total_count,
            has_more,
        })
    }

    #[instrument(skip(self), fields(api_key_id = %abbrev_id(id)), err)]
    async fn delete(&mut self, id: &Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(api_key_id = %abbrev_id(id)), err)]
    async fn update(&mut self, id: &Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // Atomic update with conditional field updates
        let api_key = sqlx::query_as::<_, ApiKeyDBResponse>(
            r#"
            UPDATE api_keys
            SET name = COALESCE($2, name)
            WHERE id = $1
            RETURNING id, name, token, created_at
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(api_key)
    }
}

impl<'c> ApiKeys<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ApiKeyFilter) {
    if let Some(ref term) = filter.id_search {
        qb.push(" AND id ILIKE ");
        qb.push_bind(like_pattern(term));
        qb.push(" ESCAPE '\\'");
    }
    if let Some(ref term) = filter.name_search {
        qb.push(" AND name ILIKE ");
        qb.push_bind(like_pattern(term));
        qb.push(" ESCAPE '\\'");
    }
}
