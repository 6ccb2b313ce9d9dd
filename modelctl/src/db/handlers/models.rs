use crate::api::models::pagination::Pagination;
use crate::crypto::generate_id;
use crate::db::errors::DbError;
use crate::db::errors::Result;
use crate::db::handlers::paging::{finish_page, like_pattern, push_page_clauses, resolve_cursor};
use crate::db::handlers::repository::{Page, Repository};
use crate::db::models::models::{ModelCreateDBRequest, ModelDBResponse, ModelUpdateDBRequest};
use crate::types::{ModelId, abbrev_id};
use sqlx::{Acquire, PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Advisory lock key serializing quota-checked creates on the models table
const MODELS_CREATE_LOCK: i64 = 0x6d63_746c_0002;

const SELECT_COLUMNS: &str =
    "SELECT id, name, model_schema_id, provider_id, model_type, credentials, created_at FROM models";

/// Filter for listing model configurations
#[derive(Debug, Clone, Default)]
pub struct ModelFilter {
    pub pagination: Pagination,
    pub id_search: Option<String>,
    pub name_search: Option<String>,
    pub provider_id: Option<String>,
    pub model_type: Option<String>,
}

pub struct Models<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Models<'c> {
    type CreateRequest = ModelCreateDBRequest;
    type UpdateRequest = ModelUpdateDBRequest;
    type Response = ModelDBResponse;
    type Id = ModelId;
    type Filter = ModelFilter;

    #[instrument(skip(self, request), fields(name = %request.name, schema = %request.model_schema_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest, max_count: i64) -> Result<Self::Response> {
        let id = generate_id();

        let mut tx = self.db.begin().await?;

        if max_count > 0 {
            // Serialize concurrent creates so the count cannot go stale
            // before the insert lands.
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(MODELS_CREATE_LOCK)
                .execute(&mut *tx)
                .await?;

            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM models")
                .fetch_one(&mut *tx)
                .await?;

            if count >= max_count {
                return Err(DbError::LimitReached {
                    resource: "models",
                    max_count,
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO models (id, name, model_schema_id, provider_id, model_type, credentials)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.model_schema_id)
        .bind(&request.provider_id)
        .bind(&request.model_type)
        .bind(&request.credentials)
        .execute(&mut *tx)
        .await?;

        // Read the row back so the response carries the database-assigned
        // creation timestamp.
        let model = sqlx::query_as::<_, ModelDBResponse>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(&id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(model)
    }

    #[instrument(skip(self), fields(model_id = %abbrev_id(id)), err)]
    async fn get_by_id(&mut self, id: &Self::Id) -> Result<Option<Self::Response>> {
        let model = sqlx::query_as::<_, ModelDBResponse>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(model)
    }

    #[instrument(skip(self, filter), fields(limit = filter.pagination.limit), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Page<Self::Response>> {
        let resolved = match &filter.pagination.cursor {
            Some(cursor) => Some(resolve_cursor(self.db, "models", cursor).await?),
            None => None,
        };

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM models WHERE 1=1");
        push_filters(&mut count_qb, filter);
        let total_count: i64 = count_qb.build_query_scalar().fetch_one(&mut *self.db).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("{SELECT_COLUMNS} WHERE 1=1"));
        push_filters(&mut qb, filter);
        push_page_clauses(&mut qb, &filter.pagination, resolved.as_ref());

        let rows = qb.build_query_as::<ModelDBResponse>().fetch_all(&mut *self.db).await?;

        let (items, has_more) = finish_page(rows, &filter.pagination, resolved.as_ref());

        Ok(Page {
            items,
            total_count,
            has_more,
        })
    }

    #[instrument(skip(self), fields(model_id = %abbrev_id(id)), err)]
    async fn delete(&mut self, id: &Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM models WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(model_id = %abbrev_id(id)), err)]
    async fn update(&mut self, id: &Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // Atomic update with conditional field updates; schema, provider and
        // type are immutable and never touched here.
        let model = sqlx::query_as::<_, ModelDBResponse>(
            r#"
            UPDATE models
            SET
                name = COALESCE($2, name),
                credentials = COALESCE($3, credentials)
            WHERE id = $1
            RETURNING id, name, model_schema_id, provider_id, model_type, credentials, created_at
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.credentials)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(model)
    }
}

impl<'c> Models<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ModelFilter) {
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
    if let Some(ref provider_id) = filter.provider_id {
        qb.push(" AND provider_id = ");
        qb.push_bind(provider_id.clone());
    }
    if let Some(ref model_type) = filter.model_type {
        qb.push(" AND model_type = ");
        qb.push_bind(model_type.clone());
    }
}
