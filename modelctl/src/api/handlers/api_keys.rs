//! API key management endpoints.
//!
//! Key tokens are secrets: the full token appears in the create response and
//! when a single key is fetched with `?plain=true`, everywhere else only a
//! masked form leaves the service.

use crate::AppState;
use crate::api::models::api_keys::{ApiKeyCreate, ApiKeyResponse, ApiKeySearchQuery, ApiKeyUpdate, GetApiKeyQuery};
use crate::api::models::envelope::{DataResponse, EmptyResponse, ListResponse};
use crate::api::models::pagination::PaginationParams;
use crate::db::handlers::api_keys::ApiKeyFilter;
use crate::db::handlers::{ApiKeys, Repository};
use crate::errors::{Error, Result};
use crate::types::ApiKeyId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

/// List API keys with pagination and search filters.
#[utoipa::path(
    get,
    path = "/apikeys",
    tag = "apikeys",
    summary = "List API keys",
    description = "List API keys with pagination and search filters. Tokens are masked.",
    params(PaginationParams, ApiKeySearchQuery),
    responses(
        (status = 200, description = "Page of API keys", body = ListResponse<ApiKeyResponse>),
        (status = 400, description = "Invalid pagination or filter parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_api_keys(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(search): Query<ApiKeySearchQuery>,
) -> Result<Json<ListResponse<ApiKeyResponse>>> {
    let pagination = pagination.validate()?;
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = ApiKeys::new(&mut conn);

    let filter = ApiKeyFilter {
        pagination,
        id_search: search.id_search,
        name_search: search.name_search,
    };
    let page = repo.list(&filter).await?;
    let total_count = page.total_count;
    let has_more = page.has_more;
    let items: Vec<ApiKeyResponse> = page.items.into_iter().map(ApiKeyResponse::masked).collect();

    Ok(Json(ListResponse::new(items, total_count, has_more)))
}

/// Create a new API key.
#[utoipa::path(
    post,
    path = "/apikeys",
    tag = "apikeys",
    summary = "Create API key",
    description = "Create a new API key. The response is the only place the full token is guaranteed to appear.",
    request_body = ApiKeyCreate,
    responses(
        (status = 201, description = "API key created", body = DataResponse<ApiKeyResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 429, description = "Maximum number of API keys reached"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_api_key(
    State(state): State<AppState>,
    Json(request): Json<ApiKeyCreate>,
) -> Result<(StatusCode, Json<DataResponse<ApiKeyResponse>>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = ApiKeys::new(&mut conn);

    let created = repo.create(&request.into(), state.config.limits.max_api_keys).await?;

    // The one place the full token is always returned.
    Ok((StatusCode::CREATED, Json(DataResponse::new(ApiKeyResponse::plain(created)))))
}

/// Get a single API key by id.
#[utoipa::path(
    get,
    path = "/apikeys/{id}",
    tag = "apikeys",
    summary = "Get API key",
    description = "Get a single API key. Pass `plain=true` to reveal the full token.",
    params(
        ("id" = String, Path, description = "API key id"),
        GetApiKeyQuery,
    ),
    responses(
        (status = 200, description = "The API key", body = DataResponse<ApiKeyResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "API key not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_api_key(
    State(state): State<AppState>,
    Path(id): Path<ApiKeyId>,
    Query(query): Query<GetApiKeyQuery>,
) -> Result<Json<DataResponse<ApiKeyResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = ApiKeys::new(&mut conn);

    let api_key = repo.get_by_id(&id).await?.ok_or_else(|| Error::NotFound {
        resource: "API key".to_string(),
        id: id.clone(),
    })?;

    let response = if query.plain.unwrap_or(false) {
        ApiKeyResponse::plain(api_key)
    } else {
        ApiKeyResponse::masked(api_key)
    };
    Ok(Json(DataResponse::new(response)))
}

/// Update an API key's mutable fields.
#[utoipa::path(
    post,
    path = "/apikeys/{id}",
    tag = "apikeys",
    summary = "Update API key",
    description = "Update an API key's name. The token and creation time never change.",
    params(("id" = String, Path, description = "API key id")),
    request_body = ApiKeyUpdate,
    responses(
        (status = 200, description = "The updated API key", body = DataResponse<ApiKeyResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "API key not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_api_key(
    State(state): State<AppState>,
    Path(id): Path<ApiKeyId>,
    Json(request): Json<ApiKeyUpdate>,
) -> Result<Json<DataResponse<ApiKeyResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = ApiKeys::new(&mut conn);

    let updated = repo.update(&id, &request.into()).await.map_err(|e| match e {
        crate::db::errors::DbError::NotFound => Error::NotFound {
            resource: "API key".to_string(),
            id: id.clone(),
        },
        other => Error::Database(other),
    })?;

    Ok(Json(DataResponse::new(ApiKeyResponse::masked(updated))))
}

/// Delete an API key.
#[utoipa::path(
    delete,
    path = "/apikeys/{id}",
    tag = "apikeys",
    summary = "Delete API key",
    description = "Delete an API key, freeing its slot against the configured maximum.",
    params(("id" = String, Path, description = "API key id")),
    responses(
        (status = 200, description = "API key deleted", body = EmptyResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "API key not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_api_key(
    State(state): State<AppState>,
    Path(id): Path<ApiKeyId>,
) -> Result<Json<EmptyResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = ApiKeys::new(&mut conn);

    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "API key".to_string(),
            id: id.clone(),
        });
    }

    Ok(Json(EmptyResponse::new()))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_api_key_returns_plain_token(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app
            .post("/api/v1/apikeys")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "ci key"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["name"], "ci key");

        let token = body["data"]["apikey"].as_str().expect("token");
        let id = body["data"]["apikey_id"].as_str().expect("id");
        assert!(token.starts_with(&format!("ak-{id}-")));
        assert!(!token.contains("****"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_masks_tokens(pool: PgPool) {
        let app = create_test_app(pool).await;

        app.post("/api/v1/apikeys")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "first"}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = app.get("/api/v1/apikeys").authorization_bearer(TEST_ADMIN_TOKEN).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["fetched_count"], 1);
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["has_more"], false);

        let token = body["data"][0]["apikey"].as_str().expect("token");
        assert!(token.contains("****"));
        assert!(token.starts_with("ak-"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_masked_and_plain(pool: PgPool) {
        let app = create_test_app(pool).await;

        let created: Value = app
            .post("/api/v1/apikeys")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "reveal me"}))
            .await
            .json();
        let id = created["data"]["apikey_id"].as_str().expect("id").to_string();
        let full_token = created["data"]["apikey"].as_str().expect("token").to_string();

        let masked: Value = app
            .get(&format!("/api/v1/apikeys/{id}"))
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .await
            .json();
        assert!(masked["data"]["apikey"].as_str().expect("token").contains("****"));

        let plain: Value = app
            .get(&format!("/api/v1/apikeys/{id}?plain=true"))
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .await
            .json();
        assert_eq!(plain["data"]["apikey"], full_token.as_str());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_missing_key_is_not_found(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app
            .get("/api/v1/apikeys/doesnotexist0000")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"]["code"], "OBJECT_NOT_FOUND");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_preserves_token_and_created_at(pool: PgPool) {
        let app = create_test_app(pool).await;

        let created: Value = app
            .post("/api/v1/apikeys")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "before"}))
            .await
            .json();
        let id = created["data"]["apikey_id"].as_str().expect("id").to_string();

        let response = app
            .post(&format!("/api/v1/apikeys/{id}"))
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "after"}))
            .await;
        response.assert_status_ok();

        let updated: Value = response.json();
        assert_eq!(updated["data"]["name"], "after");
        assert_eq!(updated["data"]["created_at"], created["data"]["created_at"]);

        let plain: Value = app
            .get(&format!("/api/v1/apikeys/{id}?plain=true"))
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .await
            .json();
        assert_eq!(plain["data"]["apikey"], created["data"]["apikey"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_missing_key_is_not_found(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app
            .post("/api/v1/apikeys/doesnotexist0000")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "nope"}))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_then_delete_again(pool: PgPool) {
        let app = create_test_app(pool).await;

        let created: Value = app
            .post("/api/v1/apikeys")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "short lived"}))
            .await
            .json();
        let id = created["data"]["apikey_id"].as_str().expect("id").to_string();

        let response = app
            .delete(&format!("/api/v1/apikeys/{id}"))
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body, json!({"status": "success"}));

        app.get(&format!("/api/v1/apikeys/{id}"))
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let again = app
            .delete(&format!("/api/v1/apikeys/{id}"))
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .await;
        again.assert_status(StatusCode::NOT_FOUND);
        let body: Value = again.json();
        assert_eq!(body["error"]["code"], "OBJECT_NOT_FOUND");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_invalid_pagination_is_rejected(pool: PgPool) {
        let app = create_test_app(pool).await;

        for query in ["limit=0", "limit=101", "offset=1&after=somekey", "after=a&before=b"] {
            let response = app
                .get(&format!("/api/v1/apikeys?{query}"))
                .authorization_bearer(TEST_ADMIN_TOKEN)
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["error"]["code"], "REQUEST_VALIDATION_ERROR", "query: {query}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_unknown_cursor_is_rejected(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app
            .get("/api/v1/apikeys?after=nosuchid00000000")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "REQUEST_VALIDATION_ERROR");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_missing_auth_is_unauthorized(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.get("/api/v1/apikeys").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "TOKEN_VALIDATION_FAILED");

        let wrong = app.get("/api/v1/apikeys").authorization_bearer("not-the-token").await;
        wrong.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_limit_frees_on_delete(pool: PgPool) {
        let app = create_test_app_with_limits(pool, 2, 0).await;

        let first: Value = app
            .post("/api/v1/apikeys")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "one"}))
            .await
            .json();
        app.post("/api/v1/apikeys")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "two"}))
            .await
            .assert_status(StatusCode::CREATED);

        let blocked = app
            .post("/api/v1/apikeys")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "three"}))
            .await;
        blocked.assert_status(StatusCode::TOO_MANY_REQUESTS);
        let body: Value = blocked.json();
        assert_eq!(body["error"]["code"], "RESOURCE_LIMIT_REACHED");

        let first_id = first["data"]["apikey_id"].as_str().expect("id");
        app.delete(&format!("/api/v1/apikeys/{first_id}"))
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .await
            .assert_status_ok();

        app.post("/api/v1/apikeys")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .json(&json!({"name": "three"}))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_cursor_walk_ascending(pool: PgPool) {
        let app = create_test_app(pool).await;

        for name in ["alpha", "beta", "gamma"] {
            app.post("/api/v1/apikeys")
                .authorization_bearer(TEST_ADMIN_TOKEN)
                .json(&json!({"name": name}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let mut seen = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let path = match &after {
                Some(cursor) => format!("/api/v1/apikeys?limit=1&order=asc&after={cursor}"),
                None => "/api/v1/apikeys?limit=1&order=asc".to_string(),
            };
            let body: Value = app.get(&path).authorization_bearer(TEST_ADMIN_TOKEN).await.json();
            assert_eq!(body["fetched_count"], 1);
            assert_eq!(body["total_count"], 3);
            seen.push(body["data"][0]["name"].as_str().expect("name").to_string());
            after = Some(body["data"][0]["apikey_id"].as_str().expect("id").to_string());
            if !body["has_more"].as_bool().expect("has_more") {
                break;
            }
        }
        assert_eq!(seen, vec!["alpha", "beta", "gamma"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_name_search_filters_list(pool: PgPool) {
        let app = create_test_app(pool).await;

        for name in ["prod ingest", "prod egress", "staging probe"] {
            app.post("/api/v1/apikeys")
                .authorization_bearer(TEST_ADMIN_TOKEN)
                .json(&json!({"name": name}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let body: Value = app
            .get("/api/v1/apikeys?name_search=PROD")
            .authorization_bearer(TEST_ADMIN_TOKEN)
            .await
            .json();
        assert_eq!(body["total_count"], 2);
        for item in body["data"].as_array().expect("array") {
            assert!(item["name"].as_str().expect("name").contains("prod"));
        }
    }
}
