//! Model configuration endpoints.
//!
//! A model ties a name to an entry in the schema catalog plus a set of
//! provider credentials. Credentials are encrypted before they hit the
//! database and only ever leave the service as masked `display_credentials`.
//! `model_schema_id`, and the provider and type derived from it, are fixed at
//! creation.

use crate::AppState;
use crate::api::models::envelope::{DataResponse, EmptyResponse, ListResponse};
use crate::api::models::models::{ModelCreate, ModelResponse, ModelSearchQuery, ModelUpdate};
use crate::api::models::pagination::PaginationParams;
use crate::db::handlers::models::ModelFilter;
use crate::db::handlers::{Models, Repository};
use crate::errors::{Error, Result};
use crate::schemas::{ModelType, find_schema};
use crate::types::ModelId;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::str::FromStr;

/// List model configurations with pagination and search filters.
#[utoipa::path(
    get,
    path = "/models",
    tag = "models",
    summary = "List models",
    description = "List model configurations with pagination, search and schema-derived filters.",
    params(PaginationParams, ModelSearchQuery),
    responses(
        (status = 200, description = "Page of models", body = ListResponse<ModelResponse>),
        (status = 400, description = "Invalid pagination or filter parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_models(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(search): Query<ModelSearchQuery>,
) -> Result<Json<ListResponse<ModelResponse>>> {
    let pagination = pagination.validate()?;
    let model_type = match search.model_type {
        Some(raw) => Some(
            ModelType::from_str(&raw)
                .map_err(|message| Error::Validation { message })?
                .as_str()
                .to_string(),
        ),
        None => None,
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Models::new(&mut conn);

    let filter = ModelFilter {
        pagination,
        id_search: search.id_search,
        name_search: search.name_search,
        provider_id: search.provider_id,
        model_type,
    };
    let page = repo.list(&filter).await?;
    let total_count = page.total_count;
    let has_more = page.has_more;
    let items = page
        .items
        .into_iter()
        .map(ModelResponse::from_db)
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(ListResponse::new(items, total_count, has_more)))
}

/// Create a new model configuration.
#[utoipa::path(
    post,
    path = "/models",
    tag = "models",
    summary = "Create model",
    description = "Create a model configuration. `model_schema_id` must name an entry in the schema catalog and fixes the provider and type permanently.",
    request_body = ModelCreate,
    responses(
        (status = 201, description = "Model created", body = DataResponse<ModelResponse>),
        (status = 400, description = "Unknown schema or invalid credentials"),
        (status = 401, description = "Unauthorized"),
        (status = 429, description = "Maximum number of models reached"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_model(
    State(state): State<AppState>,
    Json(request): Json<ModelCreate>,
) -> Result<(StatusCode, Json<DataResponse<ModelResponse>>)> {
    let schema = find_schema(&request.model_schema_id).ok_or_else(|| Error::Validation {
        message: format!("unknown model_schema_id: {}", request.model_schema_id),
    })?;
    let db_request = request.into_db_request(schema)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Models::new(&mut conn);

    let created = repo.create(&db_request, state.config.limits.max_models).await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(ModelResponse::from_db(created)?))))
}

/// Get a single model configuration by id.
#[utoipa::path(
    get,
    path = "/models/{id}",
    tag = "models",
    summary = "Get model",
    description = "Get a model configuration. Credentials are always masked.",
    params(("id" = String, Path, description = "Model id")),
    responses(
        (status = 200, description = "The model", body = DataResponse<ModelResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Model not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<ModelId>,
) -> Result<Json<DataResponse<ModelResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Models::new(&mut conn);

    let model = repo.get_by_id(&id).await?.ok_or_else(|| Error::NotFound {
        resource: "Model".to_string(),
        id: id.clone(),
    })?;

    Ok(Json(DataResponse::new(ModelResponse::from_db(model)?)))
}

/// Update a model configuration's mutable fields.
#[utoipa::path(
    post,
    path = "/models/{id}",
    tag = "models",
    summary = "Update model",
    description = "Update a model's name or credentials. `model_schema_id` is immutable and may only be sent when it matches the stored value.",
    params(("id" = String, Path, description = "Model id")),
    request_body = ModelUpdate,
    responses(
        (status = 200, description = "The updated model", body = DataResponse<ModelResponse>),
        (status = 400, description = "Attempt to change the schema or invalid credentials"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Model not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<ModelId>,
    Json(request): Json<ModelUpdate>,
) -> Result<Json<DataResponse<ModelResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Models::new(&mut conn);

    let existing = repo.get_by_id(&id).await?.ok_or_else(|| Error::NotFound {
        resource: "Model".to_string(),
        id: id.clone(),
    })?;

    // The schema is fixed at creation. Tolerate clients echoing the stored
    // value back, reject anything else before touching the row.
    if let Some(requested_schema) = &request.model_schema_id
        && requested_schema != &existing.model_schema_id
    {
        return Err(Error::Validation {
            message: "model_schema_id cannot be changed after creation".to_string(),
        });
    }

    let updated = repo.update(&id, &request.into_db_request()?).await.map_err(|e| match e {
        crate::db::errors::DbError::NotFound => Error::NotFound {
            resource: "Model".to_string(),
            id: id.clone(),
        },
        other => Error::Database(other),
    })?;

    Ok(Json(DataResponse::new(ModelResponse::from_db(updated)?)))
}

/// Delete a model configuration.
#[utoipa::path(
    delete,
    path = "/models/{id}",
    tag = "models",
    summary = "Delete model",
    description = "Delete a model configuration, freeing its slot against the configured maximum.",
    params(("id" = String, Path, description = "Model id")),
    responses(
        (status = 200, description = "Model deleted", body = EmptyResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Model not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<ModelId>,
) -> Result<Json<EmptyResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Models::new(&mut conn);

    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "Model".to_string(),
            id: id.clone(),
        });
    }

    Ok(Json(EmptyResponse::new()))
}
