//! # modelctl: Admin Service for Model Configurations and API Keys
//!
//! `modelctl` is a small control plane for the credentials side of an AI
//! platform: which provider models are configured, with what credentials, and
//! which API keys exist to reach them. It provides a RESTful admin API for
//! managing both resource types, backed by PostgreSQL.
//!
//! ## Overview
//!
//! Platforms that front multiple AI providers need somewhere to keep the
//! provider credentials and the keys handed out to internal services. Both
//! are secrets, both need lifecycle management, and both tend to accumulate
//! without bound unless something enforces a ceiling. This crate is that
//! something: a single service owning the `api_keys` and `models` tables,
//! exposing CRUD over HTTP with masking, encryption, and quota enforcement
//! built in.
//!
//! ### What It Does
//!
//! API keys are generated server-side (`ak-<id>-<secret>`) and returned in
//! full exactly once at creation, or on an explicit `?plain=true` fetch;
//! every other response masks the token. Model configurations tie a name to
//! an entry in a static schema catalog, which fixes the provider and model
//! type for the row's lifetime; their credentials are encrypted with
//! AES-256-GCM before storage and only ever leave the service masked.
//! Creates are checked against configured per-resource maximums inside a
//! transaction holding an advisory lock, so concurrent requests cannot
//! overshoot the quota.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL via `sqlx` for persistence. Requests
//! under `/api/v1` pass through bearer token middleware, then reach handlers
//! that interact with the database through repository interfaces. Listing
//! endpoints share one pagination engine supporting keyset cursors, offsets,
//! and substring search.
//!
//! Layers, top to bottom:
//!
//! - [`api::handlers`]: route handlers, request validation, response shaping
//! - [`api::models`]: wire types, envelopes, pagination parameters
//! - [`db::handlers`]: repositories implementing [`db::handlers::Repository`]
//! - [`db::models`]: row types mirroring the table schemas
//!
//! ## Configuration
//!
//! Loaded from YAML plus `MODELCTL_`-prefixed environment variables, see
//! [`config`]. The AES key for credential encryption comes from the
//! `ENCRYPTION_KEY` environment variable (base64, 32 bytes).

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod db;
pub mod errors;
mod openapi;
pub mod schemas;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test_utils;

use auth::middleware::admin_auth_middleware;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
pub use config::Config;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Shared state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the modelctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Assemble the full router: authenticated admin API under `/api/v1`,
/// plus the open health and docs endpoints.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/apikeys", get(api::handlers::api_keys::list_api_keys))
        .route("/apikeys", post(api::handlers::api_keys::create_api_key))
        .route("/apikeys/{id}", get(api::handlers::api_keys::get_api_key))
        .route("/apikeys/{id}", post(api::handlers::api_keys::update_api_key))
        .route("/apikeys/{id}", delete(api::handlers::api_keys::delete_api_key))
        .route("/models", get(api::handlers::models::list_models))
        .route("/models", post(api::handlers::models::create_model))
        .route("/models/{id}", get(api::handlers::models::get_model))
        .route("/models/{id}", post(api::handlers::models::update_model))
        .route("/models/{id}", delete(api::handlers::models::delete_model))
        .route_layer(from_fn_with_state(state.clone(), admin_auth_middleware));

    let cors_layer = CorsLayer::new().allow_methods(Any).allow_headers(Any).allow_origin(Any);

    Router::new()
        .route("/health", get(api::handlers::health::health))
        .nest("/api/v1", api_routes)
        .merge(Scalar::with_url("/docs", openapi::ApiDoc::openapi()))
        .with_state(state)
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, and builds the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts
///    handling requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting modelctl with configuration: {:#?}", config);

        let database_url = config.require_database_url()?;
        let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
        migrator().run(&pool).await?;

        let state = AppState {
            db: pool.clone(),
            config: config.clone(),
        };
        let router = build_router(state);

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("modelctl listening on http://{bind_addr}");

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        self.pool.close().await;
        Ok(())
    }
}
