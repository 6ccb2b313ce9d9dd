//! Shared helpers for integration tests.
//!
//! Handler tests drive the whole router through `axum_test::TestServer`
//! against the per-test database that `#[sqlx::test]` provisions.

use crate::config::{Config, LimitsConfig};
use crate::{AppState, build_router};
use axum_test::TestServer;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sqlx::PgPool;
use std::sync::Once;

/// Admin token every test request authenticates with.
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

static ENCRYPTION_KEY_INIT: Once = Once::new();

/// Point `ENCRYPTION_KEY` at a fixed 32-byte key for the whole test process.
pub fn ensure_encryption_key() {
    ENCRYPTION_KEY_INIT.call_once(|| {
        let key = STANDARD.encode([7u8; 32]);
        // Safety: guarded by Once and only ever sets this one variable,
        // before any test reads it.
        unsafe {
            std::env::set_var("ENCRYPTION_KEY", key);
        }
    });
}

pub fn create_test_config() -> Config {
    Config {
        admin_token: TEST_ADMIN_TOKEN.to_string(),
        ..Config::default()
    }
}

/// Test server with unlimited resource quotas.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    create_test_app_with_limits(pool, 0, 0).await
}

/// Test server with explicit per-resource maximums (zero disables a limit).
pub async fn create_test_app_with_limits(pool: PgPool, max_api_keys: i64, max_models: i64) -> TestServer {
    ensure_encryption_key();

    let mut config = create_test_config();
    config.limits = LimitsConfig { max_api_keys, max_models };

    let state = AppState { db: pool, config };
    TestServer::new(build_router(state)).expect("Failed to create test server")
}
