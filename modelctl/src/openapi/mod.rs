//! OpenAPI documentation configuration.
//!
//! Defines the spec for the admin API at `/api/v1/*`, served interactively
//! at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Security scheme for the admin API (Bearer token only).
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearer_auth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Admin token")
                        .description(Some(
                            "Admin token authentication. Include the configured token in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer YOUR_ADMIN_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation for the admin API.
#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health,
        api::handlers::api_keys::list_api_keys,
        api::handlers::api_keys::create_api_key,
        api::handlers::api_keys::get_api_key,
        api::handlers::api_keys::update_api_key,
        api::handlers::api_keys::delete_api_key,
        api::handlers::models::list_models,
        api::handlers::models::create_model,
        api::handlers::models::get_model,
        api::handlers::models::update_model,
        api::handlers::models::delete_model,
    ),
    servers((url = "/api/v1", description = "Admin API")),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service liveness"),
        (name = "apikeys", description = "API key issuance and revocation"),
        (name = "models", description = "Model configurations and credentials"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_builds() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/apikeys"));
        assert!(paths.iter().any(|p| p.as_str() == "/models/{id}"));
        assert!(spec.components.expect("components").security_schemes.contains_key("bearer_auth"));
    }
}
