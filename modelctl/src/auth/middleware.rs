//! Admin bearer token middleware.

use crate::{AppState, errors::Error};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Compare two tokens via their digests. Hashing both sides first keeps the
/// comparison time independent of how many leading bytes match.
fn tokens_match(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided == expected
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ").filter(|token| !token.is_empty())
}

/// Require the configured admin token on every request passing through.
pub async fn admin_auth_middleware(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, Error> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(Error::Unauthenticated {
            message: Some("Missing Authorization header".to_string()),
        })?;

    let token = bearer_token(header).ok_or(Error::Unauthenticated {
        message: Some("Authorization header must be a bearer token".to_string()),
    })?;

    if !tokens_match(token, &state.config.admin_token) {
        debug!("rejected request with invalid admin token");
        return Err(Error::Unauthenticated {
            message: Some("Invalid admin token".to_string()),
        });
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("bearer abc123"), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("abc123"), None);
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("secret", "secret"));
        assert!(!tokens_match("secret", "secret2"));
        assert!(!tokens_match("", "secret"));
    }
}
