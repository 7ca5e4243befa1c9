//! Shared-secret authentication for the admin routes

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::api::AppState;
use crate::error::ServerError;

/// Extract Bearer token from Authorization header
///
/// # Arguments
/// * `auth_header` - The Authorization header value (e.g., "Bearer xxx")
///
/// # Returns
/// * `Some(&str)` - The extracted token
/// * `None` - If the header is missing or malformed
pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Compare two keys without short-circuiting on the first differing byte.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Middleware: reject requests without the configured admin key.
///
/// With no key configured every request is rejected.
pub async fn require_admin_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(expected) = state.admin_key.as_deref() else {
        warn!("Rejected admin request: no admin key configured");
        return Err(ServerError::Unauthorized);
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let authorized = extract_bearer_token(header)
        .is_some_and(|token| keys_match(token.as_bytes(), expected.as_bytes()));

    if !authorized {
        warn!("Rejected admin request to {}: bad or missing key", request.uri());
        return Err(ServerError::Unauthorized);
    }

    Ok(next.run(request).await)
}
