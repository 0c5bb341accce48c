//! Caller identity middleware

use axum::{
    body::Body,
    extract::Request,
    http::HeaderName,
    middleware::Next,
    response::Response,
};

use crate::error::{ApiError, Result};

/// Header set by the authentication gateway in front of this service.
pub static USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Authenticated user stored in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Rejects requests without a caller identity.
pub async fn require_user(mut request: Request<Body>, next: Next) -> Result<Response> {
    let user_id = request
        .headers()
        .get(&USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Missing x-user-id header".to_string()))?
        .to_string();

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}
