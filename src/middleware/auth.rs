use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated admin extracted from the session token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
    pub exp: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
            exp: claims.exp,
        }
    }
}

/// Bearer token gate for admin routes.
///
/// A missing or malformed `Authorization` header is 401; a token that is
/// present but fails verification is 403. Runs before the handler, so a
/// rejected request never reaches the repositories.
pub async fn require_bearer(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = state.sessions.verify(token).map_err(|e| {
        tracing::debug!("Rejected session token: {}", e);
        ApiError::forbidden("유효하지 않은 토큰입니다.")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("인증 토큰이 필요합니다.")?;

    let auth_str = auth_header.to_str().map_err(|_| "잘못된 Authorization 헤더입니다.")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("인증 토큰이 비어 있습니다."),
        None => Err("Authorization 헤더는 Bearer 형식이어야 합니다."),
    }
}
