// handlers/public/auth.rs - POST /api/auth/verify-google-id-token handler

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    /// Raw Google ID token from the Sign-In button callback
    pub credential_response: String,
}

/// Exchange a Google ID token for a session token.
///
/// Only accounts already present in `users` get a token; an unknown email
/// is answered with a message and no token. Users are never created here.
pub async fn verify_google_id_token(
    State(state): State<AppState>,
    body: Result<Json<GoogleLoginRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let request = json_body(body)?;
    if request.credential_response.trim().is_empty() {
        return Err(ApiError::bad_request("credentialResponse가 비어 있습니다."));
    }

    let identity = state.identity.verify(&request.credential_response).await?;

    let user = state
        .users
        .find_by_email(&identity.email)
        .await
        .map_err(|e| ApiError::database(e, "사용자 조회에 실패했습니다."))?;

    let Some(user) = user else {
        info!("Google login for unregistered email {}", identity.email);
        return Ok(ApiResponse::success(json!({
            "message": "등록되지 않은 사용자입니다.",
        })));
    };

    let token = state.sessions.issue(&user.email)?;
    info!("Issued session token for {}", user.email);

    Ok(ApiResponse::success(json!({
        "message": "Google ID 토큰이 성공적으로 검증되었습니다.",
        "token": token,
    })))
}
