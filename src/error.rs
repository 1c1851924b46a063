// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::{IdentityError, JwtError};
use crate::database::DatabaseError;

/// HTTP API error. Every failure leaves the service as
/// `{kind, message, detail?}`; `detail` is only sent in development.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),
    InvalidIdentityToken(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    Database { message: String, detail: String },
    InternalServerError { message: String, detail: String },

    // 502 Bad Gateway (external service issues)
    BadGateway { message: String, detail: String },

    // 503 Service Unavailable
    ServiceUnavailable { message: String, detail: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidIdentityToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::InvalidIdentityToken(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => msg,
            ApiError::Database { message, .. }
            | ApiError::InternalServerError { message, .. }
            | ApiError::BadGateway { message, .. }
            | ApiError::ServiceUnavailable { message, .. } => message,
        }
    }

    /// Diagnostic text that must not reach clients outside development
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Database { detail, .. }
            | ApiError::InternalServerError { detail, .. }
            | ApiError::BadGateway { detail, .. }
            | ApiError::ServiceUnavailable { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// Get error kind for client handling
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::InvalidIdentityToken(_) => "invalid_identity_token",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Database { .. } => "database_error",
            ApiError::InternalServerError { .. } => "internal_error",
            ApiError::BadGateway { .. } => "bad_gateway",
            ApiError::ServiceUnavailable { .. } => "service_unavailable",
        }
    }

    pub fn to_json(&self, include_detail: bool) -> Value {
        let mut body = json!({
            "kind": self.kind(),
            "message": self.message(),
        });

        if include_detail {
            if let Some(detail) = self.detail() {
                body["detail"] = json!(detail);
            }
        }

        body
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        ApiError::InternalServerError {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    /// Translate a repository failure, using `message` as the client-facing
    /// text for errors on the database side.
    pub fn database(err: DatabaseError, message: impl Into<String>) -> Self {
        match err {
            DatabaseError::NotFound(what) => {
                tracing::debug!("Not found: {}", what);
                ApiError::NotFound("요청한 항목을 찾을 수 없습니다.".to_string())
            }
            DatabaseError::PoolExhausted => {
                tracing::warn!("Database pool exhausted");
                ApiError::ServiceUnavailable {
                    message: "서버가 혼잡합니다. 잠시 후 다시 시도해 주세요.".to_string(),
                    detail: err.to_string(),
                }
            }
            other => {
                // Log the real error but return generic message
                tracing::error!("Database error: {}", other);
                ApiError::Database {
                    message: message.into(),
                    detail: other.to_string(),
                }
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::internal_server_error("토큰 발급에 실패했습니다.", err)
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::KeyFetch(e) => {
                tracing::error!("Google key fetch failed: {}", e);
                ApiError::BadGateway {
                    message: "Google 인증 서버에 연결하지 못했습니다.".to_string(),
                    detail: e.to_string(),
                }
            }
            other => {
                tracing::warn!("Rejected identity token: {}", other);
                ApiError::InvalidIdentityToken("Google ID 토큰 검증에 실패했습니다.".to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json(crate::is_development!()))).into_response()
    }
}
