// handlers/mod.rs - Handlers split by access tier
//
// Public (no auth) → Protected (bearer session token, see middleware::auth)
pub mod protected;
pub mod public;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path};

use crate::database::DatabaseError;
use crate::error::ApiError;

/// Unwrap a numeric path id, turning extractor rejections into 400s
pub(crate) fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => Err(ApiError::bad_request(format!(
            "잘못된 경로 매개변수입니다: {}",
            rejection.body_text()
        ))),
    }
}

/// Unwrap a JSON body, turning extractor rejections into 400s
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::bad_request(format!(
            "잘못된 요청 본문입니다: {}",
            rejection.body_text()
        ))),
    }
}

/// Map repository failures for one endpoint: `not_found` replaces the
/// generic 404 text, `failed` is the 500 message.
pub(crate) fn repository_error(not_found: &'static str, failed: &'static str) -> impl Fn(DatabaseError) -> ApiError {
    move |err| match err {
        DatabaseError::NotFound(_) => ApiError::not_found(not_found),
        other => ApiError::database(other, failed),
    }
}
