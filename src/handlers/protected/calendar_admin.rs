// handlers/protected/calendar_admin.rs - Calendar write endpoints (bearer token required)

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::database::models::{normalize_event_date, CalendarEventFields};
use crate::database::Upsert;
use crate::error::ApiError;
use crate::handlers::{json_body, path_id, repository_error};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub const EVENT_NOT_FOUND: &str = "주어진 event_id에 해당하는 이벤트를 찾을 수 없습니다.";
const UPSERT_FAILED: &str = "이벤트 생성 또는 수정에 실패했습니다.";

/// Event payload as sent by the admin page. `event_date` may be a plain
/// date or a full timestamp; it is reduced to a calendar date before storage.
#[derive(Debug, Deserialize)]
pub struct CalendarEventRequest {
    pub event_id: Option<i64>,
    pub event_title: String,
    pub event_date: String,
    pub event_type: String,
    #[serde(default)]
    pub event_text: String,
}

impl CalendarEventRequest {
    fn into_fields(self) -> Result<(Option<i64>, CalendarEventFields), ApiError> {
        let event_date = normalize_event_date(&self.event_date)
            .map_err(|e| ApiError::bad_request(format!("잘못된 날짜 형식입니다: {}", e.0)))?;

        Ok((
            self.event_id,
            CalendarEventFields {
                event_title: self.event_title,
                event_date,
                event_type: self.event_type,
                event_text: self.event_text,
            },
        ))
    }
}

/// POST /api/calendar-admin/create - 201 on create, 200 when `event_id` is given
pub async fn calendar_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CalendarEventRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let (event_id, fields) = json_body(body)?.into_fields()?;
    let upsert = Upsert::from_optional_id(event_id, fields);
    let created = upsert.is_create();

    let event = state
        .events
        .upsert(upsert)
        .await
        .map_err(repository_error(EVENT_NOT_FOUND, UPSERT_FAILED))?;

    if created {
        info!(event_id = event.event_id, by = %user.email, "Created calendar event");
        Ok(ApiResponse::created(json!({
            "message": "이벤트를 성공적으로 생성했습니다.",
            "CalendarEvent": event,
        })))
    } else {
        info!(event_id = event.event_id, by = %user.email, "Updated calendar event");
        Ok(ApiResponse::success(json!({
            "message": "이벤트를 성공적으로 수정했습니다.",
            "CalendarEvent": event,
        })))
    }
}

/// PUT /api/calendar-admin/update/:event_id - path id wins over any body id
pub async fn calendar_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    event_id: Result<Path<i64>, PathRejection>,
    body: Result<Json<CalendarEventRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let event_id = path_id(event_id)?;
    let (_, fields) = json_body(body)?.into_fields()?;

    let event = state
        .events
        .upsert(Upsert::Update { id: event_id, fields })
        .await
        .map_err(repository_error(EVENT_NOT_FOUND, UPSERT_FAILED))?;

    info!(event_id, by = %user.email, "Updated calendar event");
    Ok(ApiResponse::success(json!({
        "message": "이벤트를 성공적으로 수정했습니다.",
        "CalendarEvent": event,
    })))
}

/// DELETE /api/calendar-admin/delete/:event_id - returns the removed event
pub async fn calendar_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    event_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let event_id = path_id(event_id)?;

    let deleted = state
        .events
        .delete(event_id)
        .await
        .map_err(repository_error(EVENT_NOT_FOUND, "이벤트 삭제에 실패했습니다."))?;

    info!(event_id, by = %user.email, "Deleted calendar event");
    Ok(ApiResponse::success(json!({
        "message": "이벤트를 성공적으로 삭제했습니다.",
        "deletedEvent": deleted,
    })))
}
