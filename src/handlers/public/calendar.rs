// handlers/public/calendar.rs - GET /api/calendar/list handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::handlers::protected::EVENT_NOT_FOUND;
use crate::handlers::repository_error;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Events ordered by date. Clients are told not to cache the list.
pub async fn calendar_list(State(state): State<AppState>) -> ApiResult<Value> {
    let events = state
        .events
        .list_all()
        .await
        .map_err(repository_error(EVENT_NOT_FOUND, "이벤트 목록 조회에 실패했습니다."))?;

    Ok(ApiResponse::success(json!({ "CalendarEvents": events })).no_cache())
}
