// handlers/public/system.rs - GET / and GET /health

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Portfolio API",
        "version": version,
        "description": "Blog and calendar backend for the portfolio site",
        "endpoints": {
            "blog": "/api/blog/list, /api/blog-detail/:post_id (public)",
            "blog_admin": "/api/blog-admin/create, /api/blog-admin/update/:post_id, /api/blog-admin/delete/:post_id (bearer)",
            "calendar": "/api/calendar/list (public)",
            "calendar_admin": "/api/calendar-admin/create, /api/calendar-admin/update/:event_id, /api/calendar-admin/delete/:event_id (bearer)",
            "auth": "/api/auth/verify-google-id-token (public), /api/auth/whoami (bearer)",
            "health": "/health (public)",
        }
    }))
}

/// Reports database reachability; 503 when Postgres does not answer
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(pool) = state.pool.as_ref() else {
        return (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "memory"
            })),
        );
    };

    match pool.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
                "connections": pool.size()
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            let mut body = json!({
                "status": "degraded",
                "timestamp": now,
                "database": "unavailable"
            });
            if crate::is_development!() {
                body["database_error"] = json!(e.to_string());
            }
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}
