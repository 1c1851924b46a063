use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::require_bearer;
use crate::state::AppState;

/// Full application router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(blog_routes())
        .merge(calendar_routes())
        .merge(auth_public_routes())
        // Bearer token required
        .merge(blog_admin_routes(state.clone()))
        .merge(calendar_admin_routes(state.clone()))
        .merge(auth_routes(state.clone()))
        .fallback(fallback)
        .with_state(state)
        // Global middleware, outermost first
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        tracing::warn!("CORS: no origins configured, allowing all origins");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
}

fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/blog/list", get(public::blog_list))
        .route("/api/blog-detail/:post_id", get(public::blog_detail))
}

fn calendar_routes() -> Router<AppState> {
    Router::new().route("/api/calendar/list", get(public::calendar_list))
}

fn auth_public_routes() -> Router<AppState> {
    Router::new().route("/api/auth/verify-google-id-token", post(public::verify_google_id_token))
}

fn blog_admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/blog-admin/create", post(protected::blog_create))
        .route("/api/blog-admin/update/:post_id", put(protected::blog_update))
        .route("/api/blog-admin/delete/:post_id", delete(protected::blog_delete))
        .route_layer(middleware::from_fn_with_state(state, require_bearer))
}

fn calendar_admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/calendar-admin/create", post(protected::calendar_create))
        .route("/api/calendar-admin/update/:event_id", put(protected::calendar_update))
        .route("/api/calendar-admin/delete/:event_id", delete(protected::calendar_delete))
        .route_layer(middleware::from_fn_with_state(state, require_bearer))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/whoami", get(protected::whoami))
        .route_layer(middleware::from_fn_with_state(state, require_bearer))
}

async fn fallback() -> ApiError {
    ApiError::not_found("요청한 경로를 찾을 수 없습니다.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::auth::{IdentityError, IdentityVerifier, VerifiedIdentity};
    use crate::config::AppConfig;
    use crate::database::models::{CalendarEvent, CalendarEventFields};
    use crate::database::{CalendarEventRepository, DatabaseError, MemoryStore, Upsert};

    struct RejectAll;

    #[async_trait]
    impl IdentityVerifier for RejectAll {
        async fn verify(&self, _id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
            Err(IdentityError::InvalidToken("test".to_string()))
        }
    }

    /// Counts every repository call
    #[derive(Default)]
    struct CountingEvents {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CalendarEventRepository for CountingEvents {
        async fn list_all(&self) -> Result<Vec<CalendarEvent>, DatabaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn upsert(&self, _request: Upsert<CalendarEventFields>) -> Result<CalendarEvent, DatabaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DatabaseError::PoolExhausted)
        }

        async fn delete(&self, _event_id: i64) -> Result<CalendarEvent, DatabaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DatabaseError::PoolExhausted)
        }
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "router-test-secret".to_string();
        config
    }

    fn memory_state() -> AppState {
        AppState::memory(test_config(), MemoryStore::new(), Arc::new(RejectAll)).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn rejected_tokens_never_reach_the_repository() {
        let events = Arc::new(CountingEvents::default());
        let mut state = memory_state();
        state.events = events.clone();
        let app = app(state);

        let missing = Request::delete("/api/calendar-admin/delete/1").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(missing).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let forged = Request::delete("/api/calendar-admin/delete/1")
            .header(header::AUTHORIZATION, "Bearer forged.token.value")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(forged).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["kind"], "forbidden");

        assert_eq!(events.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pool_exhaustion_surfaces_as_503() {
        let events = Arc::new(CountingEvents::default());
        let mut state = memory_state();
        state.events = events.clone();
        let token = state.sessions.issue("admin@example.com").unwrap();
        let app = app(state);

        let request = Request::delete("/api/calendar-admin/delete/1")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(events.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_numeric_post_id_is_bad_request() {
        let app = app(memory_state());

        let request = Request::get("/api/blog-detail/abc").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "bad_request");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let state = memory_state();
        let token = state.sessions.issue("admin@example.com").unwrap();
        let app = app(state);

        let request = Request::post("/api/blog-admin/create")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\": 1"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_paths_use_the_error_envelope() {
        let app = app(memory_state());

        let request = Request::get("/api/nothing-here").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["kind"], "not_found");
    }
}
