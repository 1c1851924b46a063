// handlers/protected/whoami.rs - GET /api/auth/whoami handler

use axum::{response::Json, Extension};
use serde_json::{json, Value};

use crate::middleware::AuthUser;

/// Identity carried by the caller's session token
pub async fn whoami(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "email": user.email,
        "exp": user.exp,
    }))
}
