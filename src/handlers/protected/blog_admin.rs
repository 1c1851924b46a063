// handlers/protected/blog_admin.rs - Blog write endpoints (bearer token required)

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::database::models::BlogPostFields;
use crate::database::Upsert;
use crate::handlers::public::POST_NOT_FOUND;
use crate::handlers::{json_body, path_id, repository_error};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

const UPSERT_FAILED: &str = "블로그 게시물 생성 또는 수정에 실패했습니다.";

/// Body of POST /api/blog-admin/create. A present `post_id` turns the call
/// into an update of that post, including id 0.
#[derive(Debug, Deserialize)]
pub struct BlogPostRequest {
    pub post_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub thumbnail: Option<String>,
}

impl BlogPostRequest {
    fn into_upsert(self) -> Upsert<BlogPostFields> {
        let fields = BlogPostFields {
            title: self.title,
            content: self.content,
            thumbnail: self.thumbnail,
        };
        Upsert::from_optional_id(self.post_id, fields)
    }
}

/// POST /api/blog-admin/create - 201 on create, 200 on update
pub async fn blog_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<BlogPostRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let upsert = json_body(body)?.into_upsert();
    let created = upsert.is_create();

    let post = state
        .posts
        .upsert(upsert)
        .await
        .map_err(repository_error(POST_NOT_FOUND, UPSERT_FAILED))?;

    if created {
        info!(post_id = post.post_id, by = %user.email, "Created blog post");
        Ok(ApiResponse::created(json!({
            "message": "블로그 게시물을 성공적으로 생성했습니다.",
            "blogPost": post,
        })))
    } else {
        info!(post_id = post.post_id, by = %user.email, "Updated blog post");
        Ok(ApiResponse::success(json!({
            "message": "블로그 게시물을 성공적으로 수정했습니다.",
            "blogPost": post,
        })))
    }
}

/// PUT /api/blog-admin/update/:post_id
pub async fn blog_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    post_id: Result<Path<i64>, PathRejection>,
    body: Result<Json<BlogPostFields>, JsonRejection>,
) -> ApiResult<Value> {
    let post_id = path_id(post_id)?;
    let fields = json_body(body)?;

    let post = state
        .posts
        .upsert(Upsert::Update { id: post_id, fields })
        .await
        .map_err(repository_error(POST_NOT_FOUND, UPSERT_FAILED))?;

    info!(post_id, by = %user.email, "Updated blog post");
    Ok(ApiResponse::success(json!({
        "message": "블로그 게시물을 성공적으로 수정했습니다.",
        "blogPost": post,
    })))
}

/// DELETE /api/blog-admin/delete/:post_id - returns the removed post
pub async fn blog_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    post_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let post_id = path_id(post_id)?;

    let deleted = state
        .posts
        .delete(post_id)
        .await
        .map_err(repository_error(POST_NOT_FOUND, "블로그 게시물 삭제에 실패했습니다."))?;

    info!(post_id, by = %user.email, "Deleted blog post");
    Ok(ApiResponse::success(json!({
        "message": "블로그 게시물을 성공적으로 삭제했습니다.",
        "deletedPost": deleted,
    })))
}
