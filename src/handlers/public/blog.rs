// handlers/public/blog.rs - Blog read endpoints

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::handlers::{path_id, repository_error};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub const POST_NOT_FOUND: &str = "주어진 post_id에 해당하는 게시물을 찾을 수 없습니다.";

/// GET /api/blog/list - every post without its body, ordered by id
pub async fn blog_list(State(state): State<AppState>) -> ApiResult<Value> {
    let posts = state
        .posts
        .list_all()
        .await
        .map_err(repository_error(POST_NOT_FOUND, "블로그 게시물 목록 조회에 실패했습니다."))?;

    Ok(ApiResponse::success(json!({
        "message": "블로그 게시물 목록을 성공적으로 조회했습니다.",
        "blogPosts": posts,
    })))
}

/// GET /api/blog-detail/:post_id - full post; each call counts one view
pub async fn blog_detail(
    State(state): State<AppState>,
    post_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let post_id = path_id(post_id)?;

    let post = state
        .posts
        .get_detail(post_id)
        .await
        .map_err(repository_error(POST_NOT_FOUND, "블로그 게시물 디테일 페이지 조회에 실패했습니다."))?;

    Ok(ApiResponse::success(json!({
        "message": "블로그 게시물 디테일 페이지를 성공적으로 가져왔습니다.",
        "blogPostDetail": post,
    })))
}
