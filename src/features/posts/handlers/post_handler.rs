use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::posts::dtos::{
    CreatePostDto, CreatePostResponseDto, DeletePostQuery, ListPostsQuery, PostListResponseDto,
    PostResponseDto, UpdatePostDto,
};
use crate::features::posts::services::PostService;
use crate::shared::types::MessageResponse;

/// List posts
///
/// Filters are ANDed; absent filters impose no constraint.
#[utoipa::path(
    get,
    path = "/posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "List of posts, newest first", body = PostListResponseDto),
        (status = 500, description = "Database error")
    ),
    tag = "posts"
)]
pub async fn list_posts(
    State(service): State<Arc<PostService>>,
    AppQuery(query): AppQuery<ListPostsQuery>,
) -> Result<Json<PostListResponseDto>> {
    let posts = service
        .list(query.category, query.status, query.featured)
        .await?;
    Ok(Json(PostListResponseDto { posts }))
}

/// Get a published post by slug
#[utoipa::path(
    get,
    path = "/posts/{slug}",
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 200, description = "Post found", body = PostResponseDto),
        (status = 404, description = "Post not found or not published")
    ),
    tag = "posts"
)]
pub async fn get_post_by_slug(
    State(service): State<Arc<PostService>>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponseDto>> {
    let post = service.get_by_slug(&slug).await?;
    Ok(Json(post))
}

/// Create a new post
///
/// The slug comes from the `slug` field when supplied, otherwise from the
/// title; collisions get an incrementing `-1`, `-2`, ... suffix.
#[utoipa::path(
    post,
    path = "/posts",
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created successfully", body = CreatePostResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Database error")
    ),
    tag = "posts"
)]
pub async fn create_post(
    State(service): State<Arc<PostService>>,
    AppJson(dto): AppJson<CreatePostDto>,
) -> Result<(StatusCode, Json<CreatePostResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (post_id, slug) = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponseDto {
            message: "Post created successfully".to_string(),
            post_id,
            slug,
        }),
    ))
}

/// Update a post
///
/// Only fields present in the body change; the first transition to
/// published stamps the publication time.
#[utoipa::path(
    put,
    path = "/posts",
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated successfully", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Database error")
    ),
    tag = "posts"
)]
pub async fn update_post(
    State(service): State<Arc<PostService>>,
    AppJson(dto): AppJson<UpdatePostDto>,
) -> Result<Json<MessageResponse>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.update(dto).await?;
    Ok(Json(MessageResponse::new("Post updated successfully")))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/posts",
    params(DeletePostQuery),
    responses(
        (status = 200, description = "Post deleted successfully", body = MessageResponse),
        (status = 400, description = "Missing or invalid id"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Database error")
    ),
    tag = "posts"
)]
pub async fn delete_post(
    State(service): State<Arc<PostService>>,
    AppQuery(query): AppQuery<DeletePostQuery>,
) -> Result<Json<MessageResponse>> {
    service.delete(query.id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;

    use crate::features::posts::routes;
    use crate::features::posts::services::PostService;
    use crate::shared::test_helpers::lazy_test_pool;

    /// Requests rejected before any query runs never touch the database,
    /// so a lazy pool is enough for these.
    fn test_server() -> TestServer {
        let service = Arc::new(PostService::new(lazy_test_pool()));
        TestServer::new(routes::routes(service)).expect("test server")
    }

    #[tokio::test]
    async fn test_create_post_without_title_is_rejected() {
        let server = test_server();

        let response = server.post("/posts").json(&json!({})).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_post_with_blank_title_is_rejected() {
        let server = test_server();

        let response = server.post("/posts").json(&json!({ "title": "  " })).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "title cannot be empty");
    }

    #[tokio::test]
    async fn test_create_post_with_malformed_slug_is_rejected() {
        let server = test_server();

        let response = server
            .post("/posts")
            .json(&json!({ "title": "Launch", "slug": "Not A Slug!" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_post_without_id_is_rejected() {
        let server = test_server();

        let response = server
            .put("/posts")
            .json(&json!({ "title": "Renamed" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_post_without_id_is_rejected() {
        let server = test_server();

        let response = server.delete("/posts").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_posts_with_unknown_status_is_rejected() {
        let server = test_server();

        let response = server
            .get("/posts")
            .add_query_param("status", "live")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}
