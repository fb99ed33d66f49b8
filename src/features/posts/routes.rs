use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::posts::handlers;
use crate::features::posts::services::PostService;

/// Create routes for the posts feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<PostService>) -> Router {
    Router::new()
        .route(
            "/posts",
            get(handlers::list_posts)
                .post(handlers::create_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/posts/{slug}", get(handlers::get_post_by_slug))
        .with_state(service)
}
