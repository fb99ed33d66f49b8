use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::posts::{
    dtos as posts_dtos, handlers as posts_handlers, models as posts_models,
};
use crate::shared::types::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::list_categories,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Posts
        posts_handlers::list_posts,
        posts_handlers::get_post_by_slug,
        posts_handlers::create_post,
        posts_handlers::update_post,
        posts_handlers::delete_post,
    ),
    components(
        schemas(
            // Shared
            MessageResponse,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryListResponseDto,
            categories_dtos::CreateCategoryResponseDto,
            // Posts
            posts_models::PostStatus,
            posts_dtos::CreatePostDto,
            posts_dtos::UpdatePostDto,
            posts_dtos::PostResponseDto,
            posts_dtos::PostListResponseDto,
            posts_dtos::CreatePostResponseDto,
        )
    ),
    tags(
        (name = "categories", description = "Blog category management"),
        (name = "posts", description = "Blog post management"),
    ),
    info(
        title = "Atrium API",
        version = "0.1.0",
        description = "Content API for the Atrium marketing site and blog",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
