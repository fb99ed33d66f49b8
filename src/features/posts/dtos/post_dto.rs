use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::posts::models::{Post, PostStatus};
use crate::shared::types::double_option;
use crate::shared::validation::SLUG_REGEX;

/// Query params for listing posts
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListPostsQuery {
    /// Only return posts assigned to this category id
    pub category: Option<Uuid>,

    /// Only return posts with this status
    pub status: Option<PostStatus>,

    /// Only return posts with this featured flag
    pub featured: Option<bool>,
}

/// Query params for deleting a post
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DeletePostQuery {
    /// Post ID
    pub id: Uuid,
}

// Create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostDto {
    #[validate(length(min = 1, max = 300))]
    pub title: String,

    /// Optional explicit slug; derived from the title when omitted
    #[validate(regex(
        path = *SLUG_REGEX,
        message = "slug must be lowercase alphanumeric with single hyphen separators (e.g., 'my-first-post')"
    ))]
    pub slug: Option<String>,

    pub excerpt: Option<String>,

    pub content: Option<String>,

    pub cover_image: Option<String>,

    pub category: Option<Uuid>,

    pub status: Option<PostStatus>,

    pub featured: Option<bool>,
}

// Update request. Clearable fields are double-wrapped so an explicit null
// (clear the value) stays distinct from an omitted field (keep the value).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostDto {
    /// Post ID
    pub id: Uuid,

    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,

    /// Explicit slug; wins over a slug recomputed from a new title
    #[validate(regex(
        path = *SLUG_REGEX,
        message = "slug must be lowercase alphanumeric with single hyphen separators (e.g., 'my-first-post')"
    ))]
    pub slug: Option<String>,

    pub excerpt: Option<String>,

    pub content: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub cover_image: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<Uuid>>,

    pub status: Option<PostStatus>,

    pub featured: Option<bool>,
}

/// Response DTO for post
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponseDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub category: Option<Uuid>,
    pub status: PostStatus,
    pub featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponseDto {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            excerpt: p.excerpt,
            content: p.content,
            cover_image: p.cover_image,
            category: p.category_id,
            status: p.status,
            featured: p.featured,
            published_at: p.published_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Response DTO for post listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostListResponseDto {
    pub posts: Vec<PostResponseDto>,
}

/// Response DTO for post creation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponseDto {
    pub message: String,
    pub post_id: Uuid,
    pub slug: String,
}
