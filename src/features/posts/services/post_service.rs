use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{self, AppError, Result};
use crate::features::posts::dtos::{CreatePostDto, PostResponseDto, UpdatePostDto};
use crate::features::posts::models::{Post, PostStatus};
use crate::shared::slug::generate_slug;

/// How many times a write is retried when a concurrent request claims the
/// probed slug first (detected via the unique index on `slug`).
const SLUG_WRITE_ATTEMPTS: u32 = 3;

const POST_COLUMNS: &str = "id, title, slug, excerpt, content, cover_image, category_id, \
                            status, featured, published_at, created_at, updated_at";

/// Service for post operations
pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List posts matching the optional filters, newest first
    pub async fn list(
        &self,
        category: Option<Uuid>,
        status: Option<PostStatus>,
        featured: Option<bool>,
    ) -> Result<Vec<PostResponseDto>> {
        let query = format!(
            r#"
            SELECT {}
            FROM posts
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND ($2::post_status IS NULL OR status = $2)
              AND ($3::boolean IS NULL OR featured = $3)
            ORDER BY created_at DESC
            "#,
            POST_COLUMNS
        );

        let posts = sqlx::query_as::<_, Post>(&query)
            .bind(category)
            .bind(status)
            .bind(featured)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list posts: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(posts.into_iter().map(PostResponseDto::from).collect())
    }

    /// Get a published post by slug (public blog read)
    pub async fn get_by_slug(&self, slug: &str) -> Result<PostResponseDto> {
        let query = format!(
            "SELECT {} FROM posts WHERE slug = $1 AND status = 'published'",
            POST_COLUMNS
        );

        let post = sqlx::query_as::<_, Post>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get post by slug: {:?}", e);
                AppError::Database(e)
            })?;

        post.map(PostResponseDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Post '{}' not found", slug)))
    }

    /// Create a post. The slug comes from the explicit `slug` field when
    /// supplied, otherwise it is derived from the title; either way it is
    /// deduplicated against existing posts.
    ///
    /// Returns the new post's id and resolved slug.
    pub async fn create(&self, dto: CreatePostDto) -> Result<(Uuid, String)> {
        let title = dto.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }

        let base_slug = match dto.slug {
            Some(ref explicit) => explicit.clone(),
            None => generate_slug(&title),
        };
        let excerpt = dto.excerpt.unwrap_or_default();
        let content = dto.content.unwrap_or_default();
        let status = dto.status.unwrap_or_default();
        let featured = dto.featured.unwrap_or(false);

        let mut attempt = 0;
        loop {
            let slug = self.resolve_slug(&base_slug, None).await?;

            let inserted = sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO posts (title, slug, excerpt, content, cover_image, category_id, status, featured, published_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                        CASE WHEN $7 = 'published'::post_status THEN NOW() END)
                RETURNING id
                "#,
            )
            .bind(&title)
            .bind(&slug)
            .bind(&excerpt)
            .bind(&content)
            .bind(&dto.cover_image)
            .bind(dto.category)
            .bind(status)
            .bind(featured)
            .fetch_one(&self.pool)
            .await;

            match inserted {
                Ok(id) => return Ok((id, slug)),
                Err(e) if error::is_unique_violation(&e) && attempt + 1 < SLUG_WRITE_ATTEMPTS => {
                    tracing::warn!("Slug '{}' was claimed concurrently, re-probing", slug);
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to create post: {:?}", e);
                    return Err(error::from_db_error(e));
                }
            }
        }
    }

    /// Partially update a post. The slug is recomputed when `slug` or `title`
    /// is supplied (an explicit slug wins), with the record excluded from the
    /// probe. The first transition to published stamps `published_at`.
    pub async fn update(&self, dto: UpdatePostDto) -> Result<()> {
        let title = match dto.title.as_deref() {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(AppError::Validation("title cannot be empty".to_string()));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let base_slug = match (dto.slug.as_ref(), title.as_deref()) {
            (Some(explicit), _) => Some(explicit.clone()),
            (None, Some(t)) => Some(generate_slug(t)),
            (None, None) => None,
        };

        let mut attempt = 0;
        loop {
            let slug = match base_slug.as_deref() {
                Some(base) => Some(self.resolve_slug(base, Some(dto.id)).await?),
                None => None,
            };

            let result = sqlx::query(
                r#"
                UPDATE posts
                SET title = COALESCE($2, title),
                    slug = COALESCE($3, slug),
                    excerpt = COALESCE($4, excerpt),
                    content = COALESCE($5, content),
                    cover_image = CASE WHEN $6 THEN $7 ELSE cover_image END,
                    category_id = CASE WHEN $8 THEN $9 ELSE category_id END,
                    status = COALESCE($10, status),
                    featured = COALESCE($11, featured),
                    published_at = CASE
                        WHEN $10 = 'published'::post_status THEN COALESCE(published_at, NOW())
                        ELSE published_at
                    END,
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(dto.id)
            .bind(&title)
            .bind(&slug)
            .bind(&dto.excerpt)
            .bind(&dto.content)
            .bind(dto.cover_image.is_some())
            .bind(dto.cover_image.clone().flatten())
            .bind(dto.category.is_some())
            .bind(dto.category.flatten())
            .bind(dto.status)
            .bind(dto.featured)
            .execute(&self.pool)
            .await;

            match result {
                Ok(done) => {
                    if done.rows_affected() == 0 {
                        return Err(AppError::NotFound(format!(
                            "Post with id {} not found",
                            dto.id
                        )));
                    }
                    return Ok(());
                }
                Err(e)
                    if slug.is_some()
                        && error::is_unique_violation(&e)
                        && attempt + 1 < SLUG_WRITE_ATTEMPTS =>
                {
                    tracing::warn!("Slug was claimed concurrently during update, re-probing");
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to update post {}: {:?}", dto.id, e);
                    return Err(error::from_db_error(e));
                }
            }
        }
    }

    /// Delete a post
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete post {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post with id {} not found", id)));
        }

        Ok(())
    }

    /// Find a free slug starting from the base and appending `-1`, `-2`, ...
    /// until no other record holds it. `exclude_id` lets an update claim the
    /// slug it already owns.
    async fn resolve_slug(&self, base_slug: &str, exclude_id: Option<Uuid>) -> Result<String> {
        let mut candidate = base_slug.to_string();
        let mut counter = 1;

        loop {
            let taken: Option<Uuid> = sqlx::query_scalar(
                "SELECT id FROM posts WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)",
            )
            .bind(&candidate)
            .bind(exclude_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to probe slug '{}': {:?}", candidate, e);
                AppError::Database(e)
            })?;

            if taken.is_none() {
                return Ok(candidate);
            }

            candidate = format!("{}-{}", base_slug, counter);
            counter += 1;
        }
    }
}

// Tests below run against the database named by TEST_DATABASE_URL and are
// ignored by default: cargo test -- --ignored
#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_pool;

    fn unique_title(prefix: &str) -> String {
        format!("{} {}", prefix, Uuid::now_v7().simple())
    }

    fn create_dto(title: &str) -> CreatePostDto {
        CreatePostDto {
            title: title.to_string(),
            slug: None,
            excerpt: None,
            content: None,
            cover_image: None,
            category: None,
            status: None,
            featured: None,
        }
    }

    fn update_dto(id: Uuid) -> UpdatePostDto {
        UpdatePostDto {
            id,
            title: None,
            slug: None,
            excerpt: None,
            content: None,
            cover_image: None,
            category: None,
            status: None,
            featured: None,
        }
    }

    async fn find_by_id(service: &PostService, id: Uuid) -> Option<PostResponseDto> {
        service
            .list(None, None, None)
            .await
            .expect("list")
            .into_iter()
            .find(|p| p.id == id)
    }

    async fn insert_category(pool: &sqlx::PgPool) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id",
        )
        .bind("Fixture category")
        .bind(format!("fixture-{}", Uuid::now_v7().simple()))
        .fetch_one(pool)
        .await
        .expect("insert fixture category")
    }

    async fn remove_category(pool: &sqlx::PgPool, id: Uuid) {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .expect("remove fixture category");
    }

    #[tokio::test]
    #[ignore]
    async fn test_create_derives_slug_from_title() {
        let service = PostService::new(test_pool().await);
        let title = unique_title("Launch Notes");

        let (id, slug) = service.create(create_dto(&title)).await.expect("create");

        assert_eq!(slug, crate::shared::slug::generate_slug(&title));

        let listed = find_by_id(&service, id).await.expect("listed");
        assert_eq!(listed.title, title);
        assert_eq!(listed.status, PostStatus::Draft);
        assert_eq!(listed.published_at, None);
        assert_eq!(listed.excerpt, "");
        assert_eq!(listed.content, "");

        service.delete(id).await.expect("cleanup");
    }

    #[tokio::test]
    #[ignore]
    async fn test_explicit_slug_wins_and_is_deduplicated() {
        let service = PostService::new(test_pool().await);
        let explicit = format!("custom-{}", Uuid::now_v7().simple());

        let mut first = create_dto(&unique_title("First"));
        first.slug = Some(explicit.clone());
        let (first_id, first_slug) = service.create(first).await.expect("create");
        assert_eq!(first_slug, explicit);

        let mut second = create_dto(&unique_title("Second"));
        second.slug = Some(explicit.clone());
        let (second_id, second_slug) = service.create(second).await.expect("create");
        assert_eq!(second_slug, format!("{}-1", explicit));

        service.delete(second_id).await.expect("cleanup");
        service.delete(first_id).await.expect("cleanup");
    }

    #[tokio::test]
    #[ignore]
    async fn test_publishing_stamps_published_at_once() {
        let service = PostService::new(test_pool().await);

        let (id, _) = service
            .create(create_dto(&unique_title("Draft")))
            .await
            .expect("create");

        let mut publish = update_dto(id);
        publish.status = Some(PostStatus::Published);
        service.update(publish).await.expect("publish");

        let first_stamp = find_by_id(&service, id)
            .await
            .expect("listed")
            .published_at
            .expect("published_at set");

        // Unrelated update and a repeated publish keep the original stamp.
        let mut touch = update_dto(id);
        touch.excerpt = Some("Updated excerpt".to_string());
        service.update(touch).await.expect("touch");

        let mut republish = update_dto(id);
        republish.status = Some(PostStatus::Published);
        service.update(republish).await.expect("republish");

        let listed = find_by_id(&service, id).await.expect("listed");
        assert_eq!(listed.published_at, Some(first_stamp));
        assert_eq!(listed.excerpt, "Updated excerpt");

        service.delete(id).await.expect("cleanup");
    }

    #[tokio::test]
    #[ignore]
    async fn test_get_by_slug_returns_published_only() {
        let service = PostService::new(test_pool().await);

        let mut published = create_dto(&unique_title("Public"));
        published.status = Some(PostStatus::Published);
        let (published_id, published_slug) = service.create(published).await.expect("create");

        let (draft_id, draft_slug) = service
            .create(create_dto(&unique_title("Hidden")))
            .await
            .expect("create");

        let found = service.get_by_slug(&published_slug).await.expect("get");
        assert_eq!(found.id, published_id);
        assert!(found.published_at.is_some());

        match service.get_by_slug(&draft_slug).await {
            Err(AppError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {:?}", other.map(|p| p.id)),
        }

        service.delete(draft_id).await.expect("cleanup");
        service.delete(published_id).await.expect("cleanup");
    }

    #[tokio::test]
    #[ignore]
    async fn test_list_filters_and_orders_newest_first() {
        let pool = test_pool().await;
        let service = PostService::new(pool.clone());
        let category_id = insert_category(&pool).await;

        let mut older = create_dto(&unique_title("Older"));
        older.category = Some(category_id);
        older.status = Some(PostStatus::Published);
        let (older_id, _) = service.create(older).await.expect("create");

        let mut newer = create_dto(&unique_title("Newer"));
        newer.category = Some(category_id);
        newer.status = Some(PostStatus::Published);
        let (newer_id, _) = service.create(newer).await.expect("create");

        let mut draft = create_dto(&unique_title("Draft"));
        draft.category = Some(category_id);
        let (draft_id, _) = service.create(draft).await.expect("create");

        let published = service
            .list(Some(category_id), Some(PostStatus::Published), None)
            .await
            .expect("list");

        let ids: Vec<Uuid> = published.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer_id, older_id]);
        assert!(published.iter().all(|p| p.category == Some(category_id)));

        service.delete(draft_id).await.expect("cleanup");
        service.delete(newer_id).await.expect("cleanup");
        service.delete(older_id).await.expect("cleanup");
        remove_category(&pool, category_id).await;
    }

    #[tokio::test]
    #[ignore]
    async fn test_create_with_unknown_category_is_rejected() {
        let service = PostService::new(test_pool().await);

        let mut dto = create_dto(&unique_title("Orphan"));
        dto.category = Some(Uuid::now_v7());

        match service.create(dto).await {
            Err(AppError::BadRequest(msg)) => {
                assert!(msg.contains("does not exist"), "message was: {}", msg);
            }
            other => panic!("expected BadRequest, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_update_clears_category_with_explicit_null() {
        let pool = test_pool().await;
        let service = PostService::new(pool.clone());
        let category_id = insert_category(&pool).await;

        let mut dto = create_dto(&unique_title("Assigned"));
        dto.category = Some(category_id);
        let (id, _) = service.create(dto).await.expect("create");

        let mut clear = update_dto(id);
        clear.category = Some(None);
        service.update(clear).await.expect("clear category");

        let listed = find_by_id(&service, id).await.expect("listed");
        assert_eq!(listed.category, None);

        service.delete(id).await.expect("cleanup");
        remove_category(&pool, category_id).await;
    }

    #[tokio::test]
    #[ignore]
    async fn test_update_missing_post_is_not_found() {
        let service = PostService::new(test_pool().await);

        let mut update = update_dto(Uuid::now_v7());
        update.content = Some("anything".to_string());

        match service.update(update).await {
            Err(AppError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_delete_post_then_missing() {
        let service = PostService::new(test_pool().await);

        let (id, _) = service
            .create(create_dto(&unique_title("Ephemeral")))
            .await
            .expect("create");

        service.delete(id).await.expect("delete");
        assert!(find_by_id(&service, id).await.is_none());

        match service.delete(id).await {
            Err(AppError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
