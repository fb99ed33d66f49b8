use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{self, AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::Category;
use crate::shared::slug::generate_slug;

/// How many times a write is retried when a concurrent request claims the
/// probed slug first (detected via the unique index on `slug`).
const SLUG_WRITE_ATTEMPTS: u32 = 3;

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List categories matching the optional filters, ordered by name.
    /// Each entry carries `blog_count`, the number of published posts
    /// assigned to it.
    pub async fn list(
        &self,
        featured: Option<bool>,
        parent: Option<Uuid>,
    ) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, featured, color, icon, created_at, updated_at
            FROM categories
            WHERE ($1::boolean IS NULL OR featured = $1)
              AND ($2::uuid IS NULL OR parent_id = $2)
            ORDER BY name ASC
            "#,
        )
        .bind(featured)
        .bind(parent)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        let mut result = Vec::with_capacity(categories.len());
        for category in categories {
            let blog_count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM posts WHERE category_id = $1 AND status = 'published'",
            )
            .bind(category.id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count published posts for category: {:?}", e);
                AppError::Database(e)
            })?;

            result.push(CategoryResponseDto::from_category(category, blog_count));
        }

        Ok(result)
    }

    /// Create a category with a slug derived from its name.
    ///
    /// Returns the new category's id and resolved slug.
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<(Uuid, String)> {
        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }

        let base_slug = generate_slug(&name);
        let description = dto.description.unwrap_or_default();
        let featured = dto.featured.unwrap_or(false);

        let mut attempt = 0;
        loop {
            let slug = self.resolve_slug(&base_slug, None).await?;

            let inserted = sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO categories (parent_id, name, slug, description, featured, color, icon)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
                "#,
            )
            .bind(dto.parent)
            .bind(&name)
            .bind(&slug)
            .bind(&description)
            .bind(featured)
            .bind(&dto.color)
            .bind(&dto.icon)
            .fetch_one(&self.pool)
            .await;

            match inserted {
                Ok(id) => return Ok((id, slug)),
                Err(e) if error::is_unique_violation(&e) && attempt + 1 < SLUG_WRITE_ATTEMPTS => {
                    tracing::warn!("Slug '{}' was claimed concurrently, re-probing", slug);
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to create category: {:?}", e);
                    return Err(error::from_db_error(e));
                }
            }
        }
    }

    /// Partially update a category. Only fields present in the request change;
    /// a new name recomputes the slug with the record excluded from the probe,
    /// so an idempotent rename keeps its current slug.
    pub async fn update(&self, dto: UpdateCategoryDto) -> Result<()> {
        let name = match dto.name.as_deref() {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(AppError::Validation("name cannot be empty".to_string()));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let mut attempt = 0;
        loop {
            let slug = match name.as_deref() {
                Some(n) => Some(self.resolve_slug(&generate_slug(n), Some(dto.id)).await?),
                None => None,
            };

            let result = sqlx::query(
                r#"
                UPDATE categories
                SET name = COALESCE($2, name),
                    slug = COALESCE($3, slug),
                    description = COALESCE($4, description),
                    featured = COALESCE($5, featured),
                    parent_id = CASE WHEN $6 THEN $7 ELSE parent_id END,
                    color = CASE WHEN $8 THEN $9 ELSE color END,
                    icon = CASE WHEN $10 THEN $11 ELSE icon END,
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(dto.id)
            .bind(&name)
            .bind(&slug)
            .bind(&dto.description)
            .bind(dto.featured)
            .bind(dto.parent.is_some())
            .bind(dto.parent.flatten())
            .bind(dto.color.is_some())
            .bind(dto.color.clone().flatten())
            .bind(dto.icon.is_some())
            .bind(dto.icon.clone().flatten())
            .execute(&self.pool)
            .await;

            match result {
                Ok(done) => {
                    if done.rows_affected() == 0 {
                        return Err(AppError::NotFound(format!(
                            "Category with id {} not found",
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
                    tracing::warn!("Slug was claimed concurrently during rename, re-probing");
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to update category {}: {:?}", dto.id, e);
                    return Err(error::from_db_error(e));
                }
            }
        }
    }

    /// Delete a category, refusing while any posts still reference it
    /// (drafts included).
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let post_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE category_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count posts for category {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        if post_count > 0 {
            return Err(AppError::BadRequest(format!(
                "Cannot delete category: {} post(s) are still assigned to it. Reassign those posts to another category first.",
                post_count
            )));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
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
                "SELECT id FROM categories WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)",
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
