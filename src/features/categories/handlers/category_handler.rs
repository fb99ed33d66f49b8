use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::categories::dtos::{
    CategoryListResponseDto, CreateCategoryDto, CreateCategoryResponseDto, DeleteCategoryQuery,
    ListCategoriesQuery, UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::MessageResponse;

/// List categories with their published post counts
///
/// Filters are ANDed; absent filters impose no constraint.
#[utoipa::path(
    get,
    path = "/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "List of categories", body = CategoryListResponseDto),
        (status = 500, description = "Database error")
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    AppQuery(query): AppQuery<ListCategoriesQuery>,
) -> Result<Json<CategoryListResponseDto>> {
    let categories = service.list(query.featured, query.parent).await?;
    Ok(Json(CategoryListResponseDto { categories }))
}

/// Create a new category
///
/// The slug is derived from the name; collisions get an incrementing
/// `-1`, `-2`, ... suffix.
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created successfully", body = CreateCategoryResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Database error")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<CreateCategoryResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (category_id, slug) = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateCategoryResponseDto {
            message: "Category created successfully".to_string(),
            category_id,
            slug,
        }),
    ))
}

/// Update a category
///
/// Only fields present in the body change; renaming recomputes the slug.
#[utoipa::path(
    put,
    path = "/categories",
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated successfully", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Database error")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<MessageResponse>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.update(dto).await?;
    Ok(Json(MessageResponse::new("Category updated successfully")))
}

/// Delete a category
///
/// Blocked while any posts still reference the category, whatever their
/// status.
#[utoipa::path(
    delete,
    path = "/categories",
    params(DeleteCategoryQuery),
    responses(
        (status = 200, description = "Category deleted successfully", body = MessageResponse),
        (status = 400, description = "Missing id or category still referenced by posts"),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Database error")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    AppQuery(query): AppQuery<DeleteCategoryQuery>,
) -> Result<Json<MessageResponse>> {
    service.delete(query.id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
