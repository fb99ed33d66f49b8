use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::types::double_option;

/// Query params for listing categories
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// Only return categories with this featured flag
    pub featured: Option<bool>,

    /// Only return categories with this parent category id
    pub parent: Option<Uuid>,
}

/// Query params for deleting a category
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DeleteCategoryQuery {
    /// Category ID
    pub id: Uuid,
}

// Create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub description: Option<String>,

    pub parent: Option<Uuid>,

    pub featured: Option<bool>,

    pub color: Option<String>,

    pub icon: Option<String>,
}

// Update request. Clearable fields are double-wrapped so an explicit null
// (clear the value) stays distinct from an omitted field (keep the value).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    /// Category ID
    pub id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub parent: Option<Option<Uuid>>,

    pub featured: Option<bool>,

    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
}

/// Response DTO for category, including its published post count
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub parent: Option<Uuid>,
    pub featured: bool,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub blog_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryResponseDto {
    pub fn from_category(c: Category, blog_count: i64) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            parent: c.parent_id,
            featured: c.featured,
            color: c.color,
            icon: c.icon,
            blog_count,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for category listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryListResponseDto {
    pub categories: Vec<CategoryResponseDto>,
}

/// Response DTO for category creation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryResponseDto {
    pub message: String,
    pub category_id: Uuid,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_response_dto_uses_camel_case_field_names() {
        let dto = CategoryResponseDto {
            id: Uuid::nil(),
            name: "News".to_string(),
            slug: "news".to_string(),
            description: String::new(),
            parent: None,
            featured: false,
            color: None,
            icon: None,
            blog_count: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["blogCount"], 3);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("blog_count").is_none());

        let created = CreateCategoryResponseDto {
            message: "Category created successfully".to_string(),
            category_id: Uuid::nil(),
            slug: "news".to_string(),
        };
        let json = serde_json::to_value(&created).unwrap();
        assert!(json.get("categoryId").is_some());
    }

    #[test]
    fn test_update_dto_distinguishes_absent_null_and_value() {
        let absent: UpdateCategoryDto = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
        }))
        .unwrap();
        assert_eq!(absent.parent, None);
        assert_eq!(absent.color, None);

        let cleared: UpdateCategoryDto = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "parent": null,
            "color": null,
        }))
        .unwrap();
        assert_eq!(cleared.parent, Some(None));
        assert_eq!(cleared.color, Some(None));

        let set: UpdateCategoryDto = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "parent": Uuid::nil(),
            "color": "#ff0000",
        }))
        .unwrap();
        assert_eq!(set.parent, Some(Some(Uuid::nil())));
        assert_eq!(set.color, Some(Some("#ff0000".to_string())));
    }

    #[test]
    fn test_update_dto_description_empty_string_is_explicit() {
        let dto: UpdateCategoryDto = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "description": "",
        }))
        .unwrap();
        assert_eq!(dto.description, Some(String::new()));

        let dto: UpdateCategoryDto = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
        }))
        .unwrap();
        assert_eq!(dto.description, None);
    }
}
