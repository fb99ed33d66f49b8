pub mod category_dto;

pub use category_dto::{
    CategoryListResponseDto, CategoryResponseDto, CreateCategoryDto, CreateCategoryResponseDto,
    DeleteCategoryQuery, ListCategoriesQuery, UpdateCategoryDto,
};
