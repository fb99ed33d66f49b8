pub mod post_dto;

pub use post_dto::{
    CreatePostDto, CreatePostResponseDto, DeletePostQuery, ListPostsQuery, PostListResponseDto,
    PostResponseDto, UpdatePostDto,
};
