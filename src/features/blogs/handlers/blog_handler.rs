use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::features::blogs::dtos::{BlogResponseDto, CreateBlogDto, CreateBlogInput};
use crate::features::blogs::services::BlogService;
use crate::features::blogs::upload::UploadedBlogForm;
use crate::shared::types::ErrorResponse;

/// Create a blog post
///
/// Accepts multipart/form-data with:
/// - `blog_title`: Post title (required)
/// - `blog_description`: Post body (required)
/// - `blog_image`: Cover image, jpg/jpeg/png (required)
#[utoipa::path(
    post,
    path = "/api/blogs",
    tag = "blogs",
    request_body(
        content = CreateBlogDto,
        content_type = "multipart/form-data",
        description = "Blog form with title, description and image file",
    ),
    responses(
        (status = 201, description = "Blog created", body = BlogResponseDto),
        (status = 400, description = "Missing field or unsupported image format", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_blog(
    State(service): State<Arc<BlogService>>,
    form: UploadedBlogForm,
) -> Result<(StatusCode, Json<BlogResponseDto>)> {
    let input = CreateBlogInput::new(form.title, form.description, form.image);
    let blog = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// List all blog posts
#[utoipa::path(
    get,
    path = "/api/blogs",
    tag = "blogs",
    responses(
        (status = 200, description = "All blog posts", body = Vec<BlogResponseDto>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_blogs(
    State(service): State<Arc<BlogService>>,
) -> Result<Json<Vec<BlogResponseDto>>> {
    let blogs = service.list().await?;
    Ok(Json(blogs))
}

/// Get a blog post by its public id
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    tag = "blogs",
    params(
        ("id" = i64, Path, description = "Public blog id")
    ),
    responses(
        (status = 200, description = "Blog found", body = BlogResponseDto),
        (status = 404, description = "Blog not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_blog(
    State(service): State<Arc<BlogService>>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponseDto>> {
    let blog = service.get_by_id(&id).await?;
    Ok(Json(blog))
}
