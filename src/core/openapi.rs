use utoipa::{Modify, OpenApi};

use crate::features::blogs::{dtos as blogs_dtos, handlers as blogs_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Blogs
        blogs_handlers::create_blog,
        blogs_handlers::list_blogs,
        blogs_handlers::get_blog,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Blogs
            blogs_dtos::CreateBlogDto,
            blogs_dtos::BlogResponseDto,
        )
    ),
    tags(
        (name = "blogs", description = "Blog posts with uploaded images"),
    ),
    info(
        title = "Blog API",
        version = "0.1.0",
        description = "API documentation for the blog service",
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
