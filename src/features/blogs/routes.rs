use std::sync::Arc;

use axum::{extract::FromRef, routing::get, Router};

use crate::features::blogs::handlers;
use crate::features::blogs::services::BlogService;
use crate::modules::storage::MediaStore;

/// Shared handles for the blog routes
#[derive(Clone, FromRef)]
pub struct BlogState {
    pub service: Arc<BlogService>,
    /// Used by the upload stage before the create handler runs
    pub media: Arc<dyn MediaStore>,
}

/// Create routes for the blogs feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(state: BlogState) -> Router {
    Router::new()
        .route(
            "/api/blogs",
            get(handlers::list_blogs).post(handlers::create_blog),
        )
        .route("/api/blogs/{id}", get(handlers::get_blog))
        .with_state(state)
}
