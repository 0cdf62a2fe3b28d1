use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::blogs::dtos::BlogResponseDto;

/// Database model for a blog post
#[derive(Debug, Clone, FromRow)]
pub struct Blog {
    /// Storage-internal key, never exposed
    pub id: Uuid,
    /// Public sequential identifier
    pub blog_id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Fields persisted for a new blog post; the public id is assigned on insert
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub description: String,
    pub image_url: String,
}

impl From<Blog> for BlogResponseDto {
    fn from(b: Blog) -> Self {
        Self {
            id: b.blog_id,
            title: b.title,
            description: b.description,
            image_url: b.image_url,
            created_at: b.created_at,
        }
    }
}
