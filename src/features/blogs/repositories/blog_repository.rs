use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::blogs::models::{Blog, NewBlog};

/// Advisory lock key serializing public id assignment ("blog" in ASCII)
const BLOG_ID_LOCK_KEY: i64 = 0x626c_6f67;

/// Persistence for blog posts
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Insert a post, assigning `blog_id` = max existing + 1 (1 when empty)
    async fn insert(&self, new_blog: &NewBlog) -> Result<Blog>;

    async fn list(&self) -> Result<Vec<Blog>>;

    async fn find_by_blog_id(&self, blog_id: i64) -> Result<Option<Blog>>;
}

/// PostgreSQL-backed blog repository
pub struct PgBlogRepository {
    pool: PgPool,
}

impl PgBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for PgBlogRepository {
    async fn insert(&self, new_blog: &NewBlog) -> Result<Blog> {
        let mut tx = self.pool.begin().await?;

        // Held until commit/rollback, so the MAX read and the insert are one step
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BLOG_ID_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let blog = sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (blog_id, title, description, image_url)
            SELECT COALESCE(MAX(blog_id), 0) + 1, $1, $2, $3
            FROM blogs
            RETURNING id, blog_id, title, description, image_url, created_at
            "#,
        )
        .bind(&new_blog.title)
        .bind(&new_blog.description)
        .bind(&new_blog.image_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert blog: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await?;

        Ok(blog)
    }

    async fn list(&self) -> Result<Vec<Blog>> {
        let blogs = sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, blog_id, title, description, image_url, created_at
            FROM blogs
            ORDER BY blog_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list blogs: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(blogs)
    }

    async fn find_by_blog_id(&self, blog_id: i64) -> Result<Option<Blog>> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, blog_id, title, description, image_url, created_at
            FROM blogs
            WHERE blog_id = $1
            "#,
        )
        .bind(blog_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get blog by id: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(blog)
    }
}
