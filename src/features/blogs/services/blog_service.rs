use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::blogs::dtos::{BlogResponseDto, CreateBlogInput, MISSING_FIELDS_MESSAGE};
use crate::features::blogs::models::NewBlog;
use crate::features::blogs::repositories::BlogRepository;
use crate::modules::storage::MediaStore;

/// Message returned when no post matches the requested id
pub const BLOG_NOT_FOUND_MESSAGE: &str = "Blog not found";

/// Service for blog post operations
pub struct BlogService {
    repository: Arc<dyn BlogRepository>,
    media: Arc<dyn MediaStore>,
}

impl BlogService {
    pub fn new(repository: Arc<dyn BlogRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { repository, media }
    }

    /// Persist a post whose image has already been uploaded.
    ///
    /// If the post cannot be saved the uploaded image is deleted again, so a
    /// failed create leaves nothing behind in the media store.
    ///
    /// Over HTTP the upload extractor has already rejected empty fields. The
    /// check here covers callers that build `CreateBlogInput` directly.
    pub async fn create(&self, input: CreateBlogInput) -> Result<BlogResponseDto> {
        if input.validate().is_err() {
            self.discard_image(&input.image_key).await;
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }

        let new_blog = NewBlog {
            title: input.title,
            description: input.description,
            image_url: input.image_url,
        };

        let blog = match self.repository.insert(&new_blog).await {
            Ok(blog) => blog,
            Err(e) => {
                self.discard_image(&input.image_key).await;
                return Err(e);
            }
        };

        info!("Blog created: id={}, image={}", blog.blog_id, blog.image_url);

        Ok(blog.into())
    }

    /// List every post
    pub async fn list(&self) -> Result<Vec<BlogResponseDto>> {
        let blogs = self.repository.list().await?;
        Ok(blogs.into_iter().map(|b| b.into()).collect())
    }

    /// Get a post by the raw `id` path segment.
    ///
    /// Segments that are not integers can never match an assigned id and are
    /// reported as not found.
    pub async fn get_by_id(&self, raw_id: &str) -> Result<BlogResponseDto> {
        let Ok(blog_id) = raw_id.parse::<i64>() else {
            return Err(AppError::NotFound(BLOG_NOT_FOUND_MESSAGE.to_string()));
        };

        self.repository
            .find_by_blog_id(blog_id)
            .await?
            .map(|b| b.into())
            .ok_or_else(|| AppError::NotFound(BLOG_NOT_FOUND_MESSAGE.to_string()))
    }

    async fn discard_image(&self, key: &str) {
        match self.media.delete(key).await {
            Ok(()) => info!("Discarded image of failed blog create: {}", key),
            Err(e) => warn!("Failed to discard orphaned image '{}': {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::StoredObject;
    use crate::shared::test_helpers::{FakeMediaStore, InMemoryBlogRepository};

    fn stored(name: &str) -> StoredObject {
        StoredObject {
            key: format!("public/uploads/{}", name),
            url: format!("http://media.test/blog/public/uploads/{}", name),
        }
    }

    fn service() -> (BlogService, Arc<InMemoryBlogRepository>, Arc<FakeMediaStore>) {
        let repository = Arc::new(InMemoryBlogRepository::default());
        let media = Arc::new(FakeMediaStore::default());
        let service = BlogService::new(repository.clone(), media.clone());
        (service, repository, media)
    }

    #[tokio::test]
    async fn test_create_assigns_max_plus_one() {
        let (service, repository, _) = service();
        repository.seed(41, "old", "seeded", "http://media.test/old.png");

        let blog = service
            .create(CreateBlogInput::new(
                "A".to_string(),
                "d1".to_string(),
                stored("a.png"),
            ))
            .await
            .unwrap();

        assert_eq!(blog.id, 42);
        assert_eq!(blog.title, "A");
        assert_eq!(blog.image_url, "http://media.test/blog/public/uploads/a.png");
    }

    #[tokio::test]
    async fn test_create_first_post_gets_id_one() {
        let (service, _, _) = service();

        let blog = service
            .create(CreateBlogInput::new(
                "A".to_string(),
                "d1".to_string(),
                stored("a.png"),
            ))
            .await
            .unwrap();

        assert_eq!(blog.id, 1);
    }

    #[tokio::test]
    async fn test_create_called_directly_with_empty_title_discards_image() {
        let (service, repository, media) = service();

        let err = service
            .create(CreateBlogInput::new(
                String::new(),
                "d1".to_string(),
                stored("a.png"),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == MISSING_FIELDS_MESSAGE));
        assert_eq!(repository.len(), 0);
        assert_eq!(media.deleted(), vec!["public/uploads/a.png".to_string()]);
    }

    #[tokio::test]
    async fn test_create_storage_failure_discards_image() {
        let (service, repository, media) = service();
        repository.fail_next_insert();

        let err = service
            .create(CreateBlogInput::new(
                "A".to_string(),
                "d1".to_string(),
                stored("a.png"),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(repository.len(), 0);
        assert_eq!(media.deleted(), vec!["public/uploads/a.png".to_string()]);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_and_non_numeric() {
        let (service, repository, _) = service();
        repository.seed(1, "A", "d1", "http://media.test/a.png");

        assert!(service.get_by_id("1").await.is_ok());
        assert!(matches!(
            service.get_by_id("99").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_by_id("abc").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_returns_every_post() {
        let (service, repository, _) = service();
        repository.seed(1, "A", "d1", "http://media.test/a.png");
        repository.seed(2, "B", "d2", "http://media.test/b.png");

        let mut ids: Vec<i64> = service.list().await.unwrap().iter().map(|b| b.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }
}
