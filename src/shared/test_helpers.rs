//! In-memory stand-ins for the database and media store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::blogs::models::{Blog, NewBlog};
use crate::features::blogs::repositories::BlogRepository;
use crate::features::blogs::routes::BlogState;
use crate::features::blogs::BlogService;
use crate::modules::storage::{MediaStore, StoredObject};

/// Blog repository over a mutex-guarded vector
#[derive(Default)]
pub struct InMemoryBlogRepository {
    blogs: Mutex<Vec<Blog>>,
    fail_next_insert: AtomicBool,
}

impl InMemoryBlogRepository {
    pub fn seed(&self, blog_id: i64, title: &str, description: &str, image_url: &str) {
        self.blogs.lock().unwrap().push(Blog {
            id: Uuid::new_v4(),
            blog_id,
            title: title.to_string(),
            description: description.to_string(),
            image_url: image_url.to_string(),
            created_at: Utc::now(),
        });
    }

    pub fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.blogs.lock().unwrap().len()
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn insert(&self, new_blog: &NewBlog) -> Result<Blog> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut blogs = self.blogs.lock().unwrap();
        let blog_id = blogs.iter().map(|b| b.blog_id).max().unwrap_or(0) + 1;
        let blog = Blog {
            id: Uuid::new_v4(),
            blog_id,
            title: new_blog.title.clone(),
            description: new_blog.description.clone(),
            image_url: new_blog.image_url.clone(),
            created_at: Utc::now(),
        };
        blogs.push(blog.clone());
        Ok(blog)
    }

    async fn list(&self) -> Result<Vec<Blog>> {
        Ok(self.blogs.lock().unwrap().clone())
    }

    async fn find_by_blog_id(&self, blog_id: i64) -> Result<Option<Blog>> {
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.blog_id == blog_id)
            .cloned())
    }
}

/// Media store that records uploads and deletions
#[derive(Default)]
pub struct FakeMediaStore {
    uploaded: Mutex<Vec<(String, String, usize)>>,
    deleted: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
}

impl FakeMediaStore {
    pub const BASE_URL: &'static str = "http://media.test/blog";

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    /// (key, content type, byte length) of every upload
    pub fn uploaded(&self) -> Vec<(String, String, usize)> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    fn object_key(&self, file_name: &str) -> String {
        format!("public/uploads/{}", file_name)
    }

    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<StoredObject, AppError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Storage("media store unavailable".to_string()));
        }

        self.uploaded.lock().unwrap().push((
            key.to_string(),
            content_type.to_string(),
            data.len(),
        ));
        Ok(StoredObject {
            key: key.to_string(),
            url: format!("{}/{}", Self::BASE_URL, key),
        })
    }

    async fn delete(&self, key: &str) -> std::result::Result<(), AppError> {
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

/// Router state wired to fresh fakes
pub fn blog_state() -> (BlogState, Arc<InMemoryBlogRepository>, Arc<FakeMediaStore>) {
    let repository = Arc::new(InMemoryBlogRepository::default());
    let media = Arc::new(FakeMediaStore::default());
    let service = Arc::new(BlogService::new(repository.clone(), media.clone()));
    let state = BlogState {
        service,
        media: media.clone(),
    };
    (state, repository, media)
}
