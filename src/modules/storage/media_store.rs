use async_trait::async_trait;

use crate::core::error::AppError;

/// An object accepted by the media backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key inside the bucket, used for deletion
    pub key: String,
    /// Durable public URL of the object
    pub url: String,
}

/// Object storage for uploaded blog images
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Full object key for `file_name` inside the blog image folder
    fn object_key(&self, file_name: &str) -> String;

    /// Store `data` under `key` and return its public URL
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, AppError>;

    /// Remove a previously stored object
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}
