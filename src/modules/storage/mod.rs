//! Storage module for blog images
//!
//! Provides the `MediaStore` abstraction and its MinIO/S3-compatible
//! implementation.

mod media_store;
mod minio_client;

pub use media_store::{MediaStore, StoredObject};
pub use minio_client::MinIOClient;
