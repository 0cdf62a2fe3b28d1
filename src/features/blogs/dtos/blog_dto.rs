use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::storage::StoredObject;

/// Message returned when any create field is absent
pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required";

/// Multipart field names accepted by the create endpoint
pub const TITLE_FIELD: &str = "blog_title";
pub const DESCRIPTION_FIELD: &str = "blog_description";
pub const IMAGE_FIELD: &str = "blog_image";

/// Create blog request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler reads the form through `UploadedBlogForm`.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateBlogDto {
    /// Blog title
    #[schema(example = "My first post")]
    pub blog_title: String,
    /// Blog body text
    #[schema(example = "Some words about the picture")]
    pub blog_description: String,
    /// Cover image (jpg, jpeg or png)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub blog_image: String,
}

/// Response DTO for a blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponseDto {
    /// Public sequential identifier
    #[schema(example = 1)]
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Public URL of the uploaded image
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for the create operation, image already stored
#[derive(Debug, Clone, Validate)]
pub struct CreateBlogInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "image url is required"))]
    pub image_url: String,

    /// Object key of the stored image, kept for cleanup
    pub image_key: String,
}

impl CreateBlogInput {
    pub fn new(title: String, description: String, image: StoredObject) -> Self {
        Self {
            title,
            description,
            image_url: image.url,
            image_key: image.key,
        }
    }
}

/// Image formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpg,
    Jpeg,
    Png,
}

/// Allowed image extensions, in the order reported to clients
pub const ALLOWED_IMAGE_FORMATS: &[&str] = &["jpg", "png", "jpeg"];

impl ImageFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Resolve the format of an uploaded part.
    ///
    /// The file name's extension wins; the part's content type is only
    /// consulted when the name has no extension.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty());

        match extension {
            Some(ext) => Self::from_extension(ext),
            None => content_type.and_then(Self::from_content_type),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpg | Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_uses_extension_case_insensitively() {
        assert_eq!(
            ImageFormat::detect(Some("photo.JPG"), None),
            Some(ImageFormat::Jpg)
        );
        assert_eq!(
            ImageFormat::detect(Some("photo.jpeg"), Some("application/octet-stream")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::detect(Some("archive.tar.png"), None),
            Some(ImageFormat::Png)
        );
    }

    #[test]
    fn test_detect_rejects_unlisted_extension_even_with_image_content_type() {
        assert_eq!(ImageFormat::detect(Some("anim.gif"), Some("image/png")), None);
        assert_eq!(ImageFormat::detect(Some("doc.pdf"), None), None);
    }

    #[test]
    fn test_detect_falls_back_to_content_type() {
        assert_eq!(
            ImageFormat::detect(Some("blob"), Some("image/png")),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::detect(None, Some("image/jpeg")),
            Some(ImageFormat::Jpg)
        );
        assert_eq!(ImageFormat::detect(Some("blob."), Some("image/webp")), None);
        assert_eq!(ImageFormat::detect(None, None), None);
    }

    #[test]
    fn test_content_type_for_each_format() {
        assert_eq!(ImageFormat::Jpg.content_type(), "image/jpeg");
        assert_eq!(ImageFormat::Jpeg.content_type(), "image/jpeg");
        assert_eq!(ImageFormat::Png.content_type(), "image/png");
    }

    #[test]
    fn test_create_input_requires_every_field() {
        let image = StoredObject {
            key: "public/uploads/a.png".to_string(),
            url: "http://cdn/blog/public/uploads/a.png".to_string(),
        };
        let input = CreateBlogInput::new("A".to_string(), "d1".to_string(), image.clone());
        assert!(input.validate().is_ok());

        let input = CreateBlogInput::new(String::new(), "d1".to_string(), image);
        assert!(input.validate().is_err());
    }
}
