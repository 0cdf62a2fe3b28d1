//! Upload stage of the create pipeline.
//!
//! `UploadedBlogForm` is an extractor: it reads the multipart form, checks
//! the image against the format allow-list, stores it in the media backend
//! and only then lets the handler run.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, FromRef, FromRequest, Multipart, Request},
    http::StatusCode,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::blogs::dtos::{
    ImageFormat, ALLOWED_IMAGE_FORMATS, DESCRIPTION_FIELD, IMAGE_FIELD, MISSING_FIELDS_MESSAGE,
    TITLE_FIELD,
};
use crate::modules::storage::{MediaStore, StoredObject};

/// Blog form whose image has been stored
#[derive(Debug)]
pub struct UploadedBlogForm {
    pub title: String,
    pub description: String,
    pub image: StoredObject,
}

struct ImagePart {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

#[derive(Default)]
struct RawBlogForm {
    title: Option<String>,
    description: Option<String>,
    image: Option<ImagePart>,
}

impl<S> FromRequest<S> for UploadedBlogForm
where
    Arc<dyn MediaStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let media = <Arc<dyn MediaStore> as FromRef<S>>::from_ref(state);

        let mut multipart = Multipart::from_request(req, state).await.map_err(|e| {
            debug!("Rejected non-multipart create request: {}", e);
            AppError::BadRequest(format!("Expected multipart form data: {}", e))
        })?;

        let form = read_form(&mut multipart).await?;

        let (Some(title), Some(description), Some(image)) =
            (form.title, form.description, form.image)
        else {
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };

        let format =
            ImageFormat::detect(image.file_name.as_deref(), image.content_type.as_deref())
                .ok_or_else(|| {
                    AppError::BadRequest(format!(
                        "Unsupported image format. Allowed formats: {}",
                        ALLOWED_IMAGE_FORMATS.join(", ")
                    ))
                })?;

        let key = media.object_key(&format!("{}.{}", Uuid::new_v4(), format.extension()));
        let stored = media
            .upload(&key, image.data.to_vec(), format.content_type())
            .await?;

        debug!("Blog image stored: key={}, url={}", stored.key, stored.url);

        Ok(Self {
            title,
            description,
            image: stored,
        })
    }
}

/// Collect the known fields; empty values count as missing
async fn read_form(multipart: &mut Multipart) -> Result<RawBlogForm, AppError> {
    let mut form = RawBlogForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "multipart data"))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            TITLE_FIELD | DESCRIPTION_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, &field_name))?;
                let value = Some(text).filter(|t| !t.is_empty());
                if field_name == TITLE_FIELD {
                    form.title = value;
                } else {
                    form.description = value;
                }
            }
            IMAGE_FIELD => {
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, &field_name))?;

                if !data.is_empty() {
                    form.image = Some(ImagePart {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok(form)
}

/// Bodies cut off by the size ceiling are a 413, everything else a 400
fn multipart_error(e: MultipartError, part: &str) -> AppError {
    debug!("Failed to read {}: {}", part, e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Request body too large while reading {}", part))
    } else {
        AppError::BadRequest(format!("Failed to read {}: {}", part, e))
    }
}
