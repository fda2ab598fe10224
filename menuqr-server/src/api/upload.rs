//! Multipart image intake shared by logo and dish-image uploads

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use http::StatusCode;
use shared::error::{AppError, ErrorCode};

use crate::storage::processing::{MAX_FILE_SIZE, compress_to_jpeg, validate_upload};

/// Request body cap for upload routes (file plus multipart overhead)
pub const UPLOAD_BODY_LIMIT: usize = MAX_FILE_SIZE + 512 * 1024;

pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(ErrorCode::FileTooLarge)
    } else {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    }
}

/// First field whose name is one of `field_names`
pub async fn read_file_field(
    multipart: &mut Multipart,
    field_names: &[&str],
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let matches = field.name().is_some_and(|n| field_names.contains(&n));
        if !matches {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?.to_vec();
        return Ok(UploadedFile {
            data,
            filename,
            content_type,
        });
    }
    Err(AppError::new(ErrorCode::NoFileProvided))
}

/// Read, validate and recompress an uploaded image to JPEG bytes
pub async fn read_image(
    multipart: &mut Multipart,
    field_names: &[&str],
) -> Result<Vec<u8>, AppError> {
    let file = read_file_field(multipart, field_names).await?;
    validate_upload(
        &file.data,
        file.filename.as_deref(),
        file.content_type.as_deref(),
    )?;
    compress_to_jpeg(&file.data)
}
