//! Image validation and recompression
//!
//! Every accepted upload is decoded (rejecting anything that is not really an
//! image) and re-encoded as JPEG, which also strips metadata.

use image::codecs::jpeg::JpegEncoder;
use std::io::Cursor;

use shared::error::{AppError, ErrorCode};

/// Maximum upload size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

pub const JPEG_QUALITY: u8 = 85;

pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

const SUPPORTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg", "image/webp"];

/// Check size and declared type before decoding anything.
pub fn validate_upload(
    data: &[u8],
    filename: Option<&str>,
    content_type: Option<&str>,
) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large: {} bytes (max {MAX_FILE_SIZE})", data.len()),
        ));
    }

    let ext = filename
        .and_then(|f| std::path::Path::new(f).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let ext_ok = ext.as_deref().is_some_and(|e| SUPPORTED_FORMATS.contains(&e));
    let mime_ok = content_type
        .map(|c| c.to_lowercase())
        .is_some_and(|c| SUPPORTED_MIME_TYPES.contains(&c.as_str()));

    // An explicit extension decides; otherwise fall back to the declared MIME type
    let accepted = match ext {
        Some(_) => ext_ok,
        None => mime_ok,
    };
    if !accepted {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            "Unsupported format. Supported: png, jpg, jpeg, webp",
        ));
    }

    Ok(())
}

/// Decode and re-encode as JPEG
pub fn compress_to_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}"))
    })?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img.write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Image compression failed: {e}"),
            )
        })?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 30, 30]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn rejects_empty_and_oversized() {
        let err = validate_upload(&[], Some("a.png"), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyFile);

        let big = vec![0u8; MAX_FILE_SIZE + 1];
        let err = validate_upload(&big, Some("a.png"), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = validate_upload(b"GIF89a", Some("anim.gif"), Some("image/png")).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);
    }

    #[test]
    fn accepts_by_mime_when_no_extension() {
        assert!(validate_upload(b"data", Some("blob"), Some("image/webp")).is_ok());
        assert!(validate_upload(b"data", None, Some("text/plain")).is_err());
    }

    #[test]
    fn compresses_real_image_to_jpeg() {
        let jpeg = compress_to_jpeg(&tiny_png()).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = compress_to_jpeg(b"definitely not an image").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }
}
