//! Image storage: local mirror plus optional cloud host
//!
//! Uploads are always written under `UPLOAD_DIR/<folder>/` (served at
//! `/uploads`). When Cloudinary is configured the same bytes are pushed there
//! and the cloud URL is returned; otherwise the local URL is.

pub mod image_host;
pub mod processing;

use std::path::PathBuf;

use shared::error::{AppError, ErrorCode};

pub use image_host::{ImageHost, UploadError};

const CLOUD_FOLDER_PREFIX: &str = "menuqr";

#[derive(Clone)]
pub struct ImageStore {
    upload_dir: PathBuf,
    public_base_url: String,
    host: Option<ImageHost>,
}

impl ImageStore {
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        host: Option<ImageHost>,
    ) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            public_base_url: public_base_url.into(),
            host,
        }
    }

    pub fn upload_dir(&self) -> &std::path::Path {
        &self.upload_dir
    }

    /// Persist already-compressed JPEG bytes under `folder` and return the URL to store.
    pub async fn store(&self, folder: &str, data: Vec<u8>) -> Result<String, UploadError> {
        let public_id = uuid::Uuid::new_v4().simple().to_string();
        let file_name = format!("{public_id}.jpg");

        let dir = self.upload_dir.join(folder);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &data).await?;
        let local_url = format!("{}/uploads/{folder}/{file_name}", self.public_base_url);

        let Some(host) = &self.host else {
            tracing::debug!(url = %local_url, "Image stored locally");
            return Ok(local_url);
        };

        let cloud_folder = format!("{CLOUD_FOLDER_PREFIX}/{folder}");
        let url = host.upload(data, &cloud_folder, &public_id).await?;
        tracing::info!(url = %url, "Image uploaded to cloud host");
        Ok(url)
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        tracing::error!(error = %e, "Image upload failed");
        match e {
            UploadError::Io(_) => AppError::new(ErrorCode::ImageProcessingFailed),
            _ => AppError::new(ErrorCode::ImageUploadFailed),
        }
    }
}
