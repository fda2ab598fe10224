//! Cloudinary signed upload client
//!
//! One multipart POST per image; no retries.

use serde::Deserialize;
use thiserror::Error;

use crate::config::CloudinaryConfig;
use crate::util::sha256_hex;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("image host unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("image host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("malformed image host response: {0}")]
    MalformedResponse(String),
    #[error("local image write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct ImageHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
    endpoint: String,
}

impl ImageHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        let endpoint = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            config.cloud_name
        );
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            config,
            endpoint,
        }
    }

    /// Upload JPEG bytes, returning the public `secure_url`.
    pub async fn upload(
        &self,
        data: Vec<u8>,
        folder: &str,
        public_id: &str,
    ) -> Result<String, UploadError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(folder, public_id, timestamp, &self.config.api_secret);

        let file = reqwest::multipart::Part::bytes(data)
            .file_name(format!("{public_id}.jpg"))
            .mime_str("image/jpeg")?;
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", folder.to_string())
            .text("public_id", public_id.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;
        parsed
            .secure_url
            .ok_or_else(|| UploadError::MalformedResponse("missing secure_url".into()))
    }
}

/// Signature over the alphabetically sorted signed params, then the secret.
fn sign(folder: &str, public_id: &str, timestamp: i64, secret: &str) -> String {
    sha256_hex(&format!(
        "folder={folder}&public_id={public_id}&timestamp={timestamp}{secret}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_manual_digest() {
        let sig = sign("menuqr/logos", "abc", 1_700_000_000, "s3cr3t");
        assert_eq!(
            sig,
            sha256_hex("folder=menuqr/logos&public_id=abc&timestamp=1700000000s3cr3t")
        );
        assert_eq!(sig.len(), 64);
    }

    #[test]
    fn endpoint_includes_cloud_name() {
        let host = ImageHost::new(CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "secret".into(),
        });
        assert_eq!(
            host.endpoint,
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }
}
