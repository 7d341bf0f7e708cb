use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{
    config::CloudinaryConfig,
    error::{AppError, Result},
};

use super::{MediaGateway, MediaKind, UploadedMedia};

const UPLOAD_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    resource_type: String,
}

/// Signed-upload client for the Cloudinary REST API. One HTTP call per
/// upload, no retries; the reqwest client is shared process-wide.
pub struct CloudinaryClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryClient {
    /// Builds the client only when the full credential set is present.
    /// Missing credentials are not fatal at startup; the caller keeps
    /// running without a media gateway.
    pub fn from_config(config: &CloudinaryConfig) -> Option<Self> {
        let (Some(cloud_name), Some(api_key), Some(api_secret)) = (
            config.cloud_name.clone(),
            config.api_key.clone(),
            config.api_secret.clone(),
        ) else {
            return None;
        };

        Some(Self {
            http: reqwest::Client::new(),
            cloud_name,
            api_key,
            api_secret,
        })
    }

    /// SHA-256 signature over the sorted parameter string, as required
    /// by the upload API: `key=value&...` + api secret, hex encoded.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        let to_sign: Vec<String> = sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();

        let mut hasher = Sha256::new();
        hasher.update(to_sign.join("&"));
        hasher.update(&self.api_secret);
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl MediaGateway for CloudinaryClient {
    async fn upload(
        &self,
        data: Vec<u8>,
        kind: MediaKind,
        folder: Option<&str>,
    ) -> Result<UploadedMedia> {
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut params: Vec<(&str, &str)> = vec![("timestamp", timestamp.as_str())];
        if let Some(folder) = folder {
            params.push(("folder", folder));
        }
        let signature = self.sign(&params);

        let mut form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(data).file_name("upload"))
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        if let Some(folder) = folder {
            form = form.text("folder", folder.to_string());
        }

        let url = format!("{}/{}/{}/upload", UPLOAD_BASE, self.cloud_name, kind.as_str());

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upload(format!(
                "media host returned {}: {}",
                status, body
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("malformed upload response: {}", e)))?;

        Ok(UploadedMedia {
            url: body.secure_url,
            resource_type: body.resource_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_sorts_parameters_before_hashing() {
        let client = CloudinaryClient {
            http: reqwest::Client::new(),
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        };

        // Parameter order must not change the signature.
        let a = client.sign(&[("timestamp", "100"), ("folder", "gallery")]);
        let b = client.sign(&[("folder", "gallery"), ("timestamp", "100")]);
        assert_eq!(a, b);

        let mut hasher = Sha256::new();
        hasher.update("folder=gallery&timestamp=100");
        hasher.update("secret");
        assert_eq!(a, hex::encode(hasher.finalize()));
    }
}
