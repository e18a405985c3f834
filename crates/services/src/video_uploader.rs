use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use portal_core::model::{ModuleId, ProgramId};
use serde::{Deserialize, Serialize};

use crate::error::UploadError;

/// Env var naming the upload endpoint.
pub const UPLOAD_URL_ENV: &str = "PORTAL_UPLOAD_URL";

const DEFAULT_UPLOAD_URL: &str = "http://localhost:3001/api/upload-video";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    video_data: String,
    filename: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    success: bool,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the video upload endpoint.
///
/// The file travels base64-encoded in the JSON body; the target module is
/// carried in headers so the server can place the file without parsing the
/// payload first.
#[derive(Debug, Clone)]
pub struct VideoUploader {
    client: reqwest::Client,
    endpoint: String,
}

impl VideoUploader {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Builds an uploader from `PORTAL_UPLOAD_URL`, falling back to the local
    /// dev endpoint.
    #[must_use]
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var(UPLOAD_URL_ENV).unwrap_or_else(|_| DEFAULT_UPLOAD_URL.to_owned());
        Self::new(endpoint)
    }

    /// Uploads a video file for one program module and returns the URL the
    /// server stored it under.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Rejected` when the server answers with
    /// `success: false`, `HttpStatus` for a non-2xx response, or `Http` for
    /// transport failures.
    pub async fn upload(
        &self,
        program_id: &ProgramId,
        module_id: ModuleId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        let body = UploadRequest {
            video_data: BASE64.encode(bytes),
            filename,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Program-Id", program_id.as_str())
            .header("X-Module-Id", module_id.value().to_string())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::HttpStatus(status));
        }

        let decoded: UploadResponse = response.json().await?;
        if !decoded.success {
            return Err(UploadError::Rejected(
                decoded.error.unwrap_or_else(|| "upload failed".to_owned()),
            ));
        }
        decoded
            .url
            .ok_or_else(|| UploadError::Rejected("response carried no url".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_is_base64_camel_case() {
        let body = UploadRequest {
            video_data: BASE64.encode(b"abc"),
            filename: "intro.mp4",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["videoData"], "YWJj");
        assert_eq!(json["filename"], "intro.mp4");
    }

    #[test]
    fn response_decodes_with_optional_fields() {
        let ok: UploadResponse =
            serde_json::from_str(r#"{"success":true,"url":"/uploads/v.mp4"}"#).unwrap();
        assert!(ok.success);
        assert_eq!(ok.url.as_deref(), Some("/uploads/v.mp4"));

        let rejected: UploadResponse =
            serde_json::from_str(r#"{"success":false,"error":"too large"}"#).unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.error.as_deref(), Some("too large"));
    }
}
