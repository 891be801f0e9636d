//! Client for the sticker generation backend.
//!
//! Two endpoints, both `POST`:
//!
//! - `/generate/meme`: multipart form with `prompt` and `image_file`, answers
//!   `{success, image_base64?, message?}`.
//! - `/generate/text`: JSON `{context}`, answers `{text, success?}`.
//!
//! A non-2xx status becomes [`StickerError::Api`]; a transport failure becomes
//! [`StickerError::Http`]. Nothing is retried.

use crate::config::StickerConfig;
use crate::error::{Result, StickerError};
use reqwest::blocking::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

const UPLOAD_FILE_NAME: &str = "image.jpg";
const UPLOAD_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateMemeResponse {
    pub success: bool,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateTextResponse {
    pub text: String,
    #[serde(default)]
    pub success: Option<bool>,
}

#[derive(Serialize)]
struct GenerateTextRequest<'a> {
    context: &'a str,
}

/// What the generation flow needs from the backend. Implemented by
/// [`ApiClient`]; tests substitute canned responses.
pub trait GenerationApi {
    fn generate_meme(&self, prompt: &str, image_path: &Path) -> Result<GenerateMemeResponse>;

    fn generate_text(&self, context: &str) -> Result<GenerateTextResponse>;
}

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &StickerConfig) -> Result<Self> {
        Self::new(config.api_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into an error, keeping the body's `detail` or
/// `message` field when the backend sent one.
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str().map(str::to_string))
        });
    warn!(status = status.as_u16(), ?message, "backend returned an error");
    Err(StickerError::Api {
        status: status.as_u16(),
        message,
    })
}

impl GenerationApi for ApiClient {
    fn generate_meme(&self, prompt: &str, image_path: &Path) -> Result<GenerateMemeResponse> {
        let bytes = std::fs::read(image_path)?;
        let part = multipart::Part::bytes(bytes)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_MIME)?;
        let form = multipart::Form::new()
            .text("prompt", prompt.to_string())
            .part("image_file", part);

        debug!(url = %self.endpoint("/generate/meme"), "requesting sticker generation");
        let response = self
            .http
            .post(self.endpoint("/generate/meme"))
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()?;
        Ok(check_status(response)?.json()?)
    }

    fn generate_text(&self, context: &str) -> Result<GenerateTextResponse> {
        debug!(url = %self.endpoint("/generate/text"), "requesting text suggestion");
        let response = self
            .http
            .post(self.endpoint("/generate/text"))
            .json(&GenerateTextRequest { context })
            .send()?;
        Ok(check_status(response)?.json()?)
    }
}
