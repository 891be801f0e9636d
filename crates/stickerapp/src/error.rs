use thiserror::Error;

#[derive(Error, Debug)]
pub enum StickerError {
    #[error("Sticker not found: {0}")]
    StickerNotFound(String),

    #[error("Pack not found: {0}")]
    PackNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Record '{key}' has unsupported schema version {version}")]
    UnsupportedVersion { key: String, version: u32 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: status {status}{}", api_detail(.message))]
    Api { status: u16, message: Option<String> },

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Daily limit of {limit} generations reached")]
    LimitReached { limit: u32 },

    #[error("Ad error: {0}")]
    Ad(String),

    #[error("Config error: {0}")]
    Config(String),
}

fn api_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({})", m))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, StickerError>;
