use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaProbeError {
    #[error("Could not determine the duration")]
    DurationUnknown,

    #[error("Could not determine the bitrate")]
    BitrateUnknown,

    #[error("Could not determine the title")]
    TitleUnknown,

    #[error("Could not determine the size")]
    SizeUnknown,

    #[error("Could not create thumbnail")]
    ThumbnailFailed,

    #[error("Could not trim video")]
    TrimFailed,

    #[error("Media tool not available: {0}")]
    ToolUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MediaProbeError>;
