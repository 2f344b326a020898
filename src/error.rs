use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("OAuth configuration error: {0}")]
    AuthConfiguration(String),

    #[error("OAuth token exchange failed: {status} - {body}")]
    AuthExchange { status: u16, body: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Zoho API error: {status} - {body}")]
    RemoteApi { status: u16, body: String },

    #[error("Malformed Zoho response: {0}")]
    MalformedResponse(String),

    #[error("Failed to convert record at row {row_index}: {message}")]
    RecordConversion { row_index: u64, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl SheetError {
    /// HTTP status carried by a remote or token-exchange failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            SheetError::RemoteApi { status, .. } | SheetError::AuthExchange { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;

/// Fail with `InvalidArgument` when a required identifier is empty.
pub(crate) fn require(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SheetError::InvalidArgument(format!("{} must be provided", name)));
    }
    Ok(())
}

/// Fail with `InvalidArgument` when a required list is empty.
pub(crate) fn require_items<T>(items: &[T], name: &str) -> Result<()> {
    if items.is_empty() {
        return Err(SheetError::InvalidArgument(format!("{} cannot be empty", name)));
    }
    Ok(())
}
