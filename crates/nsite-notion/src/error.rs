use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Notion API returned {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Invalid header value (check the API secret): {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Response reported more results but no cursor")]
    MissingCursor,
}

impl ApiError {
    /// Notion's machine-readable error code, when the response carried one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
