use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

const MAX_ASSET_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Asset too large ({0} bytes, max {MAX_ASSET_BYTES} bytes)")]
    TooLarge(u64),
}

/// Retrieves the bytes behind a URL.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("nsite")
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        if let Some(len) = resp.content_length() {
            if len > MAX_ASSET_BYTES {
                return Err(FetchError::TooLarge(len));
            }
        }

        let bytes = resp.bytes().await?;
        let len = bytes.len() as u64;
        if len > MAX_ASSET_BYTES {
            return Err(FetchError::TooLarge(len));
        }

        Ok(bytes.to_vec())
    }
}
