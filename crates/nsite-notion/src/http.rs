use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::api::NotionApi;
use crate::error::ApiError;
use crate::query::DocumentQuery;
use crate::wire::RawBlock;
use crate::wire::RawPage;
use crate::wire::ResultsPage;

const NOTION_VERSION_HEADER: HeaderName = HeaderName::from_static("notion-version");

/// Connection parameters for [`HttpNotionClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub secret: String,
    pub base_url: String,
    pub api_version: String,
    pub page_size: u32,
    pub timeout: Duration,
}

impl ClientOptions {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            base_url: "https://api.notion.com/v1".to_string(),
            api_version: "2022-06-28".to_string(),
            page_size: 100,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Error body Notion sends with non-success responses.
#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

pub struct HttpNotionClient {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl HttpNotionClient {
    pub fn new(options: ClientOptions) -> Result<Self, ApiError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", options.secret))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            NOTION_VERSION_HEADER,
            HeaderValue::from_str(&options.api_version)?,
        );

        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent("nsite")
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            page_size: options.page_size,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}/{path}", self.base_url))?)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let body: Option<ErrorBody> = serde_json::from_slice(&bytes).ok();
            let (code, message) = match body {
                Some(body) => (body.code, body.message),
                None => (None, None),
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                code,
                message: message.unwrap_or_else(|| status.to_string()),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl NotionApi for HttpNotionClient {
    async fn query_database(
        &self,
        database_id: &str,
        query: &DocumentQuery,
        cursor: Option<&str>,
    ) -> Result<ResultsPage<RawPage>, ApiError> {
        tracing::debug!(database_id, ?query, cursor, "querying database");

        let url = self.endpoint(&format!("databases/{database_id}/query"))?;
        let resp = self
            .client
            .post(url)
            .json(&query.body(cursor, self.page_size))
            .send()
            .await?;

        Self::decode(resp).await
    }

    async fn list_block_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ResultsPage<RawBlock>, ApiError> {
        tracing::debug!(block_id, cursor, "listing block children");

        let mut url = self.endpoint(&format!("blocks/{block_id}/children"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page_size", &self.page_size.to_string());
            if let Some(cursor) = cursor {
                pairs.append_pair("start_cursor", cursor);
            }
        }

        let resp = self.client.get(url).send().await?;
        Self::decode(resp).await
    }
}
