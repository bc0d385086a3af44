use std::sync::Arc;
use std::time::Duration;

use camino::Utf8Path;
use nsite_assets::AssetCache;
use nsite_assets::AssetKind;
use nsite_assets::DirStore;
use nsite_assets::FetchError;
use nsite_assets::HttpFetcher;
use nsite_conf::Settings;
use nsite_notion::ApiError;
use nsite_notion::ClientOptions;
use nsite_notion::DocumentQuery;
use nsite_notion::HttpNotionClient;
use nsite_notion::NotionApi;
use nsite_notion::RawPage;
use thiserror::Error;

use crate::block::Block;
use crate::document::featured_image;
use crate::document::Document;
use crate::materialize::Materializer;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Failed to build Notion client: {0}")]
    Client(#[from] ApiError),
    #[error("Failed to build asset fetcher: {0}")]
    Fetcher(#[from] FetchError),
}

/// The operations a site build calls.
///
/// None of them fail. Missing credentials, remote errors and bad records
/// are logged and show up as empty results, so a build always completes.
pub struct ContentService {
    api: Option<Arc<dyn NotionApi>>,
    database_id: Option<String>,
    assets: Arc<AssetCache>,
}

impl ContentService {
    /// `api` is `None` when no credentials are configured.
    pub fn new(
        api: Option<Arc<dyn NotionApi>>,
        database_id: Option<String>,
        assets: Arc<AssetCache>,
    ) -> Self {
        Self {
            api,
            database_id,
            assets,
        }
    }

    /// Wire up the HTTP client and an on-disk asset cache. A relative asset
    /// directory is taken relative to `project_root`.
    pub fn from_settings(settings: &Settings, project_root: &Utf8Path) -> Result<Self, ServiceError> {
        let notion = &settings.notion;
        let timeout = Duration::from_secs(notion.timeout_secs);

        let api = match notion.secret() {
            Some(secret) => {
                let options = ClientOptions {
                    base_url: notion.api_base_url.clone(),
                    api_version: notion.api_version.clone(),
                    page_size: notion.page_size,
                    timeout,
                    ..ClientOptions::new(secret)
                };
                let client: Arc<dyn NotionApi> = Arc::new(HttpNotionClient::new(options)?);
                Some(client)
            }
            None => None,
        };

        let dir = project_root.join(&settings.assets.dir);
        tracing::debug!(%dir, "asset directory");
        let assets = AssetCache::new(
            Arc::new(HttpFetcher::new(timeout)?),
            Arc::new(DirStore::new(dir)),
            settings.assets.public_prefix.clone(),
        );

        Ok(Self::new(
            api,
            notion.database().map(str::to_string),
            Arc::new(assets),
        ))
    }

    /// Published documents, newest first.
    pub async fn list_documents(&self) -> Vec<Document> {
        let Some((api, database_id)) = self.database() else {
            return Vec::new();
        };

        let pages = match query_all(api, database_id, &DocumentQuery::Published).await {
            Ok(pages) => pages,
            Err(e) => {
                tracing::error!(error = %e, "failed to query published documents");
                return Vec::new();
            }
        };

        let mut documents = Vec::with_capacity(pages.len());
        for page in &pages {
            if let Some(document) = self.document(page).await {
                documents.push(document);
            }
        }
        documents
    }

    pub async fn document_by_slug(&self, slug: &str) -> Option<Document> {
        let (api, database_id) = self.database()?;
        let query = DocumentQuery::PublishedSlug(slug.to_string());

        let page = match api.query_database(database_id, &query, None).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(slug, error = %e, "failed to look up document");
                return None;
            }
        };

        match page.results.first() {
            Some(raw) => self.document(raw).await,
            None => {
                tracing::debug!(slug, "no published document with this slug");
                None
            }
        }
    }

    /// The block tree of a page. Needs credentials but no database.
    pub async fn materialize_content(&self, page_id: &str) -> Vec<Block> {
        let Some(api) = self.api.as_deref() else {
            tracing::warn!("Notion API secret is not set, returning no content");
            return Vec::new();
        };
        Materializer::new(api, &self.assets)
            .materialize(page_id)
            .await
    }

    fn database(&self) -> Option<(&dyn NotionApi, &str)> {
        match (self.api.as_deref(), self.database_id.as_deref()) {
            (Some(api), Some(database_id)) => Some((api, database_id)),
            _ => {
                tracing::warn!("Notion API secret or database id is not set, returning no documents");
                None
            }
        }
    }

    /// Project a row and swap a hosted featured image for its snapshot.
    async fn document(&self, page: &RawPage) -> Option<Document> {
        let Some(mut document) = Document::from_page(page) else {
            tracing::debug!(id = %page.id, "skipping page without title or slug");
            return None;
        };

        if let Some(image) = featured_image(page) {
            if image.kind == AssetKind::Hosted {
                let url = self
                    .assets
                    .resolve(&image.kind, Some(image.url.as_str()), None)
                    .await;
                document.featured_image = Some(url);
            }
        }
        Some(document)
    }
}

async fn query_all(
    api: &dyn NotionApi,
    database_id: &str,
    query: &DocumentQuery,
) -> Result<Vec<RawPage>, ApiError> {
    let mut pages = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = api
            .query_database(database_id, query, cursor.as_deref())
            .await?;
        tracing::debug!(count = page.results.len(), has_more = page.has_more, "queried database");
        pages.extend(page.results);
        if !page.has_more {
            return Ok(pages);
        }
        cursor = Some(page.next_cursor.ok_or(ApiError::MissingCursor)?);
    }
}
