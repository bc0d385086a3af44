use std::sync::Mutex;
use std::sync::PoisonError;

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use crate::api::NotionApi;
use crate::error::ApiError;
use crate::query::DocumentQuery;
use crate::wire::RawBlock;
use crate::wire::RawPage;
use crate::wire::ResultsPage;

/// A [`NotionApi`] backed by maps instead of the network.
///
/// Children are paginated with the configured page size and cursors are
/// stringified offsets. Failures can be injected per container, after a
/// given number of successful pages.
pub struct InMemoryNotion {
    children: FxHashMap<String, Vec<RawBlock>>,
    pages: Vec<RawPage>,
    page_size: usize,
    failures: FxHashMap<String, usize>,
    requests: Mutex<FxHashMap<String, usize>>,
}

impl InMemoryNotion {
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: FxHashMap::default(),
            pages: Vec::new(),
            page_size: 100,
            failures: FxHashMap::default(),
            requests: Mutex::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn add_children(&mut self, container_id: impl Into<String>, blocks: Vec<RawBlock>) {
        self.children
            .entry(container_id.into())
            .or_default()
            .extend(blocks);
    }

    pub fn add_page(&mut self, page: RawPage) {
        self.pages.push(page);
    }

    /// Make listing `container_id` fail once `ok_pages` pages have been served.
    pub fn fail_after(&mut self, container_id: impl Into<String>, ok_pages: usize) {
        self.failures.insert(container_id.into(), ok_pages);
    }

    /// Number of listing requests made for `container_id` (a block or database).
    pub fn requests_for(&self, container_id: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(container_id)
            .copied()
            .unwrap_or(0)
    }

    fn record_request(&self, container_id: &str) {
        *self
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(container_id.to_string())
            .or_default() += 1;
    }

    fn paginate<T: Clone>(
        &self,
        container_id: &str,
        items: &[T],
        cursor: Option<&str>,
    ) -> Result<ResultsPage<T>, ApiError> {
        let offset = match cursor {
            Some(cursor) => cursor.parse::<usize>().map_err(|_| ApiError::Status {
                status: 400,
                code: Some("validation_error".to_string()),
                message: format!("invalid start_cursor: {cursor}"),
            })?,
            None => 0,
        };

        if let Some(ok_pages) = self.failures.get(container_id) {
            if offset >= ok_pages * self.page_size {
                return Err(ApiError::Status {
                    status: 503,
                    code: Some("service_unavailable".to_string()),
                    message: format!("injected failure listing {container_id}"),
                });
            }
        }

        let end = (offset + self.page_size).min(items.len());
        let results = items.get(offset..end).unwrap_or_default().to_vec();
        let has_more = end < items.len();

        Ok(ResultsPage {
            results,
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }
}

impl Default for InMemoryNotion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotionApi for InMemoryNotion {
    async fn query_database(
        &self,
        database_id: &str,
        query: &DocumentQuery,
        cursor: Option<&str>,
    ) -> Result<ResultsPage<RawPage>, ApiError> {
        self.record_request(database_id);

        let mut matching: Vec<RawPage> = self
            .pages
            .iter()
            .filter(|page| query.matches(&page.properties))
            .cloned()
            .collect();
        matching.sort_by_cached_key(|page| std::cmp::Reverse(query.sort_key(&page.properties)));

        self.paginate(database_id, &matching, cursor)
    }

    async fn list_block_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ResultsPage<RawBlock>, ApiError> {
        self.record_request(block_id);

        let children = self.children.get(block_id).map_or(&[][..], Vec::as_slice);
        self.paginate(block_id, children, cursor)
    }
}
