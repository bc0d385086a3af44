use async_trait::async_trait;

use crate::error::ApiError;
use crate::query::DocumentQuery;
use crate::wire::RawBlock;
use crate::wire::RawPage;
use crate::wire::ResultsPage;

/// The remote operations the content layer is built on.
///
/// Both operations return one page of results; callers follow `next_cursor`
/// while `has_more` is set.
#[async_trait]
pub trait NotionApi: Send + Sync {
    async fn query_database(
        &self,
        database_id: &str,
        query: &DocumentQuery,
        cursor: Option<&str>,
    ) -> Result<ResultsPage<RawPage>, ApiError>;

    async fn list_block_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ResultsPage<RawBlock>, ApiError>;
}
