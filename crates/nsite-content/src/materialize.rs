use std::future::Future;
use std::pin::Pin;

use nsite_assets::AssetCache;
use nsite_notion::ApiError;
use nsite_notion::NotionApi;
use nsite_notion::RawBlock;

use crate::block::Block;
use crate::block::BlockKind;
use crate::block::BlockType;
use crate::builders;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Turns a container's paginated children into a typed block tree.
///
/// Every failure is absorbed: a container whose children cannot be listed
/// materializes as empty, and its siblings are unaffected.
pub struct Materializer<'a> {
    api: &'a dyn NotionApi,
    assets: &'a AssetCache,
}

impl<'a> Materializer<'a> {
    pub fn new(api: &'a dyn NotionApi, assets: &'a AssetCache) -> Self {
        Self { api, assets }
    }

    /// Materialize the children of `container_id`, depth-first and in
    /// source order.
    pub fn materialize<'s>(&'s self, container_id: &'s str) -> BoxFuture<'s, Vec<Block>> {
        Box::pin(async move {
            let raw = match self.list_all(container_id).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::error!(container_id, error = %e, "failed to list block children");
                    return Vec::new();
                }
            };

            let mut blocks = Vec::with_capacity(raw.len());
            for raw in &raw {
                if let Some(block) = self.build(raw).await {
                    blocks.push(block);
                }
            }
            blocks
        })
    }

    /// Every child of `container_id`, following cursors until the listing
    /// reports no more pages.
    pub(crate) async fn list_all(&self, container_id: &str) -> Result<Vec<RawBlock>, ApiError> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .api
                .list_block_children(container_id, cursor.as_deref())
                .await?;
            tracing::debug!(
                container_id,
                count = page.results.len(),
                has_more = page.has_more,
                "listed block children"
            );
            blocks.extend(page.results);
            if !page.has_more {
                return Ok(blocks);
            }
            cursor = Some(page.next_cursor.ok_or(ApiError::MissingCursor)?);
        }
    }

    async fn build(&self, raw: &RawBlock) -> Option<Block> {
        let Some(block_type) = BlockType::from_tag(&raw.kind) else {
            tracing::trace!(id = %raw.id, kind = %raw.kind, "skipping unsupported block");
            return None;
        };

        match self.build_kind(block_type, raw).await {
            Ok(Some(kind)) => Some(Block {
                id: raw.id.clone(),
                last_edited_time: raw.last_edited_time,
                has_children: raw.has_children,
                kind,
            }),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(id = %raw.id, kind = %raw.kind, error = %e, "skipping malformed block");
                None
            }
        }
    }

    /// The payload is decoded before any children are fetched, so a
    /// malformed block costs no requests.
    async fn build_kind(
        &self,
        block_type: BlockType,
        raw: &RawBlock,
    ) -> Result<Option<BlockKind>, serde_json::Error> {
        let kind = match block_type {
            BlockType::Paragraph => {
                BlockKind::Paragraph(builders::text_block(raw.payload()?, self.children(raw).await))
            }
            BlockType::Heading1 => {
                BlockKind::Heading1(builders::heading(raw.payload()?, self.children(raw).await))
            }
            BlockType::Heading2 => {
                BlockKind::Heading2(builders::heading(raw.payload()?, self.children(raw).await))
            }
            BlockType::Heading3 => {
                BlockKind::Heading3(builders::heading(raw.payload()?, self.children(raw).await))
            }
            BlockType::BulletedListItem => BlockKind::BulletedListItem(builders::text_block(
                raw.payload()?,
                self.children(raw).await,
            )),
            BlockType::NumberedListItem => BlockKind::NumberedListItem(builders::text_block(
                raw.payload()?,
                self.children(raw).await,
            )),
            BlockType::Quote => {
                BlockKind::Quote(builders::text_block(raw.payload()?, self.children(raw).await))
            }
            BlockType::ToDo => {
                BlockKind::ToDo(builders::to_do(raw.payload()?, self.children(raw).await))
            }
            BlockType::Toggle => {
                let payload = raw.payload()?;
                BlockKind::Toggle(builders::toggle(payload, self.materialize(&raw.id).await))
            }
            BlockType::Callout => {
                let payload = raw.payload()?;
                let children = self.children(raw).await;
                BlockKind::Callout(builders::callout(payload, children, self.assets).await)
            }
            BlockType::SyncedBlock => BlockKind::SyncedBlock(builders::synced_block(
                raw.payload()?,
                self.children(raw).await,
            )),
            BlockType::Image => BlockKind::Image(builders::media(raw.payload()?, self.assets).await),
            BlockType::Video => BlockKind::Video(builders::media(raw.payload()?, self.assets).await),
            BlockType::Audio => BlockKind::Audio(builders::media(raw.payload()?, self.assets).await),
            BlockType::File => BlockKind::File(builders::media(raw.payload()?, self.assets).await),
            BlockType::Code => BlockKind::Code(builders::code(raw.payload()?)),
            BlockType::Equation => BlockKind::Equation(builders::equation(raw.payload()?)),
            BlockType::Embed => BlockKind::Embed(builders::link_block(raw.payload()?)),
            BlockType::Bookmark => BlockKind::Bookmark(builders::link_block(raw.payload()?)),
            BlockType::LinkPreview => BlockKind::LinkPreview(builders::link_block(raw.payload()?)),
            BlockType::TableOfContents => {
                BlockKind::TableOfContents(builders::table_of_contents(raw.payload()?))
            }
            BlockType::LinkToPage => BlockKind::LinkToPage(builders::link_to_page(raw.payload()?)),
            BlockType::Divider => BlockKind::Divider,
            BlockType::Table => BlockKind::Table(self.table(raw.payload()?, &raw.id).await),
            BlockType::ColumnList => BlockKind::ColumnList(self.column_list(&raw.id).await),
            BlockType::TableRow | BlockType::Column => {
                tracing::trace!(id = %raw.id, kind = %raw.kind, "skipping block outside its parent");
                return Ok(None);
            }
        };
        Ok(Some(kind))
    }

    /// Children are only requested when the block says it has some.
    async fn children(&self, raw: &RawBlock) -> Option<Vec<Block>> {
        if raw.has_children {
            Some(self.materialize(&raw.id).await)
        } else {
            None
        }
    }
}
