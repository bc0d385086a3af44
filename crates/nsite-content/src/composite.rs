//! Blocks whose children are not ordinary blocks: tables own rows of
//! cells, column lists own columns that each hold a full subtree.

use nsite_notion::wire::TablePayload;
use nsite_notion::wire::TableRowPayload;

use crate::block::BlockType;
use crate::block::Column;
use crate::block::ColumnList;
use crate::block::Table;
use crate::block::TableRow;
use crate::builders;
use crate::materialize::Materializer;

impl Materializer<'_> {
    pub(crate) async fn table(&self, payload: TablePayload, table_id: &str) -> Table {
        Table {
            table_width: payload.table_width.unwrap_or(0),
            has_column_header: payload.has_column_header.unwrap_or(false),
            has_row_header: payload.has_row_header.unwrap_or(false),
            rows: self.rows(table_id).await,
        }
    }

    async fn rows(&self, table_id: &str) -> Vec<TableRow> {
        let raw = match self.list_all(table_id).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(table_id, error = %e, "failed to list table rows");
                return Vec::new();
            }
        };

        raw.into_iter()
            .filter(|raw| BlockType::from_tag(&raw.kind) == Some(BlockType::TableRow))
            .filter_map(|raw| match raw.payload::<TableRowPayload>() {
                Ok(payload) => Some(builders::table_row(raw.id, raw.has_children, &payload)),
                Err(e) => {
                    tracing::warn!(id = %raw.id, error = %e, "skipping malformed table row");
                    None
                }
            })
            .collect()
    }

    pub(crate) async fn column_list(&self, list_id: &str) -> ColumnList {
        let raw = match self.list_all(list_id).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(list_id, error = %e, "failed to list columns");
                return ColumnList {
                    columns: Vec::new(),
                };
            }
        };

        let mut columns = Vec::new();
        for raw in raw {
            if BlockType::from_tag(&raw.kind) != Some(BlockType::Column) {
                continue;
            }
            let children = self.materialize(&raw.id).await;
            columns.push(Column {
                id: raw.id,
                has_children: raw.has_children,
                children,
            });
        }
        ColumnList { columns }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use nsite_assets::AssetCache;
    use nsite_assets::AssetFetcher;
    use nsite_assets::FetchError;
    use nsite_assets::MemoryStore;
    use nsite_notion::InMemoryNotion;
    use nsite_notion::RawBlock;
    use serde_json::json;

    use super::*;
    use crate::block::BlockKind;

    struct NoFetch;

    #[async_trait]
    impl AssetFetcher for NoFetch {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::Status(404))
        }
    }

    fn assets() -> AssetCache {
        AssetCache::new(Arc::new(NoFetch), Arc::new(MemoryStore::new()), "/img")
    }

    fn cell(text: &str) -> serde_json::Value {
        json!([{"type": "text", "plain_text": text, "text": {"content": text}}])
    }

    #[tokio::test]
    async fn test_table_keeps_only_rows() {
        let mut api = InMemoryNotion::new().with_page_size(1);
        api.add_children(
            "t",
            vec![
                RawBlock::new("r1", "table_row", json!({"cells": [cell("a"), cell("b")]})),
                RawBlock::new("stray", "paragraph", json!({"rich_text": []})),
                RawBlock::new("r2", "table_row", json!({"cells": [cell("c")]})),
            ],
        );
        let assets = assets();
        let materializer = Materializer::new(&api, &assets);

        let table = materializer
            .table(
                serde_json::from_value(json!({"table_width": 2, "has_column_header": true}))
                    .unwrap(),
                "t",
            )
            .await;

        assert_eq!(table.table_width, 2);
        assert!(table.has_column_header);
        assert!(!table.has_row_header);
        let ids: Vec<&str> = table.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["r1", "r2"]);
        assert_eq!(table.rows[1].cells.len(), 1);
        assert_eq!(api.requests_for("t"), 3);
    }

    #[tokio::test]
    async fn test_failed_row_listing_gives_empty_table() {
        let mut api = InMemoryNotion::new().with_page_size(1);
        api.add_children(
            "t",
            vec![
                RawBlock::new("r1", "table_row", json!({"cells": [cell("a")]})),
                RawBlock::new("r2", "table_row", json!({"cells": [cell("b")]})),
            ],
        );
        api.fail_after("t", 1);
        let assets = assets();
        let materializer = Materializer::new(&api, &assets);

        let table = materializer.table(TablePayload::default(), "t").await;
        assert!(table.rows.is_empty());
        assert_eq!(table.table_width, 0);
    }

    #[tokio::test]
    async fn test_columns_recurse_into_nested_lists() {
        let mut api = InMemoryNotion::new();
        api.add_children(
            "cl",
            vec![
                RawBlock::new("c1", "column", json!({})).with_children(true),
                RawBlock::new("c2", "column", json!({})).with_children(true),
            ],
        );
        api.add_children(
            "c1",
            vec![RawBlock::new("p1", "paragraph", json!({"rich_text": []}))],
        );
        api.add_children(
            "c2",
            vec![RawBlock::new("inner", "column_list", json!({})).with_children(true)],
        );
        api.add_children(
            "inner",
            vec![RawBlock::new("c3", "column", json!({})).with_children(true)],
        );
        api.add_children("c3", vec![RawBlock::new("d", "divider", json!({}))]);
        let assets = assets();
        let materializer = Materializer::new(&api, &assets);

        let list = materializer.column_list("cl").await;
        assert_eq!(list.columns.len(), 2);
        assert_eq!(list.columns[0].children[0].id, "p1");

        let BlockKind::ColumnList(inner) = &list.columns[1].children[0].kind else {
            panic!("expected nested column list");
        };
        assert_eq!(inner.columns[0].id, "c3");
        assert_eq!(inner.columns[0].children[0].kind, BlockKind::Divider);
    }
}
