//! Builders for single blocks. Child sequences are fetched by the caller
//! and handed in already materialized.

use nsite_assets::AssetCache;
use nsite_assets::AssetKind;
use nsite_notion::wire::CalloutPayload;
use nsite_notion::wire::CodePayload;
use nsite_notion::wire::ColorPayload;
use nsite_notion::wire::EquationPayload;
use nsite_notion::wire::HeadingPayload;
use nsite_notion::wire::LinkToPagePayload;
use nsite_notion::wire::MediaPayload;
use nsite_notion::wire::RawIcon;
use nsite_notion::wire::SyncedBlockPayload;
use nsite_notion::wire::TableRowPayload;
use nsite_notion::wire::TextPayload;
use nsite_notion::wire::ToDoPayload;
use nsite_notion::wire::UrlPayload;

use crate::block::Block;
use crate::block::Callout;
use crate::block::Code;
use crate::block::Equation;
use crate::block::ExternalFile;
use crate::block::Heading;
use crate::block::HostedFile;
use crate::block::Icon;
use crate::block::LinkBlock;
use crate::block::LinkToPage;
use crate::block::Media;
use crate::block::SyncedBlock;
use crate::block::SyncedFrom;
use crate::block::TableCell;
use crate::block::TableOfContents;
use crate::block::TableRow;
use crate::block::TextBlock;
use crate::block::ToDo;
use crate::block::Toggle;
use crate::block::DEFAULT_COLOR;
use crate::block::DEFAULT_LANGUAGE;
use crate::block::DEFAULT_LINK_TYPE;
use crate::rich_text::normalize;

fn color(color: Option<String>) -> String {
    color.unwrap_or_else(|| DEFAULT_COLOR.to_string())
}

pub(crate) fn text_block(payload: TextPayload, children: Option<Vec<Block>>) -> TextBlock {
    TextBlock {
        rich_text: normalize(&payload.rich_text),
        color: color(payload.color),
        children,
    }
}

pub(crate) fn heading(payload: HeadingPayload, children: Option<Vec<Block>>) -> Heading {
    Heading {
        rich_text: normalize(&payload.rich_text),
        color: color(payload.color),
        is_toggleable: payload.is_toggleable.unwrap_or(false),
        children,
    }
}

pub(crate) fn to_do(payload: ToDoPayload, children: Option<Vec<Block>>) -> ToDo {
    ToDo {
        rich_text: normalize(&payload.rich_text),
        checked: payload.checked.unwrap_or(false),
        color: color(payload.color),
        children,
    }
}

pub(crate) fn toggle(payload: TextPayload, children: Vec<Block>) -> Toggle {
    Toggle {
        rich_text: normalize(&payload.rich_text),
        color: color(payload.color),
        children,
    }
}

pub(crate) async fn media(payload: MediaPayload, assets: &AssetCache) -> Media {
    let file_type = AssetKind::from_tag(&payload.kind);
    let url = assets
        .resolve(
            &file_type,
            payload.file.as_ref().map(|file| file.url.as_str()),
            payload.external.as_ref().map(|external| external.url.as_str()),
        )
        .await;

    Media {
        caption: normalize(&payload.caption),
        file_type,
        file: payload.file.map(|file| HostedFile {
            url: file.url,
            expiry_time: file.expiry_time,
        }),
        external: payload.external.map(|external| ExternalFile { url: external.url }),
        url,
    }
}

pub(crate) fn code(payload: CodePayload) -> Code {
    Code {
        caption: normalize(&payload.caption),
        rich_text: normalize(&payload.rich_text),
        language: payload
            .language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
    }
}

pub(crate) fn equation(payload: EquationPayload) -> Equation {
    Equation {
        expression: payload.expression.unwrap_or_default(),
    }
}

pub(crate) async fn callout(
    payload: CalloutPayload,
    children: Option<Vec<Block>>,
    assets: &AssetCache,
) -> Callout {
    let icon = match payload.icon {
        Some(raw) => icon(raw, assets).await,
        None => None,
    };

    Callout {
        rich_text: normalize(&payload.rich_text),
        icon,
        color: color(payload.color),
        children,
    }
}

/// Icons of an unknown type, or missing their typed object, are dropped.
pub(crate) async fn icon(raw: RawIcon, assets: &AssetCache) -> Option<Icon> {
    match raw.kind.as_str() {
        "emoji" => raw.emoji.map(|emoji| Icon::Emoji { emoji }),
        "external" => raw.external.map(|external| Icon::External { url: external.url }),
        "file" => {
            let file = raw.file?;
            let url = assets
                .resolve(&AssetKind::Hosted, Some(file.url.as_str()), None)
                .await;
            Some(Icon::File {
                url,
                expiry_time: file.expiry_time,
            })
        }
        other => {
            tracing::trace!(kind = other, "skipping unsupported icon");
            None
        }
    }
}

pub(crate) fn synced_block(
    payload: SyncedBlockPayload,
    children: Option<Vec<Block>>,
) -> SyncedBlock {
    SyncedBlock {
        synced_from: payload.synced_from.map(|from| SyncedFrom {
            block_id: from.block_id,
        }),
        children,
    }
}

pub(crate) fn link_block(payload: UrlPayload) -> LinkBlock {
    LinkBlock {
        caption: normalize(&payload.caption),
        url: payload.url.unwrap_or_default(),
    }
}

pub(crate) fn table_of_contents(payload: ColorPayload) -> TableOfContents {
    TableOfContents {
        color: color(payload.color),
    }
}

pub(crate) fn link_to_page(payload: LinkToPagePayload) -> LinkToPage {
    LinkToPage {
        link_type: payload
            .kind
            .unwrap_or_else(|| DEFAULT_LINK_TYPE.to_string()),
        page_id: payload.page_id.unwrap_or_default(),
    }
}

/// Cells are kept exactly as received, whatever the table's declared width.
pub(crate) fn table_row(id: String, has_children: bool, payload: &TableRowPayload) -> TableRow {
    TableRow {
        id,
        has_children,
        cells: payload
            .cells
            .iter()
            .map(|cell| TableCell {
                rich_text: normalize(cell),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use nsite_assets::AssetFetcher;
    use nsite_assets::FetchError;
    use nsite_assets::MemoryStore;
    use serde::de::DeserializeOwned;
    use serde_json::json;

    use super::*;

    struct StaticFetcher;

    #[async_trait]
    impl AssetFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Ok(b"bytes".to_vec())
        }
    }

    fn assets() -> AssetCache {
        AssetCache::new(Arc::new(StaticFetcher), Arc::new(MemoryStore::new()), "/img")
    }

    fn payload<T: DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let block = text_block(payload(json!({})), None);
        assert_eq!(block.color, "default");
        assert!(block.rich_text.is_empty());

        let todo = to_do(payload(json!({"rich_text": []})), None);
        assert!(!todo.checked);

        assert_eq!(code(payload(json!({}))).language, "plaintext");
        assert_eq!(equation(payload(json!({}))).expression, "");
        assert_eq!(link_block(payload(json!({}))).url, "");
        assert!(!heading(payload(json!({})), None).is_toggleable);

        let link = link_to_page(payload(json!({})));
        assert_eq!(link.link_type, "page_id");
        assert_eq!(link.page_id, "");
    }

    #[test]
    fn test_present_fields_are_kept() {
        let block = code(payload(json!({
            "language": "rust",
            "rich_text": [{"type": "text", "plain_text": "fn main() {}", "text": {"content": "fn main() {}"}}],
            "caption": []
        })));
        assert_eq!(block.language, "rust");
        assert_eq!(block.rich_text[0].text(), "fn main() {}");

        let link = link_to_page(payload(json!({"type": "database_id", "page_id": "p-9"})));
        assert_eq!(link.link_type, "database_id");
        assert_eq!(link.page_id, "p-9");
    }

    #[test]
    fn test_table_row_keeps_ragged_cells() {
        let row = table_row(
            "r".into(),
            false,
            &payload(json!({"cells": [
                [{"type": "text", "plain_text": "a", "text": {"content": "a"}}],
                [],
                [{"type": "text", "plain_text": "b", "text": {"content": "b"}},
                 {"type": "text", "plain_text": "c", "text": {"content": "c"}}]
            ]})),
        );
        let lens: Vec<usize> = row.cells.iter().map(|cell| cell.rich_text.len()).collect();
        assert_eq!(lens, [1, 0, 2]);
    }

    #[test]
    fn test_synced_block_records_source() {
        let block = synced_block(payload(json!({"synced_from": {"block_id": "orig"}})), None);
        assert_eq!(block.synced_from.unwrap().block_id, "orig");

        let original = synced_block(payload(json!({"synced_from": null})), None);
        assert!(original.synced_from.is_none());
    }

    #[tokio::test]
    async fn test_media_resolves_hosted_file() {
        let cache = assets();
        let block = media(
            payload(json!({
                "type": "file",
                "file": {"url": "https://s3.example.com/a/pic.png?sig=1", "expiry_time": "2024-01-01T00:00:00.000Z"},
                "caption": []
            })),
            &cache,
        )
        .await;

        assert_eq!(block.file_type, AssetKind::Hosted);
        assert!(block.url.starts_with("/img/"));
        assert!(block.url.ends_with(".png"));
        assert!(block.file.unwrap().expiry_time.is_some());
    }

    #[tokio::test]
    async fn test_media_keeps_external_url() {
        let cache = assets();
        let block = media(
            payload(json!({"type": "external", "external": {"url": "https://youtu.be/x"}})),
            &cache,
        )
        .await;
        assert_eq!(block.url, "https://youtu.be/x");
        assert!(block.file.is_none());
    }

    #[tokio::test]
    async fn test_icons() {
        let cache = assets();

        let emoji = icon(payload(json!({"type": "emoji", "emoji": "💡"})), &cache).await;
        assert_eq!(emoji, Some(Icon::Emoji { emoji: "💡".into() }));

        let external = icon(
            payload(json!({"type": "external", "external": {"url": "https://e.com/i.svg"}})),
            &cache,
        )
        .await;
        assert_eq!(
            external,
            Some(Icon::External {
                url: "https://e.com/i.svg".into()
            })
        );

        let hosted = icon(
            payload(json!({"type": "file", "file": {"url": "https://s3.example.com/i.gif?sig=2"}})),
            &cache,
        )
        .await;
        match hosted {
            Some(Icon::File { url, expiry_time }) => {
                assert!(url.starts_with("/img/"));
                assert!(expiry_time.is_none());
            }
            other => panic!("expected file icon, got {other:?}"),
        }

        assert_eq!(icon(payload(json!({"type": "custom_emoji"})), &cache).await, None);
        assert_eq!(icon(payload(json!({"type": "emoji"})), &cache).await, None);
    }
}
