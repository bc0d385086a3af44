//! The typed document tree.
//!
//! Serialized, a block is `{"id", "last_edited_time", "has_children",
//! "type", ...payload}` with the same type tags Notion uses, which is the
//! shape the templates consume.

use chrono::DateTime;
use chrono::Utc;
use nsite_assets::AssetKind;
use serde::Serialize;

use crate::rich_text::RichText;

pub const DEFAULT_COLOR: &str = "default";
pub const DEFAULT_LANGUAGE: &str = "plaintext";
pub const DEFAULT_LINK_TYPE: &str = "page_id";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub id: String,
    pub last_edited_time: DateTime<Utc>,
    pub has_children: bool,
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl Block {
    #[must_use]
    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    /// The block's own child sequence, for kinds that carry one.
    ///
    /// Columns of a column list are not children in this sense; see
    /// [`ColumnList::columns`].
    #[must_use]
    pub fn children(&self) -> Option<&[Block]> {
        match &self.kind {
            BlockKind::Paragraph(b)
            | BlockKind::BulletedListItem(b)
            | BlockKind::NumberedListItem(b)
            | BlockKind::Quote(b) => b.children.as_deref(),
            BlockKind::Heading1(h) | BlockKind::Heading2(h) | BlockKind::Heading3(h) => {
                h.children.as_deref()
            }
            BlockKind::ToDo(t) => t.children.as_deref(),
            BlockKind::Callout(c) => c.children.as_deref(),
            BlockKind::SyncedBlock(s) => s.children.as_deref(),
            BlockKind::Toggle(t) => Some(&t.children),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph(TextBlock),
    #[serde(rename = "heading_1")]
    Heading1(Heading),
    #[serde(rename = "heading_2")]
    Heading2(Heading),
    #[serde(rename = "heading_3")]
    Heading3(Heading),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    ToDo(ToDo),
    Image(Media),
    Video(Media),
    Audio(Media),
    File(Media),
    Code(Code),
    Quote(TextBlock),
    Equation(Equation),
    Callout(Callout),
    SyncedBlock(SyncedBlock),
    Toggle(Toggle),
    Embed(LinkBlock),
    Bookmark(LinkBlock),
    LinkPreview(LinkBlock),
    Table(Table),
    ColumnList(ColumnList),
    TableOfContents(TableOfContents),
    LinkToPage(LinkToPage),
    Divider,
}

impl BlockKind {
    #[must_use]
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Paragraph(_) => BlockType::Paragraph,
            Self::Heading1(_) => BlockType::Heading1,
            Self::Heading2(_) => BlockType::Heading2,
            Self::Heading3(_) => BlockType::Heading3,
            Self::BulletedListItem(_) => BlockType::BulletedListItem,
            Self::NumberedListItem(_) => BlockType::NumberedListItem,
            Self::ToDo(_) => BlockType::ToDo,
            Self::Image(_) => BlockType::Image,
            Self::Video(_) => BlockType::Video,
            Self::Audio(_) => BlockType::Audio,
            Self::File(_) => BlockType::File,
            Self::Code(_) => BlockType::Code,
            Self::Quote(_) => BlockType::Quote,
            Self::Equation(_) => BlockType::Equation,
            Self::Callout(_) => BlockType::Callout,
            Self::SyncedBlock(_) => BlockType::SyncedBlock,
            Self::Toggle(_) => BlockType::Toggle,
            Self::Embed(_) => BlockType::Embed,
            Self::Bookmark(_) => BlockType::Bookmark,
            Self::LinkPreview(_) => BlockType::LinkPreview,
            Self::Table(_) => BlockType::Table,
            Self::ColumnList(_) => BlockType::ColumnList,
            Self::TableOfContents(_) => BlockType::TableOfContents,
            Self::LinkToPage(_) => BlockType::LinkToPage,
            Self::Divider => BlockType::Divider,
        }
    }
}

/// Every block type tag that is understood. Anything else is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Image,
    Video,
    Audio,
    File,
    Code,
    Quote,
    Equation,
    Callout,
    SyncedBlock,
    Toggle,
    Embed,
    Bookmark,
    LinkPreview,
    Table,
    /// Only valid as a child of [`BlockType::Table`].
    TableRow,
    ColumnList,
    /// Only valid as a child of [`BlockType::ColumnList`].
    Column,
    TableOfContents,
    LinkToPage,
    Divider,
}

impl BlockType {
    pub const ALL: [BlockType; 27] = [
        Self::Paragraph,
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::BulletedListItem,
        Self::NumberedListItem,
        Self::ToDo,
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::File,
        Self::Code,
        Self::Quote,
        Self::Equation,
        Self::Callout,
        Self::SyncedBlock,
        Self::Toggle,
        Self::Embed,
        Self::Bookmark,
        Self::LinkPreview,
        Self::Table,
        Self::TableRow,
        Self::ColumnList,
        Self::Column,
        Self::TableOfContents,
        Self::LinkToPage,
        Self::Divider,
    ];

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let block_type = match tag {
            "paragraph" => Self::Paragraph,
            "heading_1" => Self::Heading1,
            "heading_2" => Self::Heading2,
            "heading_3" => Self::Heading3,
            "bulleted_list_item" => Self::BulletedListItem,
            "numbered_list_item" => Self::NumberedListItem,
            "to_do" => Self::ToDo,
            "image" => Self::Image,
            "video" => Self::Video,
            "audio" => Self::Audio,
            "file" => Self::File,
            "code" => Self::Code,
            "quote" => Self::Quote,
            "equation" => Self::Equation,
            "callout" => Self::Callout,
            "synced_block" => Self::SyncedBlock,
            "toggle" => Self::Toggle,
            "embed" => Self::Embed,
            "bookmark" => Self::Bookmark,
            "link_preview" => Self::LinkPreview,
            "table" => Self::Table,
            "table_row" => Self::TableRow,
            "column_list" => Self::ColumnList,
            "column" => Self::Column,
            "table_of_contents" => Self::TableOfContents,
            "link_to_page" => Self::LinkToPage,
            "divider" => Self::Divider,
            _ => return None,
        };
        Some(block_type)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::ToDo => "to_do",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::Equation => "equation",
            Self::Callout => "callout",
            Self::SyncedBlock => "synced_block",
            Self::Toggle => "toggle",
            Self::Embed => "embed",
            Self::Bookmark => "bookmark",
            Self::LinkPreview => "link_preview",
            Self::Table => "table",
            Self::TableRow => "table_row",
            Self::ColumnList => "column_list",
            Self::Column => "column",
            Self::TableOfContents => "table_of_contents",
            Self::LinkToPage => "link_to_page",
            Self::Divider => "divider",
        }
    }
}

/// Paragraphs, list items and quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub rich_text: Vec<RichText>,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub rich_text: Vec<RichText>,
    pub color: String,
    pub is_toggleable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToDo {
    pub rich_text: Vec<RichText>,
    pub checked: bool,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
}

/// Images, videos, audio and file attachments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Media {
    pub caption: Vec<RichText>,
    pub file_type: AssetKind,
    pub file: Option<HostedFile>,
    pub external: Option<ExternalFile>,
    /// What the renderer should link to: a local snapshot for hosted files,
    /// the external URL otherwise.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostedFile {
    pub url: String,
    pub expiry_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalFile {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Code {
    pub caption: Vec<RichText>,
    pub rich_text: Vec<RichText>,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Equation {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Callout {
    pub rich_text: Vec<RichText>,
    pub icon: Option<Icon>,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji {
        emoji: String,
    },
    External {
        url: String,
    },
    /// `url` is already resolved through the asset cache.
    File {
        url: String,
        expiry_time: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncedBlock {
    /// Set on copies: the original block this one mirrors. A cross-link,
    /// not ownership.
    pub synced_from: Option<SyncedFrom>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncedFrom {
    pub block_id: String,
}

/// Toggles always carry children, even when the block says it has none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggle {
    pub rich_text: Vec<RichText>,
    pub color: String,
    pub children: Vec<Block>,
}

/// Embeds, bookmarks and link previews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkBlock {
    pub caption: Vec<RichText>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub table_width: u32,
    pub has_column_header: bool,
    pub has_row_header: bool,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub has_children: bool,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnList {
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub id: String,
    pub has_children: bool,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOfContents {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkToPage {
    pub link_type: String,
    pub page_id: String,
}
