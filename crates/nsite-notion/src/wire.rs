//! Wire records as the Notion API returns them.
//!
//! Every field defaults when missing or `null` so that a sparse record
//! still deserializes; the content builders decide what a missing value
//! means.

use chrono::DateTime;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Deserializer;
use serde_json::Map;
use serde_json::Value;

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsPage<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub has_more: bool,
}

/// A block with its kind-specific payload left as JSON.
///
/// Notion nests the payload under a key named after the block type, e.g.
/// `{"type": "paragraph", "paragraph": {...}}`. The kind stays a string so
/// that kinds this crate has never heard of still deserialize.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_default")]
    pub has_children: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub last_edited_time: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawBlock {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, payload: Value) -> Self {
        let kind = kind.into();
        let mut fields = Map::new();
        fields.insert(kind.clone(), payload);
        Self {
            id: id.into(),
            kind,
            has_children: false,
            last_edited_time: DateTime::<Utc>::default(),
            fields,
        }
    }

    #[must_use]
    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    /// Deserialize the payload stored under this block's kind.
    ///
    /// A block without a payload object reads as `{}`.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self.fields.get(&self.kind) {
            Some(Value::Null) | None => T::deserialize(&Value::Object(Map::new())),
            Some(value) => T::deserialize(value),
        }
    }
}

/// A database row, i.e. one post.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPage {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub last_edited_time: DateTime<Utc>,
    #[serde(deserialize_with = "null_default")]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRichText {
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_default")]
    pub annotations: RawAnnotations,
    #[serde(deserialize_with = "null_default")]
    pub plain_text: String,
    pub href: Option<String>,
    pub text: Option<RawText>,
    pub equation: Option<RawEquation>,
    pub mention: Option<RawMention>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAnnotations {
    #[serde(deserialize_with = "null_default")]
    pub bold: bool,
    #[serde(deserialize_with = "null_default")]
    pub italic: bool,
    #[serde(deserialize_with = "null_default")]
    pub strikethrough: bool,
    #[serde(deserialize_with = "null_default")]
    pub underline: bool,
    #[serde(deserialize_with = "null_default")]
    pub code: bool,
    #[serde(deserialize_with = "null_default")]
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawText {
    #[serde(deserialize_with = "null_default")]
    pub content: String,
    pub link: Option<RawLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLink {
    #[serde(deserialize_with = "null_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEquation {
    #[serde(deserialize_with = "null_default")]
    pub expression: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMention {
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    pub page: Option<RawIdRef>,
    pub date: Option<RawDate>,
    pub link_mention: Option<RawLinkMention>,
    pub custom_emoji: Option<RawCustomEmoji>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIdRef {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDate {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLinkMention {
    #[serde(deserialize_with = "null_default")]
    pub href: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCustomEmoji {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIcon {
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    pub emoji: Option<String>,
    pub external: Option<RawExternalFile>,
    pub file: Option<RawHostedFile>,
}

/// A Notion-hosted file. The URL is signed and stops working after
/// `expiry_time`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHostedFile {
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    pub expiry_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExternalFile {
    #[serde(deserialize_with = "null_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextPayload {
    #[serde(deserialize_with = "null_default")]
    pub rich_text: Vec<RawRichText>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeadingPayload {
    #[serde(deserialize_with = "null_default")]
    pub rich_text: Vec<RawRichText>,
    pub color: Option<String>,
    pub is_toggleable: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToDoPayload {
    #[serde(deserialize_with = "null_default")]
    pub rich_text: Vec<RawRichText>,
    pub color: Option<String>,
    pub checked: Option<bool>,
}

/// Payload shared by `image`, `video`, `audio` and `file` blocks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaPayload {
    #[serde(deserialize_with = "null_default")]
    pub caption: Vec<RawRichText>,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    pub file: Option<RawHostedFile>,
    pub external: Option<RawExternalFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodePayload {
    #[serde(deserialize_with = "null_default")]
    pub caption: Vec<RawRichText>,
    #[serde(deserialize_with = "null_default")]
    pub rich_text: Vec<RawRichText>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EquationPayload {
    pub expression: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalloutPayload {
    #[serde(deserialize_with = "null_default")]
    pub rich_text: Vec<RawRichText>,
    pub icon: Option<RawIcon>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncedBlockPayload {
    pub synced_from: Option<RawSyncedFrom>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSyncedFrom {
    #[serde(deserialize_with = "null_default")]
    pub block_id: String,
}

/// Payload shared by `embed`, `bookmark` and `link_preview` blocks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UrlPayload {
    #[serde(deserialize_with = "null_default")]
    pub caption: Vec<RawRichText>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TablePayload {
    pub table_width: Option<u32>,
    pub has_column_header: Option<bool>,
    pub has_row_header: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableRowPayload {
    #[serde(deserialize_with = "null_default")]
    pub cells: Vec<Vec<RawRichText>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorPayload {
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinkToPagePayload {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page_id: Option<String>,
}

/// Read an explicit `null` as the type's default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
