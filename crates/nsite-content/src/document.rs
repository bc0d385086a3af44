//! Projection of a database row onto the metadata a site needs.

use chrono::DateTime;
use chrono::Utc;
use nsite_assets::AssetKind;
use nsite_notion::property;
use nsite_notion::RawPage;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

const DEFAULT_KIND: &str = "blog";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// ISO date as entered in Notion, or empty.
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub show_on_homepage: bool,
    /// `None` means unpinned.
    pub pin_order: Option<f64>,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub tags: Vec<Tag>,
    pub last_edited_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
    pub description: String,
}

/// The first file of the featured image property, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedImage {
    pub kind: AssetKind,
    pub url: String,
}

impl Document {
    /// Returns `None` when the page has no title or no slug property.
    #[must_use]
    pub fn from_page(page: &RawPage) -> Option<Self> {
        let props = &page.properties;
        let title = props.get(property::TITLE)?;
        let slug = props.get(property::SLUG)?;

        Some(Self {
            id: page.id.clone(),
            title: first_plain_text(title, "title"),
            slug: first_plain_text(slug, "rich_text"),
            date: str_at(props, property::DATE, "/date/start")
                .unwrap_or_default()
                .to_string(),
            kind: str_at(props, property::TYPE, "/select/name")
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_KIND)
                .to_string(),
            show_on_homepage: props
                .get(property::SHOW_ON_HOMEPAGE)
                .and_then(|p| p.get("checkbox"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
            pin_order: props
                .get(property::PIN_ORDER)
                .and_then(|p| p.get("number"))
                .and_then(Value::as_f64),
            excerpt: props
                .get(property::EXCERPT)
                .map(|p| first_plain_text(p, "rich_text"))
                .unwrap_or_default(),
            featured_image: featured_image(page).map(|image| image.url),
            tags: tags(props),
            last_edited_time: page.last_edited_time,
        })
    }
}

/// Files of other types, or without a URL, are ignored.
#[must_use]
pub fn featured_image(page: &RawPage) -> Option<FeaturedImage> {
    let file = page
        .properties
        .get(property::FEATURED_IMAGE)?
        .get("files")?
        .as_array()?
        .first()?;

    let kind = AssetKind::from_tag(file.get("type")?.as_str()?);
    let url = match kind {
        AssetKind::Hosted => file.pointer("/file/url")?,
        AssetKind::External => file.pointer("/external/url")?,
        AssetKind::Other(_) => return None,
    };

    Some(FeaturedImage {
        kind,
        url: url.as_str()?.to_string(),
    })
}

fn first_plain_text(prop: &Value, field: &str) -> String {
    prop.get(field)
        .and_then(Value::as_array)
        .and_then(|spans| spans.first())
        .and_then(|span| span.get("plain_text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn str_at<'a>(props: &'a Map<String, Value>, name: &str, pointer: &str) -> Option<&'a str> {
    props.get(name)?.pointer(pointer)?.as_str()
}

fn tags(props: &Map<String, Value>) -> Vec<Tag> {
    let Some(options) = props
        .get(property::TAGS)
        .and_then(|p| p.get("multi_select"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    options
        .iter()
        .map(|option| {
            let field = |key: &str| {
                option
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Tag {
                id: field("id"),
                name: field("name"),
                color: field("color"),
                description: String::new(),
            }
        })
        .collect()
}
