use serde_json::json;
use serde_json::Map;
use serde_json::Value;

/// Property names of the posts database.
pub mod property {
    pub const TITLE: &str = "Name";
    pub const SLUG: &str = "Slug";
    pub const DATE: &str = "Date";
    pub const TYPE: &str = "Type";
    pub const SHOW_ON_HOMEPAGE: &str = "Show on Homepage";
    pub const PIN_ORDER: &str = "Pin Order";
    pub const EXCERPT: &str = "Excerpt";
    pub const FEATURED_IMAGE: &str = "Featured Image";
    pub const TAGS: &str = "Tags";
    pub const PUBLISHED: &str = "Published";
}

/// The database queries the site issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentQuery {
    /// Published posts, newest first.
    Published,
    /// The published post whose slug equals the given one.
    PublishedSlug(String),
}

fn published_filter() -> Value {
    json!({
        "property": property::PUBLISHED,
        "checkbox": { "equals": true },
    })
}

impl DocumentQuery {
    /// Render the request body for `POST /databases/{id}/query`.
    #[must_use]
    pub fn body(&self, cursor: Option<&str>, page_size: u32) -> Value {
        let mut body = match self {
            Self::Published => json!({
                "filter": published_filter(),
                "sorts": [{ "property": property::DATE, "direction": "descending" }],
            }),
            Self::PublishedSlug(slug) => json!({
                "filter": {
                    "and": [
                        { "property": property::SLUG, "rich_text": { "equals": slug } },
                        published_filter(),
                    ]
                },
            }),
        };

        body["page_size"] = json!(page_size);
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        body
    }

    /// Evaluate the filter against a page's properties, the way the API
    /// would. Used by [`crate::InMemoryNotion`].
    #[must_use]
    pub fn matches(&self, properties: &Map<String, Value>) -> bool {
        let published = properties
            .get(property::PUBLISHED)
            .and_then(|p| p["checkbox"].as_bool())
            .unwrap_or(false);

        match self {
            Self::Published => published,
            Self::PublishedSlug(slug) => {
                let page_slug: String = properties
                    .get(property::SLUG)
                    .and_then(|p| p["rich_text"].as_array())
                    .map(|spans| {
                        spans
                            .iter()
                            .filter_map(|s| s["plain_text"].as_str())
                            .collect()
                    })
                    .unwrap_or_default();
                published && page_slug == *slug
            }
        }
    }

    /// Sort key for the query's ordering; `None` means source order.
    #[must_use]
    pub fn sort_key(&self, properties: &Map<String, Value>) -> Option<String> {
        match self {
            Self::Published => Some(
                properties
                    .get(property::DATE)
                    .and_then(|p| p["date"]["start"].as_str())
                    .unwrap_or_default()
                    .to_string(),
            ),
            Self::PublishedSlug(_) => None,
        }
    }
}
