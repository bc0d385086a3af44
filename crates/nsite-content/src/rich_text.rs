//! Inline text spans.

use nsite_notion::wire::RawAnnotations;
use nsite_notion::wire::RawMention;
use nsite_notion::wire::RawRichText;
use serde::Serialize;

use crate::block::DEFAULT_COLOR;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichText {
    pub annotations: Annotations,
    pub plain_text: String,
    /// Span-level link. Independent of [`RichTextContent::Text::link`]; Notion
    /// sends both and they are kept as received.
    pub href: Option<String>,
    #[serde(flatten)]
    pub content: RichTextContent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextContent {
    Text { content: String, link: Option<Link> },
    Equation { expression: String },
    Mention { mention: Mention },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mention {
    Page {
        id: String,
    },
    Date {
        start: String,
        end: Option<String>,
    },
    LinkMention {
        href: String,
        title: Option<String>,
    },
    CustomEmoji {
        id: String,
        name: String,
        url: String,
    },
    /// User, database and template mentions; only the tag is kept.
    Other {
        kind: String,
    },
}

impl RichText {
    /// The text a plain-text renderer should show for this span.
    #[must_use]
    pub fn text(&self) -> &str {
        match &self.content {
            RichTextContent::Text { content, .. } => content,
            RichTextContent::Equation { expression } => expression,
            RichTextContent::Mention { .. } => &self.plain_text,
        }
    }
}

/// Normalize a sequence of wire spans, preserving order.
#[must_use]
pub fn normalize(spans: &[RawRichText]) -> Vec<RichText> {
    spans.iter().map(normalize_span).collect()
}

/// Normalize one wire span.
///
/// Spans of an unknown type, or whose typed object is missing, become text
/// spans carrying their plain text.
#[must_use]
pub fn normalize_span(span: &RawRichText) -> RichText {
    let fallback = || RichTextContent::Text {
        content: span.plain_text.clone(),
        link: None,
    };

    let content = match span.kind.as_str() {
        "text" => span.text.as_ref().map_or_else(fallback, |text| RichTextContent::Text {
            content: text.content.clone(),
            link: text.link.as_ref().map(|link| Link {
                url: link.url.clone(),
            }),
        }),
        "equation" => span
            .equation
            .as_ref()
            .map_or_else(fallback, |eq| RichTextContent::Equation {
                expression: eq.expression.clone(),
            }),
        "mention" => span
            .mention
            .as_ref()
            .map_or_else(fallback, |mention| RichTextContent::Mention {
                mention: normalize_mention(mention),
            }),
        _ => fallback(),
    };

    RichText {
        annotations: annotations(&span.annotations),
        plain_text: span.plain_text.clone(),
        href: span.href.clone(),
        content,
    }
}

fn annotations(raw: &RawAnnotations) -> Annotations {
    Annotations {
        bold: raw.bold,
        italic: raw.italic,
        strikethrough: raw.strikethrough,
        underline: raw.underline,
        code: raw.code,
        color: if raw.color.is_empty() {
            DEFAULT_COLOR.to_string()
        } else {
            raw.color.clone()
        },
    }
}

fn normalize_mention(raw: &RawMention) -> Mention {
    let other = || Mention::Other {
        kind: raw.kind.clone(),
    };

    match raw.kind.as_str() {
        "page" => raw.page.as_ref().map_or_else(other, |page| Mention::Page {
            id: page.id.clone(),
        }),
        "date" => raw.date.as_ref().map_or_else(other, |date| Mention::Date {
            start: date.start.clone().unwrap_or_default(),
            end: date.end.clone(),
        }),
        "link_mention" => raw
            .link_mention
            .as_ref()
            .map_or_else(other, |link| Mention::LinkMention {
                href: link.href.clone(),
                title: link.title.clone(),
            }),
        "custom_emoji" => raw
            .custom_emoji
            .as_ref()
            .map_or_else(other, |emoji| Mention::CustomEmoji {
                id: emoji.id.clone(),
                name: emoji.name.clone(),
                url: emoji.url.clone(),
            }),
        _ => other(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRichText {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_span_keeps_both_links() {
        let span = normalize_span(&raw(json!({
            "type": "text",
            "plain_text": "docs",
            "href": "https://example.com/docs",
            "annotations": {"bold": true, "italic": false, "strikethrough": false,
                            "underline": true, "code": false, "color": "red"},
            "text": {"content": "docs", "link": {"url": "https://example.com/docs"}}
        })));

        assert_eq!(span.href.as_deref(), Some("https://example.com/docs"));
        assert_eq!(
            span.content,
            RichTextContent::Text {
                content: "docs".into(),
                link: Some(Link {
                    url: "https://example.com/docs".into()
                }),
            }
        );
        assert!(span.annotations.bold);
        assert!(span.annotations.underline);
        assert!(!span.annotations.code);
        assert_eq!(span.annotations.color, "red");
    }

    #[test]
    fn test_equation_span() {
        let span = normalize_span(&raw(json!({
            "type": "equation",
            "plain_text": "e=mc^2",
            "equation": {"expression": "e=mc^2"}
        })));
        assert_eq!(
            span.content,
            RichTextContent::Equation {
                expression: "e=mc^2".into()
            }
        );
        assert!(span.href.is_none());
        assert_eq!(span.annotations.color, "default");
    }

    #[test]
    fn test_mentions() {
        let page = normalize_span(&raw(json!({
            "type": "mention", "plain_text": "Other page",
            "mention": {"type": "page", "page": {"id": "p-1"}}
        })));
        let date = normalize_span(&raw(json!({
            "type": "mention", "plain_text": "2024-05-01",
            "mention": {"type": "date", "date": {"start": "2024-05-01", "end": null}}
        })));
        let link = normalize_span(&raw(json!({
            "type": "mention", "plain_text": "repo",
            "mention": {"type": "link_mention", "link_mention": {"href": "https://github.com/x", "title": "x"}}
        })));
        let emoji = normalize_span(&raw(json!({
            "type": "mention", "plain_text": ":party:",
            "mention": {"type": "custom_emoji", "custom_emoji": {"id": "e1", "name": "party", "url": "https://e/x.png"}}
        })));
        let user = normalize_span(&raw(json!({
            "type": "mention", "plain_text": "@Ada",
            "mention": {"type": "user", "user": {"id": "u1"}}
        })));

        let mention = |rt: RichText| match rt.content {
            RichTextContent::Mention { mention } => mention,
            other => panic!("expected mention, got {other:?}"),
        };
        assert_eq!(mention(page), Mention::Page { id: "p-1".into() });
        assert_eq!(
            mention(date),
            Mention::Date {
                start: "2024-05-01".into(),
                end: None
            }
        );
        assert_eq!(
            mention(link),
            Mention::LinkMention {
                href: "https://github.com/x".into(),
                title: Some("x".into())
            }
        );
        assert_eq!(
            mention(emoji),
            Mention::CustomEmoji {
                id: "e1".into(),
                name: "party".into(),
                url: "https://e/x.png".into()
            }
        );
        assert_eq!(mention(user), Mention::Other { kind: "user".into() });
    }

    #[test]
    fn test_unknown_span_type_becomes_text() {
        let span = normalize_span(&raw(json!({"type": "sparkles", "plain_text": "✨"})));
        assert_eq!(
            span.content,
            RichTextContent::Text {
                content: "✨".into(),
                link: None
            }
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let spans: Vec<RawRichText> = ["a", "b", "c"]
            .iter()
            .map(|t| raw(json!({"type": "text", "plain_text": t, "text": {"content": t}})))
            .collect();
        let texts: Vec<String> = normalize(&spans).iter().map(|s| s.text().to_string()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn test_serialized_shape() {
        let span = normalize_span(&raw(json!({
            "type": "mention", "plain_text": "p",
            "mention": {"type": "page", "page": {"id": "p-1"}}
        })));
        let value = serde_json::to_value(&span).unwrap();
        assert_eq!(value["type"], "mention");
        assert_eq!(value["mention"]["type"], "page");
        assert_eq!(value["mention"]["id"], "p-1");
        assert_eq!(value["annotations"]["color"], "default");
    }
}
