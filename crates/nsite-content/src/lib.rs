//! Typed document trees built from Notion pages.
//!
//! [`Materializer`] walks a page's block children depth-first, following
//! every pagination cursor, and produces a tree of [`Block`]s whose hosted
//! media already point at local snapshots. [`ContentService`] wraps it
//! together with the posts database queries a site build needs.

mod block;
mod builders;
mod composite;
mod document;
mod materialize;
pub mod rich_text;
mod service;

pub use block::*;
pub use document::featured_image;
pub use document::Document;
pub use document::FeaturedImage;
pub use document::Tag;
pub use materialize::BoxFuture;
pub use materialize::Materializer;
pub use rich_text::RichText;
pub use service::ContentService;
pub use service::ServiceError;
