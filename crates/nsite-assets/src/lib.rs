//! Snapshots of Notion-hosted files.
//!
//! Notion hands out signed S3 URLs for uploaded images and files, and those
//! URLs expire about an hour after they were issued. A statically built site
//! cannot link to them, so each one is downloaded once into a local
//! directory and replaced by a stable root-relative reference.
//!
//! The file name is derived from the URL *path* only. Re-signing changes the
//! query string but not the path, so a rebuild resolves the same upload to
//! the file written by an earlier build without touching the network.

mod cache;
mod fetch;
mod store;

pub use cache::extension;
pub use cache::identity;
pub use cache::AssetCache;
pub use cache::AssetKind;
pub use fetch::AssetFetcher;
pub use fetch::FetchError;
pub use fetch::HttpFetcher;
pub use store::AssetStore;
pub use store::DirStore;
pub use store::MemoryStore;
