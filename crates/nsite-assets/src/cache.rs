use std::io;
use std::sync::Arc;

use camino::Utf8Path;
use serde::Serialize;
use serde::Serializer;
use tokio::sync::OnceCell;
use url::Url;

use crate::fetch::AssetFetcher;
use crate::store::AssetStore;

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".avif"];
const FALLBACK_EXTENSION: &str = ".png";

/// How a file object is hosted, from its `type` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    /// `"file"`: uploaded to Notion, served from an expiring signed URL.
    Hosted,
    /// `"external"`: a URL the author pasted in.
    External,
    Other(String),
}

impl AssetKind {
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "file" => Self::Hosted,
            "external" => Self::External,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hosted => "file",
            Self::External => "external",
            Self::Other(tag) => tag,
        }
    }
}

impl Serialize for AssetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Cache key for a URL path: lowercase hex MD5 of the path alone.
#[must_use]
pub fn identity(path: &str) -> String {
    format!("{:x}", md5::compute(path.as_bytes()))
}

/// File extension (with the dot) to store a snapshot under.
///
/// Keeps the path's own extension when it is a known image type and falls
/// back to `.png` otherwise.
#[must_use]
pub fn extension(path: &str) -> String {
    Utf8Path::new(path)
        .extension()
        .map(|ext| format!(".{ext}"))
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

/// Resolves file objects to URLs that stay valid after the build.
///
/// Lookups never fail: when a snapshot cannot be taken the original URL is
/// returned, which at least renders until it expires.
pub struct AssetCache {
    fetcher: Arc<dyn AssetFetcher>,
    store: Arc<dyn AssetStore>,
    public_prefix: String,
    dir_ready: OnceCell<()>,
}

impl AssetCache {
    pub fn new(
        fetcher: Arc<dyn AssetFetcher>,
        store: Arc<dyn AssetStore>,
        public_prefix: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            store,
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
            dir_ready: OnceCell::new(),
        }
    }

    /// Resolve a file object to the URL the renderer should use.
    ///
    /// Hosted files are snapshotted; anything else is returned as given,
    /// preferring the external URL.
    pub async fn resolve(
        &self,
        kind: &AssetKind,
        hosted_url: Option<&str>,
        external_url: Option<&str>,
    ) -> String {
        let hosted_url = hosted_url.filter(|url| !url.is_empty());
        match (kind, hosted_url) {
            (AssetKind::Hosted, Some(url)) => self.snapshot(url).await,
            _ => external_url.or(hosted_url).unwrap_or_default().to_string(),
        }
    }

    async fn snapshot(&self, url: &str) -> String {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(url, error = %e, "cannot parse asset URL, keeping it as is");
                return url.to_string();
            }
        };

        let path = parsed.path();
        let file_name = format!("{}{}", identity(path), extension(path));
        let reference = format!("{}/{file_name}", self.public_prefix);

        if let Err(e) = self.ensure_dir().await {
            tracing::error!(error = %e, "failed to create asset directory");
            return url.to_string();
        }

        if self.store.exists(&file_name) {
            tracing::trace!(file_name, "asset already cached");
            return reference;
        }

        let bytes = match self.fetcher.fetch(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(path, error = %e, "failed to download asset");
                return url.to_string();
            }
        };

        if let Err(e) = self.store.write(&file_name, &bytes) {
            tracing::error!(file_name, error = %e, "failed to write asset");
            return url.to_string();
        }

        tracing::info!(file_name, kb = bytes.len() / 1024, "downloaded asset");
        reference
    }

    async fn ensure_dir(&self) -> io::Result<()> {
        self.dir_ready
            .get_or_try_init(|| async { self.store.create_dir_all() })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::store::DirStore;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    const SIGNED: &str = "https://prod-files-secure.s3.us-west-2.amazonaws.com/ws/abc/photo.jpg?X-Amz-Signature=one";
    const RESIGNED: &str = "https://prod-files-secure.s3.us-west-2.amazonaws.com/ws/abc/photo.jpg?X-Amz-Signature=two";

    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
        status: Option<u16>,
    }

    impl CountingFetcher {
        fn failing(status: u16) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                status: Some(status),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AssetFetcher for CountingFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.status {
                Some(status) => Err(FetchError::Status(status)),
                None => Ok(b"image-bytes".to_vec()),
            }
        }
    }

    fn cache_with(fetcher: &Arc<CountingFetcher>, store: &Arc<MemoryStore>) -> AssetCache {
        AssetCache::new(fetcher.clone(), store.clone(), "/notion-images")
    }

    mod naming {
        use super::*;

        #[test]
        fn test_identity_is_md5_hex_of_path() {
            assert_eq!(identity(""), "d41d8cd98f00b204e9800998ecf8427e");
            assert_eq!(identity("/ws/abc/photo.jpg").len(), 32);
        }

        #[test]
        fn test_extension_keeps_known_image_types() {
            assert_eq!(extension("/a/photo.jpg"), ".jpg");
            assert_eq!(extension("/a/photo.WEBP"), ".WEBP");
            assert_eq!(extension("/a/diagram.svg"), ".svg");
        }

        #[test]
        fn test_extension_falls_back_to_png() {
            assert_eq!(extension("/a/document.pdf"), ".png");
            assert_eq!(extension("/a/no-extension"), ".png");
            assert_eq!(extension("/"), ".png");
        }

        #[test]
        fn test_asset_kind_tags() {
            assert_eq!(AssetKind::from_tag("file"), AssetKind::Hosted);
            assert_eq!(AssetKind::from_tag("external"), AssetKind::External);
            assert_eq!(AssetKind::from_tag("file_upload").as_str(), "file_upload");
        }
    }

    mod resolve {
        use super::*;

        #[tokio::test]
        async fn test_hosted_asset_is_downloaded_once() {
            let fetcher = Arc::new(CountingFetcher::default());
            let store = Arc::new(MemoryStore::new());
            let cache = cache_with(&fetcher, &store);

            let first = cache.resolve(&AssetKind::Hosted, Some(SIGNED), None).await;
            let second = cache.resolve(&AssetKind::Hosted, Some(RESIGNED), None).await;

            let expected = format!("/notion-images/{}.jpg", identity("/ws/abc/photo.jpg"));
            assert_eq!(first, expected);
            assert_eq!(second, expected);
            assert_eq!(fetcher.calls(), 1);
            assert_eq!(store.len(), 1);
        }

        #[tokio::test]
        async fn test_directory_is_created_once() {
            let fetcher = Arc::new(CountingFetcher::default());
            let store = Arc::new(MemoryStore::new());
            let cache = cache_with(&fetcher, &store);

            assert_eq!(store.dir_creations(), 0);
            cache.resolve(&AssetKind::Hosted, Some(SIGNED), None).await;
            cache
                .resolve(&AssetKind::Hosted, Some("https://s3.example.com/other.png"), None)
                .await;
            assert_eq!(store.dir_creations(), 1);
        }

        #[tokio::test]
        async fn test_failed_download_returns_original_url() {
            let fetcher = Arc::new(CountingFetcher::failing(403));
            let store = Arc::new(MemoryStore::new());
            let cache = cache_with(&fetcher, &store);

            let resolved = cache.resolve(&AssetKind::Hosted, Some(SIGNED), None).await;
            assert_eq!(resolved, SIGNED);
            assert!(store.is_empty());

            // Nothing was cached, so the next build tries again.
            cache.resolve(&AssetKind::Hosted, Some(SIGNED), None).await;
            assert_eq!(fetcher.calls(), 2);
        }

        #[tokio::test]
        async fn test_unparseable_url_is_returned_unchanged() {
            let fetcher = Arc::new(CountingFetcher::default());
            let store = Arc::new(MemoryStore::new());
            let cache = cache_with(&fetcher, &store);

            let resolved = cache.resolve(&AssetKind::Hosted, Some("not a url"), None).await;
            assert_eq!(resolved, "not a url");
            assert_eq!(fetcher.calls(), 0);
        }

        #[tokio::test]
        async fn test_external_asset_is_returned_verbatim() {
            let fetcher = Arc::new(CountingFetcher::default());
            let store = Arc::new(MemoryStore::new());
            let cache = cache_with(&fetcher, &store);

            let url = "https://images.example.com/cat.gif?size=large";
            let resolved = cache.resolve(&AssetKind::External, None, Some(url)).await;
            assert_eq!(resolved, url);
            assert_eq!(fetcher.calls(), 0);
            assert_eq!(store.dir_creations(), 0);
        }

        #[tokio::test]
        async fn test_missing_urls_resolve_to_empty() {
            let fetcher = Arc::new(CountingFetcher::default());
            let store = Arc::new(MemoryStore::new());
            let cache = cache_with(&fetcher, &store);

            assert_eq!(cache.resolve(&AssetKind::External, None, None).await, "");
            assert_eq!(cache.resolve(&AssetKind::Hosted, None, None).await, "");
            assert_eq!(fetcher.calls(), 0);
        }

        #[tokio::test]
        async fn test_hosted_without_url_falls_back_to_external() {
            let fetcher = Arc::new(CountingFetcher::default());
            let store = Arc::new(MemoryStore::new());
            let cache = cache_with(&fetcher, &store);

            let external = "https://images.example.com/x.png";
            let resolved = cache
                .resolve(&AssetKind::Hosted, Some(""), Some(external))
                .await;
            assert_eq!(resolved, external);
            assert_eq!(cache.resolve(&AssetKind::Hosted, Some(""), None).await, "");
            assert_eq!(fetcher.calls(), 0);
            assert_eq!(store.dir_creations(), 0);
        }
    }

    mod persistence {
        use super::*;
        use camino::Utf8PathBuf;

        #[tokio::test]
        async fn test_snapshot_survives_a_new_cache_instance() {
            let root = tempfile::tempdir().unwrap();
            let dir = Utf8PathBuf::from_path_buf(root.path().join("notion-images")).unwrap();
            let fetcher = Arc::new(CountingFetcher::default());

            let first = AssetCache::new(
                fetcher.clone(),
                Arc::new(DirStore::new(dir.clone())),
                "/notion-images/",
            );
            let reference = first.resolve(&AssetKind::Hosted, Some(SIGNED), None).await;
            assert!(dir.is_dir());

            let second =
                AssetCache::new(fetcher.clone(), Arc::new(DirStore::new(dir.clone())), "/notion-images");
            let again = second.resolve(&AssetKind::Hosted, Some(RESIGNED), None).await;

            assert_eq!(reference, again);
            assert_eq!(fetcher.calls(), 1);

            let file_name = reference.trim_start_matches("/notion-images/");
            assert_eq!(std::fs::read(dir.join(file_name)).unwrap(), b"image-bytes");
        }
    }
}
