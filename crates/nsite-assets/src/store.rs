use std::io;
use std::io::Write;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::sync::PoisonError;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use rustc_hash::FxHashMap;

/// Where snapshots are persisted. File names are flat, no subdirectories.
pub trait AssetStore: Send + Sync {
    fn exists(&self, file_name: &str) -> bool;
    /// Create the backing directory. Must succeed if it already exists.
    fn create_dir_all(&self) -> io::Result<()>;
    fn write(&self, file_name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Stores snapshots as files in a directory.
pub struct DirStore {
    dir: Utf8PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }
}

impl AssetStore for DirStore {
    fn exists(&self, file_name: &str) -> bool {
        self.dir.join(file_name).exists()
    }

    fn create_dir_all(&self) -> io::Result<()> {
        match std::fs::create_dir_all(&self.dir) {
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            result => result,
        }
    }

    /// Writes through a temp file in the same directory, so a reader never
    /// sees a half-written snapshot under the final name.
    fn write(&self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(self.dir.join(file_name))
            .map_err(|e| e.error)?;
        Ok(())
    }
}

/// Keeps snapshots in memory.
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<FxHashMap<String, Vec<u8>>>,
    dir_creations: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(file_name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times [`AssetStore::create_dir_all`] was called.
    pub fn dir_creations(&self) -> usize {
        self.dir_creations.load(Ordering::SeqCst)
    }
}

impl AssetStore for MemoryStore {
    fn exists(&self, file_name: &str) -> bool {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(file_name)
    }

    fn create_dir_all(&self) -> io::Result<()> {
        self.dir_creations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write(&self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file_name.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    mod dir_store {
        use super::*;

        fn utf8(path: &std::path::Path) -> Utf8PathBuf {
            Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
        }

        #[test]
        fn test_create_dir_all_is_idempotent() {
            let root = tempdir().unwrap();
            let store = DirStore::new(utf8(root.path()).join("a/b"));

            store.create_dir_all().unwrap();
            store.create_dir_all().unwrap();
            assert!(store.dir().is_dir());
        }

        #[test]
        fn test_write_then_exists() {
            let root = tempdir().unwrap();
            let store = DirStore::new(utf8(root.path()));

            assert!(!store.exists("x.png"));
            store.write("x.png", b"png").unwrap();
            assert!(store.exists("x.png"));
            assert_eq!(std::fs::read(root.path().join("x.png")).unwrap(), b"png");
        }

        #[test]
        fn test_write_overwrites() {
            let root = tempdir().unwrap();
            let store = DirStore::new(utf8(root.path()));

            store.write("x.png", b"one").unwrap();
            store.write("x.png", b"two").unwrap();
            assert_eq!(std::fs::read(root.path().join("x.png")).unwrap(), b"two");
            assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 1);
        }
    }

    mod memory_store {
        use super::*;

        #[test]
        fn test_write_then_get() {
            let store = MemoryStore::new();
            assert!(store.is_empty());
            store.write("a.png", b"a").unwrap();
            assert!(store.exists("a.png"));
            assert_eq!(store.get("a.png").unwrap(), b"a");
            assert_eq!(store.len(), 1);
        }
    }
}
