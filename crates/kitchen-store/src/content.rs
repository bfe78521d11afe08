//! Content store existence checks
//!
//! The content store holds uploaded file bytes keyed by [`Checksum`]. Only
//! presence matters here; the upload transport populates it out of band.

use crate::checksum::Checksum;
use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashSet;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Existence lookup over uploaded file contents
#[async_trait]
pub trait ContentStore: Send + Sync + Debug {
    /// Whether a file with this checksum has been uploaded
    async fn exists(&self, checksum: &Checksum) -> Result<bool, StoreError>;
}

/// In-memory [`ContentStore`]
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    present: DashSet<Checksum>,
}

impl MemoryContentStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an upload
    pub fn insert(&self, checksum: Checksum) -> bool {
        self.present.insert(checksum)
    }

    pub fn remove(&self, checksum: &Checksum) -> bool {
        self.present.remove(checksum).is_some()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.present.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }
}

impl FromIterator<Checksum> for MemoryContentStore {
    fn from_iter<I: IntoIterator<Item = Checksum>>(iter: I) -> Self {
        Self {
            present: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn exists(&self, checksum: &Checksum) -> Result<bool, StoreError> {
        Ok(self.present.contains(checksum))
    }
}

/// Directory-backed [`ContentStore`]
///
/// A file named after the checksum directly under `root` means the content
/// is present. Subdirectories are ignored.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a checksum's content lives at
    #[must_use]
    pub fn path_for(&self, checksum: &Checksum) -> PathBuf {
        self.root.join(checksum.as_str())
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn exists(&self, checksum: &Checksum) -> Result<bool, StoreError> {
        let path = self.path_for(checksum);
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                tracing::debug!("Content lookup at {} failed: {}", path.display(), e);
                Err(StoreError::Io(e))
            }
        }
    }
}
