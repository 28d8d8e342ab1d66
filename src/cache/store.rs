use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::warn;

use super::fingerprint::CacheFingerprint;
use crate::error::CacheError;

/// Metadata of one stored blob, rebuilt from the backing store on each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub path: PathBuf,
    pub last_modified: SystemTime,
    pub size_bytes: u64,
}

/// A stored blob together with its metadata.
#[derive(Debug, Clone)]
pub struct CachedBlob {
    pub data: Bytes,
    pub entry: CacheEntry,
}

/// Blob store keyed by fingerprint.
///
/// There is no expiry or eviction: an entry lives until someone deletes it.
/// Writers do not lock; concurrent puts of one fingerprint leave whichever
/// finished last.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Whether an entry exists for `fingerprint`.
    async fn exists(&self, fingerprint: &CacheFingerprint) -> bool;

    /// Read an entry.
    ///
    /// Returns [`CacheError::NotFound`] if there is none.
    async fn get(&self, fingerprint: &CacheFingerprint) -> Result<CachedBlob, CacheError>;

    /// Store `data` under `fingerprint`, replacing any existing entry.
    async fn put(
        &self,
        fingerprint: &CacheFingerprint,
        data: Bytes,
    ) -> Result<CacheEntry, CacheError>;
}

// =============================================================================
// Filesystem Store
// =============================================================================

/// Counter distinguishing temporary files of concurrent writers.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Store backed by a single flat directory.
///
/// The directory listing is the index: each entry is a file named after its
/// fingerprint, and its metadata comes from the file's own stat.
#[derive(Debug, Clone)]
pub struct FsCacheStore {
    dir: PathBuf,
}

impl FsCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the cache directory and its parents if missing.
    pub async fn ensure_dir(&self) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CacheError::io(&self.dir, e))
    }

    /// Location of the file for `fingerprint`.
    pub fn path_for(&self, fingerprint: &CacheFingerprint) -> PathBuf {
        self.dir.join(fingerprint.as_str())
    }

    fn temp_path_for(&self, fingerprint: &CacheFingerprint) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(
            ".{}.tmp.{}.{}",
            fingerprint.as_str(),
            std::process::id(),
            n
        ))
    }

    async fn entry_at(path: PathBuf) -> Result<CacheEntry, CacheError> {
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| CacheError::io(&path, e))?;
        if !metadata.is_file() {
            return Err(CacheError::NotFound(path.display().to_string()));
        }
        let last_modified = metadata
            .modified()
            .map_err(|e| CacheError::io(&path, e))?;

        Ok(CacheEntry {
            path,
            last_modified,
            size_bytes: metadata.len(),
        })
    }
}

#[async_trait]
impl CacheStore for FsCacheStore {
    async fn exists(&self, fingerprint: &CacheFingerprint) -> bool {
        tokio::fs::metadata(self.path_for(fingerprint))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    async fn get(&self, fingerprint: &CacheFingerprint) -> Result<CachedBlob, CacheError> {
        let path = self.path_for(fingerprint);
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| CacheError::io(&path, e))?;
        let entry = Self::entry_at(path).await?;

        Ok(CachedBlob {
            data: Bytes::from(data),
            entry,
        })
    }

    async fn put(
        &self,
        fingerprint: &CacheFingerprint,
        data: Bytes,
    ) -> Result<CacheEntry, CacheError> {
        let path = self.path_for(fingerprint);
        let temp = self.temp_path_for(fingerprint);

        write_then_rename(&temp, &path, tokio::fs::write(&temp, &data)).await?;
        Self::entry_at(path).await
    }
}

/// Run `write` against `temp`, then move `temp` over `path`.
///
/// Whatever `write` left at `temp` is removed if either step fails.
async fn write_then_rename<W>(temp: &Path, path: &Path, write: W) -> Result<(), CacheError>
where
    W: Future<Output = io::Result<()>>,
{
    if let Err(e) = write.await {
        discard_temp(temp).await;
        return Err(CacheError::io(temp, e));
    }
    if let Err(e) = tokio::fs::rename(temp, path).await {
        discard_temp(temp).await;
        return Err(CacheError::io(path, e));
    }
    Ok(())
}

async fn discard_temp(temp: &Path) {
    match tokio::fs::remove_file(temp).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            path = %temp.display(),
            error = %e,
            "Failed to remove temporary cache file"
        ),
    }
}
