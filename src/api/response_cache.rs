use crate::api::error::ApiError;
use bincode::config::{Configuration, Fixint, LittleEndian};
use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

const CACHE_FILE_EXTENSION: &str = "bin";
// Prefix `NamedTempFile` gives files that were never persisted.
const TEMP_FILE_PREFIX: &str = ".tmp";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

#[derive(Debug, Serialize, Deserialize)]
struct CachedResponse {
    url: String,
    /// Milliseconds since the Unix epoch.
    stored_at: i64,
    body: String,
}

/// Successful response bodies on disk, one file per request URL.
///
/// Files are named after the SHA-256 of the URL. An entry is served while it is younger
/// than the TTL, and is simply overwritten by the next successful request after that.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(cache_dir: &Path, ttl: Duration) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            ttl,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.cache_dir
            .join(format!("{:x}.{}", digest, CACHE_FILE_EXTENSION))
    }

    /// Returns the cached body for `url` if a fresh entry exists.
    pub fn get(&self, url: &str) -> Result<Option<String>, ApiError> {
        let path = self.entry_path(url);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ApiError::CacheRead(path, e)),
        };

        let entry = match bincode::serde::decode_from_slice::<CachedResponse, _>(
            &bytes,
            BINCODE_CONFIG,
        ) {
            Ok((entry, _)) => entry,
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", path.display(), e);
                return Ok(None);
            }
        };
        if entry.url != url {
            warn!("Cache entry {} belongs to another request", path.display());
            return Ok(None);
        }

        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = entry.stored_at.saturating_add(ttl_ms);
        if Utc::now().timestamp_millis() >= expires_at {
            debug!("Cache entry for {} expired", url);
            return Ok(None);
        }
        Ok(Some(entry.body))
    }

    /// Stores `body` for `url`. The entry is written to a temporary file and renamed into
    /// place, so concurrent readers see either the old entry or the new one.
    pub fn put(&self, url: &str, body: &str) -> Result<(), ApiError> {
        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| ApiError::CacheDirCreation(self.cache_dir.clone(), e))?;

        let entry = CachedResponse {
            url: url.to_string(),
            stored_at: Utc::now().timestamp_millis(),
            body: body.to_string(),
        };
        let bytes = bincode::serde::encode_to_vec(&entry, BINCODE_CONFIG)
            .map_err(|e| ApiError::CacheEncode(Box::new(e)))?;

        let path = self.entry_path(url);
        let mut temp_file = NamedTempFile::new_in(&self.cache_dir)
            .map_err(|e| ApiError::CacheWrite(path.clone(), e))?;
        temp_file
            .write_all(&bytes)
            .map_err(|e| ApiError::CacheWrite(path.clone(), e))?;
        temp_file
            .persist(&path)
            .map_err(|e| ApiError::CacheWrite(path.clone(), e.error))?;

        debug!("Cached {} bytes for {} at {}", bytes.len(), url, path.display());
        Ok(())
    }

    /// Deletes every cache entry, returning how many were removed. Temporary files left
    /// behind by an interrupted `put` are deleted too but not counted.
    pub fn clear(&self) -> Result<usize, ApiError> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(ApiError::CacheRead(self.cache_dir.clone(), e)),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| ApiError::CacheRead(self.cache_dir.clone(), e))?
                .path();
            let is_entry = path.extension() == Some(OsStr::new(CACHE_FILE_EXTENSION));
            let is_leftover = path
                .file_name()
                .and_then(OsStr::to_str)
                .is_some_and(|name| name.starts_with(TEMP_FILE_PREFIX));
            if is_entry || is_leftover {
                fs::remove_file(&path).map_err(|e| ApiError::CacheDeletion(path.clone(), e))?;
            }
            if is_entry {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://api.open-meteo.com/v1/forecast?latitude=1&longitude=2";

    #[test]
    fn test_put_then_get() -> Result<(), ApiError> {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), DEFAULT_CACHE_TTL);

        assert_eq!(cache.get(URL)?, None);
        cache.put(URL, r#"{"latitude":1.0}"#)?;
        assert_eq!(cache.get(URL)?.as_deref(), Some(r#"{"latitude":1.0}"#));
        assert_eq!(cache.get("https://example.com/other")?, None);
        Ok(())
    }

    #[test]
    fn test_put_overwrites() -> Result<(), ApiError> {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), DEFAULT_CACHE_TTL);

        cache.put(URL, "first")?;
        cache.put(URL, "second")?;
        assert_eq!(cache.get(URL)?.as_deref(), Some("second"));
        Ok(())
    }

    #[test]
    fn test_zero_ttl_never_hits() -> Result<(), ApiError> {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), Duration::ZERO);

        cache.put(URL, "body")?;
        assert_eq!(cache.get(URL)?, None);
        Ok(())
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() -> Result<(), ApiError> {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), DEFAULT_CACHE_TTL);

        fs::write(cache.entry_path(URL), b"\x01\x02").unwrap();
        assert_eq!(cache.get(URL)?, None);
        Ok(())
    }

    #[test]
    fn test_clear() -> Result<(), ApiError> {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(&dir.path().join("nested"), DEFAULT_CACHE_TTL);
        assert_eq!(cache.clear()?, 0);

        cache.put(URL, "a")?;
        cache.put("https://example.com/other", "b")?;
        assert_eq!(cache.clear()?, 2);
        assert_eq!(cache.get(URL)?, None);
        Ok(())
    }

    #[test]
    fn test_clear_removes_interrupted_writes() -> Result<(), ApiError> {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), DEFAULT_CACHE_TTL);

        cache.put(URL, "a")?;
        let leftover = dir.path().join(".tmpAbC123");
        fs::write(&leftover, b"partial").unwrap();
        let unrelated = dir.path().join("notes.txt");
        fs::write(&unrelated, b"keep").unwrap();

        assert_eq!(cache.clear()?, 1);
        assert!(!leftover.exists());
        assert!(unrelated.exists());
        Ok(())
    }
}
