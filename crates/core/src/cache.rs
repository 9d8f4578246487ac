//! File-backed TTL cache entries
//!
//! Pure functions for persisting cached upstream responses in a directory.
//! Each entry lives in a file named after its key (a hex MD5 of the request
//! URL) and records when it was stored and for how long it stays fresh. The
//! caller supplies the current time so expiry is deterministic.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for cache operations
#[derive(Debug)]
pub enum CacheError {
    IoError(String),
    InvalidKey(String),
    CorruptEntry(String),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::IoError(msg) => write!(f, "IO error: {}", msg),
            CacheError::InvalidKey(key) => write!(f, "Invalid cache key: {}", key),
            CacheError::CorruptEntry(msg) => write!(f, "Corrupt cache entry: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::IoError(err.to_string())
    }
}

/// On-disk representation of one cached value
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheEntry {
    /// Unix seconds
    pub stored_at: i64,
    pub ttl_secs: u64,
    pub value: Value,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: i64) -> bool {
        now.saturating_sub(self.stored_at) < i64::try_from(self.ttl_secs).unwrap_or(i64::MAX)
    }
}

fn entry_path(cache_dir: &Path, key: &str) -> Result<PathBuf, CacheError> {
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    Ok(cache_dir.join(format!("{key}.json")))
}

/// Store a value under `key`
pub fn store(
    cache_dir: &Path,
    key: &str,
    value: &Value,
    ttl_secs: u64,
    now: i64,
) -> Result<(), CacheError> {
    let path = entry_path(cache_dir, key)?;
    fs::create_dir_all(cache_dir)?;

    let entry = CacheEntry {
        stored_at: now,
        ttl_secs,
        value: value.clone(),
    };
    let body =
        serde_json::to_string(&entry).map_err(|e| CacheError::CorruptEntry(e.to_string()))?;
    fs::write(path, body)?;

    Ok(())
}

/// Load a fresh value for `key`
///
/// Missing and expired entries both yield `Ok(None)`; expired files are removed.
pub fn load(cache_dir: &Path, key: &str, now: i64) -> Result<Option<Value>, CacheError> {
    let path = entry_path(cache_dir, key)?;
    if !path.exists() {
        return Ok(None);
    }

    let body = fs::read_to_string(&path)?;
    let entry: CacheEntry =
        serde_json::from_str(&body).map_err(|e| CacheError::CorruptEntry(e.to_string()))?;

    if entry.is_fresh(now) {
        Ok(Some(entry.value))
    } else {
        fs::remove_file(&path)?;
        Ok(None)
    }
}

/// Remove every expired or unreadable entry, returning how many were removed
pub fn purge_expired(cache_dir: &Path, now: i64) -> Result<usize, CacheError> {
    if !cache_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(cache_dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let fresh = fs::read_to_string(&path)
            .ok()
            .and_then(|body| serde_json::from_str::<CacheEntry>(&body).ok())
            .is_some_and(|entry| entry.is_fresh(now));
        if !fresh {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    Ok(removed)
}
