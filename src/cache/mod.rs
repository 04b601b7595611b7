//! Two-tier result cache: in-memory front, JSON files behind it.
//!
//! Keyed by the blake3 hash of the submitted document plus the analysis
//! mode. The memory tier makes repeat submissions free within a process;
//! the file tier survives restarts. Every operation is best-effort: a
//! cache failure is logged and treated as a miss, never surfaced to the
//! caller.

mod error;


pub use error::CacheError;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cascade::{AnalysisMode, AnalysisReport};
use crate::hashing::hash_hex;

/// Entries kept in the memory tier.
const MEMORY_CAPACITY: u64 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    hash: [u8; 32],
    mode: AnalysisMode,
}

/// On-disk cache record. `expires_at` is checked lazily on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    mode: AnalysisMode,
    report: AnalysisReport,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Content-addressed analysis result cache.
pub struct ResultCache {
    dir: PathBuf,
    memory: moka::sync::Cache<CacheKey, Arc<CacheEntry>>,
    ttl: Duration,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("dir", &self.dir)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl ResultCache {
    /// Opens (creating if needed) the cache directory.
    pub fn new<P: Into<PathBuf>>(dir: P, ttl_secs: i64) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CacheError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            dir,
            memory: moka::sync::Cache::new(MEMORY_CAPACITY),
            ttl: Duration::seconds(ttl_secs),
        })
    }

    /// Looks up a cached report, checking the memory tier first.
    ///
    /// Expired entries are evicted from both tiers on the way out; a
    /// corrupt file is deleted and reported as a miss.
    pub fn get(&self, hash: &[u8; 32], mode: AnalysisMode) -> Option<AnalysisReport> {
        let key = CacheKey { hash: *hash, mode };
        let now = Utc::now();

        if let Some(entry) = self.memory.get(&key) {
            if entry.is_expired(now) {
                debug!(key = %hash_hex(hash), %mode, "Evicting expired cache entry");
                self.evict(&key);
                return None;
            }
            return Some(entry.report.clone());
        }

        let path = self.entry_path(&key);
        let raw = fs::read(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Removing corrupt cache file");
                let _ = fs::remove_file(&path);
                return None;
            }
        };

        if entry.is_expired(now) {
            debug!(path = %path.display(), "Removing expired cache file");
            let _ = fs::remove_file(&path);
            return None;
        }

        let entry = Arc::new(entry);
        self.memory.insert(key, Arc::clone(&entry));
        Some(entry.report.clone())
    }

    /// Stores a report in both tiers.
    pub fn put(&self, hash: &[u8; 32], mode: AnalysisMode, report: &AnalysisReport) {
        let key = CacheKey { hash: *hash, mode };
        let now = Utc::now();
        let entry = Arc::new(CacheEntry {
            created_at: now,
            expires_at: now + self.ttl,
            mode,
            report: report.clone(),
        });

        if let Err(e) = self.persist(&key, &entry) {
            warn!(key = %hash_hex(hash), %mode, error = %e, "Failed to persist cache entry");
        }
        self.memory.insert(key, entry);
    }

    /// Deletes file-tier entries created more than `max_age` ago, along
    /// with any unreadable cache files. Returns the number removed.
    pub fn sweep(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut removed = 0usize;

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "Cache sweep could not read directory");
                return 0;
            }
        };

        for dir_entry in entries.flatten() {
            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let stale = match fs::read(&path)
                .ok()
                .and_then(|raw| serde_json::from_slice::<CacheEntry>(&raw).ok())
            {
                Some(entry) => entry.created_at < cutoff,
                // Unreadable cache files are garbage either way.
                None => true,
            };

            if stale && fs::remove_file(&path).is_ok() {
                if let Some(key) = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(parse_file_name)
                {
                    self.memory.invalidate(&key);
                }
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed, "Cache sweep removed stale entries");
        }
        removed
    }

    fn evict(&self, key: &CacheKey) {
        self.memory.invalidate(key);
        let _ = fs::remove_file(self.entry_path(key));
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", hash_hex(&key.hash), key.mode))
    }

    /// Atomic write: temp file in the cache directory, then rename.
    fn persist(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), CacheError> {
        let file = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&file, entry)
            .map_err(|e| CacheError::Io(std::io::Error::other(e)))?;
        file.persist(self.entry_path(key))
            .map_err(|e| CacheError::Io(e.error))?;
        Ok(())
    }
}

/// Recovers the cache key from a `{hex}_{mode}.json` file name.
fn parse_file_name(name: &str) -> Option<CacheKey> {
    let stem = name.strip_suffix(".json")?;
    let (hex, mode) = stem.rsplit_once('_')?;
    let mode = AnalysisMode::parse(mode)?;
    let hash = parse_hex32(hex)?;
    Some(CacheKey { hash, mode })
}

fn parse_hex32(hex: &str) -> Option<[u8; 32]> {
    if hex.len() != 64 {
        return None;
    }
    let mut out = [0u8; 32];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok()?;
    }
    Some(out)
}
