use crate::prelude::{eprintln, println, *};
use bvs_core::cache;
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Parser)]
#[command(name = "cache")]
#[command(about = "Facet cache maintenance")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Print the cache directory
    #[clap(name = "path")]
    Path,

    /// Remove expired and unreadable entries
    #[clap(name = "purge")]
    Purge,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let dir = cache_dir()?;

    match app.command {
        Commands::Path => println!("{}", dir.display()),
        Commands::Purge => {
            if global.verbose {
                eprintln!("Purging expired entries in {}", dir.display());
            }
            let removed = cache::purge_expired(&dir, now())
                .map_err(|e| Error::Cache(e.to_string()))?;
            println!("Removed {removed} cache entries");
        }
    }

    Ok(())
}

/// Directory holding cached facet lookups
pub fn cache_dir() -> Result<PathBuf> {
    let dir = dirs_next::cache_dir()
        .ok_or_else(|| eyre!("Unable to determine cache directory"))?
        .join("bvs");

    Ok(dir)
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Return the cached value for `key`, or run `producer` and cache its success
///
/// Cache failures are logged and never fail the lookup; producer errors are
/// returned as-is and not cached.
pub async fn remember<F, Fut>(
    dir: &Path,
    key: &str,
    ttl_secs: u64,
    producer: F,
) -> std::result::Result<Value, BvsError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<Value, BvsError>>,
{
    match cache::load(dir, key, now()) {
        Ok(Some(value)) => {
            log::trace!("cache hit {key}");
            return Ok(value);
        }
        Ok(None) => log::trace!("cache miss {key}"),
        Err(e) => log::warn!("Ignoring cache entry {key}: {e}"),
    }

    let value = producer().await?;

    if let Err(e) = cache::store(dir, key, &value, ttl_secs, now()) {
        log::warn!("Failed to cache {key}: {e}");
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use tempfile::TempDir;

    const KEY: &str = "d41d8cd98f00b204e9800998ecf8427e";

    #[tokio::test]
    async fn test_remember_runs_producer_once() {
        let temp_dir = TempDir::new().unwrap();
        let calls = Cell::new(0);

        for _ in 0..2 {
            let value = remember(temp_dir.path(), KEY, 3600, || async {
                calls.set(calls.get() + 1);
                Ok(json!({"country": [["Brasil", 3]]}))
            })
            .await
            .unwrap();
            assert_eq!(value, json!({"country": [["Brasil", 3]]}));
        }

        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_remember_does_not_cache_errors() {
        let temp_dir = TempDir::new().unwrap();

        let err = remember(temp_dir.path(), KEY, 3600, || async {
            Err(BvsError::connection("timed out"))
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "connection");

        let value = remember(temp_dir.path(), KEY, 3600, || async { Ok(json!(1)) })
            .await
            .unwrap();
        assert_eq!(value, json!(1));
    }

    #[tokio::test]
    async fn test_remember_survives_corrupt_entry() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(format!("{KEY}.json")), "{").unwrap();

        let value = remember(temp_dir.path(), KEY, 3600, || async { Ok(json!("fresh")) })
            .await
            .unwrap();
        assert_eq!(value, json!("fresh"));
    }

    #[tokio::test]
    async fn test_remember_zero_ttl_always_produces() {
        let temp_dir = TempDir::new().unwrap();
        let calls = Cell::new(0);

        for _ in 0..2 {
            remember(temp_dir.path(), KEY, 0, || async {
                calls.set(calls.get() + 1);
                Ok(json!(null))
            })
            .await
            .unwrap();
        }

        assert_eq!(calls.get(), 2);
    }
}
