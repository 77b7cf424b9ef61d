//! On-disk tile cache.
//!
//! Two interchangeable layouts implement the same contract:
//! `lookup(key) → Some(bytes) | None`, `store(key, bytes) → Result`.
//! Lookups treat every read error (missing file, IO error, empty file) as a
//! miss; the upstream fetch repopulates on the next request. Stores create
//! missing directories and replace whole files; concurrent stores of the
//! same key are last-writer-wins.
//!
//! The cache is a process-wide singleton: [`init`] is called exactly once
//! at startup (when caching is enabled), a second call is a programmer
//! error and panics.

mod hash_layout;
mod path_layout;

pub use hash_layout::HashCache;
pub use path_layout::PathCache;

use crate::config::{CacheConfig, CacheLayout};
use anyhow::Result;
use std::{path::PathBuf, sync::OnceLock};

pub trait TileCache: Send + Sync {
	/// The cached bytes for `key`, or `None` on miss or any read error.
	fn lookup(&self, key: &str) -> Option<Vec<u8>>;

	/// Persist `value` under `key`. Empty values are rejected.
	fn store(&self, key: &str, value: &[u8]) -> Result<()>;
}

static CACHE: OnceLock<Box<dyn TileCache>> = OnceLock::new();

/// Install the process-wide cache instance. Must be called at most once.
pub fn init(config: &CacheConfig) {
	let root = PathBuf::from(&config.path);
	let cache: Box<dyn TileCache> = match config.layout {
		CacheLayout::Path => Box::new(PathCache::new(root)),
		CacheLayout::Hash => Box::new(HashCache::new(root)),
	};
	assert!(CACHE.set(cache).is_ok(), "tile cache initialized twice");
	log::info!("tile cache ready at '{}' ({:?} layout)", config.path, config.layout);
}

/// The installed cache, or `None` when caching is disabled (never
/// initialized).
pub fn get() -> Option<&'static dyn TileCache> {
	CACHE.get().map(|cache| cache.as_ref())
}
