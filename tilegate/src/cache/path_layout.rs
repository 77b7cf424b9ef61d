//! Path-structured cache layout.
//!
//! Tile keys already look like paths (`{id}/{z}/{x}/{y}.{ext}`), so this
//! layout mirrors them on disk: the key is split on `/` and the first four
//! segments become `{root}/{id}/{z}/{x}/{y}.{ext}`. Keys with fewer than
//! four segments are rejected, they would collide with fan-out
//! directories.

use super::{TileCache, hash_layout};
use anyhow::{Result, ensure};
use std::path::PathBuf;

pub struct PathCache {
	root: PathBuf,
}

impl PathCache {
	pub fn new(root: PathBuf) -> PathCache {
		PathCache { root }
	}

	fn entry_path(&self, key: &str) -> Result<PathBuf> {
		let segments: Vec<&str> = key.split('/').collect();
		ensure!(
			segments.len() >= 4 && segments.iter().take(4).all(|s| !s.is_empty()),
			"cache key '{key}' must have at least 4 path segments"
		);
		Ok(self
			.root
			.join(segments[0])
			.join(segments[1])
			.join(segments[2])
			.join(segments[3]))
	}
}

impl TileCache for PathCache {
	fn lookup(&self, key: &str) -> Option<Vec<u8>> {
		hash_layout::read_entry(&self.entry_path(key).ok()?)
	}

	fn store(&self, key: &str, value: &[u8]) -> Result<()> {
		hash_layout::write_entry(&self.entry_path(key)?, key, value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn new_cache() -> (tempfile::TempDir, PathCache) {
		let dir = tempfile::tempdir().expect("tempdir");
		let cache = PathCache::new(dir.path().join("cache"));
		(dir, cache)
	}

	#[test]
	fn key_maps_to_mirrored_path() {
		let (_tmp, cache) = new_cache();
		let path = cache.entry_path("google_pure_satellite/5/10/12.png").unwrap();
		assert!(path.ends_with("google_pure_satellite/5/10/12.png"));
	}

	#[test]
	fn short_keys_are_rejected() {
		let (_tmp, cache) = new_cache();
		assert!(cache.entry_path("a/b/c").is_err());
		assert!(cache.entry_path("only_one").is_err());
		assert!(cache.entry_path("a//c/d").is_err());
		assert!(cache.store("a/b/c", b"data").is_err());
		assert!(cache.lookup("a/b/c").is_none());
	}

	#[test]
	fn store_then_lookup_roundtrips_bit_exact() {
		let (_tmp, cache) = new_cache();
		let value: Vec<u8> = (0..=255).collect();
		cache.store("osm_standard/3/1/2.png", &value).unwrap();
		assert_eq!(cache.lookup("osm_standard/3/1/2.png").unwrap(), value);
		assert!(cache.lookup("osm_standard/3/1/9.png").is_none());

		// the file lives exactly where an operator would expect it
		let on_disk = cache.root.join("osm_standard/3/1/2.png");
		assert_eq!(std::fs::read(on_disk).unwrap(), value);
	}

	#[test]
	fn empty_values_are_rejected() {
		let (_tmp, cache) = new_cache();
		assert!(cache.store("a/b/c/d", b"").is_err());
	}
}
