//! Hash-fanout cache layout.
//!
//! The key is MD5-hashed and hex-encoded; the 32 hex chars are split into
//! two 2-char fan-out directories and a 28-char file name:
//! `{root}/6f/1e/d002ab5595859014ebf0951522d9`. This bounds directory sizes
//! no matter how the keys are shaped.

use super::TileCache;
use anyhow::{Context, Result, ensure};
use std::{
	fs,
	path::{Path, PathBuf},
};

pub struct HashCache {
	root: PathBuf,
}

impl HashCache {
	pub fn new(root: PathBuf) -> HashCache {
		HashCache { root }
	}

	fn entry_path(&self, key: &str) -> PathBuf {
		let digest = format!("{:x}", md5::compute(key.as_bytes()));
		self.root.join(&digest[0..2]).join(&digest[2..4]).join(&digest[4..32])
	}
}

impl TileCache for HashCache {
	fn lookup(&self, key: &str) -> Option<Vec<u8>> {
		read_entry(&self.entry_path(key))
	}

	fn store(&self, key: &str, value: &[u8]) -> Result<()> {
		write_entry(&self.entry_path(key), key, value)
	}
}

/// Shared read path: any failure or empty file is a miss.
pub(super) fn read_entry(path: &Path) -> Option<Vec<u8>> {
	match fs::read(path) {
		Ok(value) if !value.is_empty() => Some(value),
		Ok(_) => None,
		Err(_) => None,
	}
}

/// Shared write path: reject empty values, create parents, replace the file.
pub(super) fn write_entry(path: &Path, key: &str, value: &[u8]) -> Result<()> {
	ensure!(!value.is_empty(), "refusing to cache empty value for key '{key}'");
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).with_context(|| format!("creating cache directory '{}'", parent.display()))?;
	}
	fs::write(path, value).with_context(|| format!("writing cache file '{}'", path.display()))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn new_cache() -> (tempfile::TempDir, HashCache) {
		let dir = tempfile::tempdir().expect("tempdir");
		let cache = HashCache::new(dir.path().join("cache"));
		(dir, cache)
	}

	#[test]
	fn entry_path_fans_out_over_the_digest() {
		let (_tmp, cache) = new_cache();
		// md5("foobar") = 3858f62230ac3c915f300c664312c63f
		let path = cache.entry_path("foobar");
		let tail: Vec<_> = path.iter().rev().take(3).map(|c| c.to_str().unwrap()).collect();
		assert_eq!(tail, ["f62230ac3c915f300c664312c63f", "58", "38"]);
	}

	#[test]
	fn store_then_lookup_roundtrips() {
		let (_tmp, cache) = new_cache();
		let value = vec![137u8, 80, 78, 71, 0, 255];
		cache.store("osm/3/1/2.png", &value).unwrap();
		assert_eq!(cache.lookup("osm/3/1/2.png").unwrap(), value);
		// different key, different entry
		assert!(cache.lookup("osm/3/1/3.png").is_none());
	}

	#[test]
	fn store_overwrites_in_place() {
		let (_tmp, cache) = new_cache();
		cache.store("k", b"old").unwrap();
		cache.store("k", b"new").unwrap();
		assert_eq!(cache.lookup("k").unwrap(), b"new");
	}

	#[test]
	fn empty_values_are_rejected() {
		let (_tmp, cache) = new_cache();
		assert!(cache.store("k", b"").is_err());
	}

	#[test]
	fn empty_files_read_as_miss() {
		let (_tmp, cache) = new_cache();
		let path = cache.entry_path("k");
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(&path, b"").unwrap();
		assert!(cache.lookup("k").is_none());
	}
}
