//! Gateway configuration.
//!
//! Loaded once at startup from a YAML file; every section is optional and
//! falls back to its default. A missing file is replaced with a commented
//! default config so that a fresh deployment documents itself. After
//! parsing, a fixed set of `TILEGATE_*` environment variables override
//! individual keys.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8076
//! cache:
//!   enable: true
//!   layout: path        # "path" or "hash"
//!   path: ./cache
//!   max_age: 3600
//! log:
//!   level: debug
//!   enable_file: false
//!   file_path: ""
//! proxy: ""             # "", "direct" or a proxy url
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs, path::Path};

const DEFAULT_CONFIG_YAML: &str = r#"# tilegate configuration

server:
  host: 0.0.0.0
  port: 8076

cache:
  enable: true
  # "path" stores tiles at <path>/<id>/<z>/<x>/<y>.<ext>,
  # "hash" fans out over md5(key)
  layout: path
  path: ./cache
  # Cache-Control max-age for tile responses, in seconds
  max_age: 3600

log:
  level: debug
  enable_file: false
  file_path: ""

# "" uses the system proxy, "direct" disables proxying,
# anything else is used as a proxy url
proxy: ""
"#;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	#[serde(default)]
	pub server: ServerConfig,
	#[serde(default)]
	pub cache: CacheConfig,
	#[serde(default)]
	pub log: LogConfig,
	#[serde(default)]
	pub proxy: String,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			server: ServerConfig::default(),
			cache: CacheConfig::default(),
			log: LogConfig::default(),
			proxy: String::new(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
}

impl Default for ServerConfig {
	fn default() -> Self {
		ServerConfig {
			host: default_host(),
			port: default_port(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheLayout {
	Path,
	Hash,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
	#[serde(default = "default_true")]
	pub enable: bool,
	#[serde(default = "default_cache_layout")]
	pub layout: CacheLayout,
	#[serde(default = "default_cache_path")]
	pub path: String,
	#[serde(default = "default_cache_max_age")]
	pub max_age: u64,
}

impl Default for CacheConfig {
	fn default() -> Self {
		CacheConfig {
			enable: true,
			layout: default_cache_layout(),
			path: default_cache_path(),
			max_age: default_cache_max_age(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
	#[serde(default = "default_log_level")]
	pub level: String,
	#[serde(default)]
	pub enable_file: bool,
	#[serde(default)]
	pub file_path: String,
}

impl Default for LogConfig {
	fn default() -> Self {
		LogConfig {
			level: default_log_level(),
			enable_file: false,
			file_path: String::new(),
		}
	}
}

fn default_host() -> String {
	"0.0.0.0".to_string()
}
fn default_port() -> u16 {
	8076
}
fn default_true() -> bool {
	true
}
fn default_cache_layout() -> CacheLayout {
	CacheLayout::Path
}
fn default_cache_path() -> String {
	"./cache".to_string()
}
fn default_cache_max_age() -> u64 {
	3600
}
fn default_log_level() -> String {
	"debug".to_string()
}

impl Config {
	/// Parse a YAML config from a string.
	pub fn from_string(text: &str) -> Result<Config> {
		serde_yaml_ng::from_str(text).context("parsing config (YAML)")
	}

	/// Load the config from `path`, creating a commented default file when
	/// none exists, then apply environment overrides.
	pub fn load(path: &Path) -> Result<Config> {
		let mut config = if path.exists() {
			let text = fs::read_to_string(path).with_context(|| format!("reading config file '{}'", path.display()))?;
			Config::from_string(&text).with_context(|| format!("in config file '{}'", path.display()))?
		} else {
			// the logger is initialized after the config is loaded
			if let Err(err) = fs::write(path, DEFAULT_CONFIG_YAML) {
				eprintln!("could not write default config to '{}': {err}", path.display());
			} else {
				eprintln!("config file '{}' not found, wrote defaults", path.display());
			}
			Config::default()
		};

		config.apply_env_overrides();
		Ok(config)
	}

	/// Override single keys from `TILEGATE_*` environment variables.
	fn apply_env_overrides(&mut self) {
		if let Ok(host) = env::var("TILEGATE_SERVER_HOST") {
			self.server.host = host;
		}
		if let Ok(port) = env::var("TILEGATE_SERVER_PORT") {
			match port.parse() {
				Ok(port) => self.server.port = port,
				Err(err) => log::warn!("ignoring invalid TILEGATE_SERVER_PORT '{port}': {err}"),
			}
		}
		if let Ok(enable) = env::var("TILEGATE_CACHE_ENABLE") {
			self.cache.enable = enable != "false" && enable != "0";
		}
		if let Ok(path) = env::var("TILEGATE_CACHE_PATH") {
			self.cache.path = path;
		}
		if let Ok(level) = env::var("TILEGATE_LOG_LEVEL") {
			self.log.level = level;
		}
		if let Ok(proxy) = env::var("TILEGATE_PROXY") {
			self.proxy = proxy;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn empty_config_is_all_defaults() {
		assert_eq!(Config::from_string("").unwrap(), Config::default());
	}

	#[test]
	fn defaults_match_the_documented_values() {
		let config = Config::default();
		assert_eq!(config.server.host, "0.0.0.0");
		assert_eq!(config.server.port, 8076);
		assert!(config.cache.enable);
		assert_eq!(config.cache.layout, CacheLayout::Path);
		assert_eq!(config.cache.path, "./cache");
		assert_eq!(config.cache.max_age, 3600);
		assert_eq!(config.log.level, "debug");
		assert!(!config.log.enable_file);
		assert_eq!(config.proxy, "");
	}

	#[test]
	fn the_embedded_default_file_parses_to_defaults() {
		let config = Config::from_string(DEFAULT_CONFIG_YAML).unwrap();
		assert_eq!(config, Config::default());
	}

	#[test]
	fn partial_config_keeps_unset_defaults() {
		let config = Config::from_string("server:\n  port: 9000\ncache:\n  layout: hash\n").unwrap();
		assert_eq!(config.server.port, 9000);
		assert_eq!(config.server.host, "0.0.0.0");
		assert_eq!(config.cache.layout, CacheLayout::Hash);
		assert_eq!(config.cache.path, "./cache");
	}

	#[test]
	fn unknown_fields_are_rejected() {
		assert!(Config::from_string("server:\n  pi: 3.14\n").is_err());
	}

	#[test]
	fn load_writes_a_default_file_when_missing() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.yaml");
		let config = Config::load(&path).unwrap();
		assert_eq!(config, Config::default());
		assert!(path.exists());

		// and the written file parses back to the same config
		let reloaded = Config::load(&path).unwrap();
		assert_eq!(reloaded, config);
	}
}
