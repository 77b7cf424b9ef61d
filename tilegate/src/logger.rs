//! Logger initialization from the `log` config section.

use crate::config::LogConfig;
use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs::OpenOptions;

fn parse_level(level: &str) -> LevelFilter {
	match level.to_ascii_lowercase().as_str() {
		"off" => LevelFilter::Off,
		"error" => LevelFilter::Error,
		"warn" => LevelFilter::Warn,
		"info" => LevelFilter::Info,
		"debug" => LevelFilter::Debug,
		"trace" => LevelFilter::Trace,
		other => {
			eprintln!("invalid log level '{other}', using 'debug'");
			LevelFilter::Debug
		}
	}
}

/// Initialize the global logger. Call once, before anything logs.
pub fn init(config: &LogConfig) -> Result<()> {
	let mut builder = env_logger::Builder::new();
	builder.filter_level(parse_level(&config.level));

	if config.enable_file && !config.file_path.is_empty() {
		let file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&config.file_path)
			.with_context(|| format!("opening log file '{}'", config.file_path))?;
		builder.target(env_logger::Target::Pipe(Box::new(file)));
	}

	builder.init();
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn level_parsing_is_lenient() {
		assert_eq!(parse_level("INFO"), LevelFilter::Info);
		assert_eq!(parse_level("warn"), LevelFilter::Warn);
		assert_eq!(parse_level("nonsense"), LevelFilter::Debug);
	}
}
