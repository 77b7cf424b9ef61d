//! tilegate, a tile map reverse proxy and coordinate-reprojection gateway.
//!
//! Third-party viewers speak one canonical slippy-map protocol
//! (`GET /map/{id}/{z}/{x}/{y}/`); the gateway fans out to heterogeneous
//! upstreams with their own URL dialects, shard rotations, y-axis
//! conventions and coordinate datums, reprojecting GCJ02/BD09 imagery into
//! WGS84 on the fly and relaying the Google Earth Enterprise session
//! protocol.

mod cache;
mod config;
mod logger;
mod server;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tilegate_provider::client::{ClientOptions, init_default_client};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// Path to the YAML config file (created with defaults if missing)
	#[arg(short = 'c', long = "config", default_value = "config.yaml")]
	config: PathBuf,
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	// Config first (it decides the log level), then the logger; everything
	// after this point may log.
	let config = config::Config::load(&cli.config)?;
	logger::init(&config.log)?;
	log::info!("tilegate v{} starting", env!("CARGO_PKG_VERSION"));
	log::debug!("config: {config:?}");

	serve(config)
}

#[tokio::main]
async fn serve(config: config::Config) -> Result<()> {
	if config.cache.enable {
		cache::init(&config.cache);
	} else {
		log::info!("tile cache disabled");
	}

	init_default_client(&ClientOptions {
		proxy: config.proxy.clone(),
		..ClientOptions::default()
	})?;

	let state = server::build_state(&config).await?;
	let gee = state.gee.clone();

	server::run(&config, state).await?;

	gee.shutdown().await;
	Ok(())
}
