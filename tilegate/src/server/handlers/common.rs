//! The small utility endpoints: demo page, liveness probe, system info.

use crate::server::response::api_ok;
use axum::{
	body::Body,
	http::header,
	response::Response,
};
use serde::Serialize;
use std::env;

const DEMO_PAGE: &str = include_str!("../../assets/index.html");

/// `GET /`: embedded map viewer for eyeballing every source.
pub async fn index() -> Response<Body> {
	Response::builder()
		.status(200)
		.header(header::CONTENT_TYPE, "text/html; charset=utf-8")
		// always fresh while people iterate on sources
		.header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
		.body(Body::from(DEMO_PAGE))
		.expect("demo page response is valid")
}

/// `GET /health`
pub async fn health() -> &'static str {
	"tilegate server is healthy!"
}

#[derive(Debug, Serialize)]
struct CpuInfo {
	logical: usize,
	physical: usize,
}

#[derive(Debug, Serialize)]
struct SystemInfo {
	version: String,
	os: String,
	architecture: String,
	executable_path: String,
	working_dir: String,
	cpu: CpuInfo,
}

/// `GET /systemInfo`: coarse host introspection for the demo page.
pub async fn system_info() -> Response<Body> {
	let info = SystemInfo {
		version: env!("CARGO_PKG_VERSION").to_string(),
		os: env::consts::OS.to_string(),
		architecture: env::consts::ARCH.to_string(),
		executable_path: env::current_exe()
			.map(|p| p.display().to_string())
			.unwrap_or_default(),
		working_dir: env::current_dir().map(|p| p.display().to_string()).unwrap_or_default(),
		cpu: CpuInfo {
			logical: num_cpus::get(),
			physical: num_cpus::get_physical(),
		},
	};
	api_ok("Get system info success", info)
}
