//! HTTP server lifecycle and composition.
//!
//! `routes` composes the handlers into the router; this module owns the
//! cross-cutting concerns (CORS, the elapsed-time header), shared state
//! construction, listening and graceful shutdown.

pub mod handlers;
pub mod response;
mod routes;

pub use routes::build_router;

use crate::config::Config;
use anyhow::{Context, Result};
use axum::{
	extract::Request,
	http::{HeaderValue, Method, header},
	middleware::{self, Next},
	response::Response,
};
use reqwest::Client;
use std::{sync::Arc, time::Instant};
use tilegate_provider::{
	GeeSession, ProviderRegistry, catalog,
	client::{ClientOptions, build_client, default_client},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Everything the handlers share. Built once at startup, read-only after.
pub struct AppState {
	pub registry: ProviderRegistry,
	pub gee: Arc<GeeSession>,
	pub cache_enabled: bool,
	pub cache_max_age: u64,
	/// Redirect-observing client used by the pass-through proxy.
	pub proxy_client: Client,
}

/// Build the shared state: the validated provider registry, the GEE
/// session (initial handshake included) and the proxy client.
pub async fn build_state(config: &Config) -> Result<Arc<AppState>> {
	let registry = ProviderRegistry::build(catalog::catalog(), default_client())?;
	log::info!("{} tile sources registered", registry.len());

	let gee = GeeSession::connect(default_client(), None).await?;

	let proxy_client = build_client(&ClientOptions {
		proxy: config.proxy.clone(),
		follow_redirects: false,
		..ClientOptions::default()
	})?;

	Ok(Arc::new(AppState {
		registry,
		gee,
		cache_enabled: config.cache.enable,
		cache_max_age: config.cache.max_age,
		proxy_client,
	}))
}

/// Serve until ctrl-c, then drain in-flight requests.
pub async fn run(config: &Config, state: Arc<AppState>) -> Result<()> {
	let router = build_router(state)
		.layer(middleware::from_fn(stamp_elapsed_time))
		.layer(cors_layer());

	let addr = format!("{}:{}", config.server.host, config.server.port);
	let listener = TcpListener::bind(&addr)
		.await
		.with_context(|| format!("binding server address {addr}"))?;
	log::info!("server listening on http://{addr}");

	axum::serve(listener, router.into_make_service())
		.with_graceful_shutdown(shutdown_signal())
		.await
		.context("serving http")?;

	log::info!("server stopped");
	Ok(())
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		log::error!("listening for shutdown signal failed: {err}");
		return;
	}
	log::info!("shutdown signal received, draining in-flight requests");
}

/// The protocol is consumed by arbitrary web maps, so CORS is wide open.
fn cors_layer() -> CorsLayer {
	CorsLayer::new()
		.allow_origin(Any)
		.allow_methods([
			Method::GET,
			Method::POST,
			Method::PUT,
			Method::DELETE,
			Method::OPTIONS,
		])
		.allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Stamp `X-Elapsed-Time: <n>ms` on every response.
async fn stamp_elapsed_time(request: Request, next: Next) -> Response {
	let started = Instant::now();
	let mut response = next.run(request).await;
	let elapsed = format!("{}ms", started.elapsed().as_millis());
	if let Ok(value) = HeaderValue::from_str(&elapsed) {
		response.headers_mut().insert("X-Elapsed-Time", value);
	}
	response
}

/// Shared state for router tests: same registry and config defaults, but a
/// GEE session that never touches the network.
#[cfg(test)]
pub(crate) async fn test_state() -> Result<Arc<AppState>> {
	let config = Config::default();
	let registry = ProviderRegistry::build(catalog::catalog(), default_client())?;
	let gee = GeeSession::offline(default_client(), None)?;
	let proxy_client = build_client(&ClientOptions {
		follow_redirects: false,
		..ClientOptions::default()
	})?;
	Ok(Arc::new(AppState {
		registry,
		gee,
		cache_enabled: config.cache.enable,
		cache_max_age: config.cache.max_age,
		proxy_client,
	}))
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{Router, body::Body, routing::get};
	use tower::ServiceExt as _;

	#[tokio::test]
	async fn elapsed_time_header_is_stamped() {
		let app = Router::new()
			.route("/", get(|| async { "ok" }))
			.layer(middleware::from_fn(stamp_elapsed_time));

		let request = axum::http::Request::builder().uri("/").body(Body::empty()).unwrap();
		let response = app.oneshot(request).await.unwrap();

		let header = response.headers().get("X-Elapsed-Time").unwrap().to_str().unwrap();
		assert!(header.ends_with("ms"), "unexpected header value '{header}'");
	}
}
