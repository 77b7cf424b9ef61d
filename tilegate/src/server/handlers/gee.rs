//! Google Earth Enterprise relay endpoints.
//!
//! `/gee/{*path}` (and, for desktop clients that expect the upstream URL
//! layout, the router fallback) forward requests to the GEE server with the
//! managed session cookie. Paths containing `geauth` are answered locally
//! by replaying the handshake, so desktop clients can complete their own
//! authentication against the gateway.

use crate::server::{AppState, response::api_error_status};
use axum::{
	body::{Body, Bytes},
	http::{Method, StatusCode, Uri, header},
	response::Response,
};
use std::sync::Arc;

/// `ANY /gee/{*path}`: strip the `/gee` prefix and relay.
pub async fn gee_relay(
	state: axum::extract::State<Arc<AppState>>,
	method: Method,
	uri: Uri,
	body: Bytes,
) -> Response<Body> {
	let path = uri.path().strip_prefix("/gee").unwrap_or(uri.path()).to_string();
	if path.is_empty() || path == "/" {
		return api_error_status(StatusCode::BAD_REQUEST, "Path parameter is required".to_string());
	}
	relay(&state, method, &path, uri.query(), body).await
}

/// Router fallback. Google Earth Pro requests paths like `/dbRoot.v5` or
/// `/flatfile?...` directly at the root.
pub async fn gee_fallback(
	state: axum::extract::State<Arc<AppState>>,
	method: Method,
	uri: Uri,
	body: Bytes,
) -> Response<Body> {
	relay(&state, method, uri.path(), uri.query(), body).await
}

async fn relay(state: &AppState, method: Method, path: &str, query: Option<&str>, body: Bytes) -> Response<Body> {
	let full_path = match query {
		Some(query) => format!("{path}?{query}"),
		None => path.to_string(),
	};
	log::info!("GEE proxy request: {method} {full_path}");

	// Desktop clients run their own handshake; answer it locally with a
	// fresh auth response instead of relaying the binary blob.
	if full_path.contains("geauth") {
		return match state.gee.auth_response_bytes().await {
			Ok(bytes) => Response::builder()
				.status(200)
				.header(header::CONTENT_TYPE, "application/octet-stream")
				.body(Body::from(bytes))
				.expect("auth response is valid"),
			Err(err) => {
				log::error!("GEE auth passthrough failed: {err:#}");
				api_error_status(
					StatusCode::INTERNAL_SERVER_ERROR,
					format!("Failed to get GEE auth response: {err:#}"),
				)
			}
		};
	}

	match state.gee.relay(method, &full_path, body).await {
		Ok(upstream) => {
			let skipped = [header::CONTENT_LENGTH, header::TRANSFER_ENCODING, header::CONNECTION];
			let mut builder = Response::builder().status(upstream.status());
			for (name, value) in upstream.headers() {
				// the relayed body is re-framed by this server
				if skipped.contains(name) {
					continue;
				}
				builder = builder.header(name, value);
			}
			if !upstream.headers().contains_key(header::CONTENT_TYPE) {
				builder = builder.header(header::CONTENT_TYPE, "application/octet-stream");
			}
			builder
				.body(Body::from_stream(upstream.bytes_stream()))
				.expect("relay response is valid")
		}
		Err(err) => {
			log::error!("GEE relay failed: {err:#}");
			api_error_status(StatusCode::BAD_GATEWAY, format!("GEE relay failed: {err:#}"))
		}
	}
}
