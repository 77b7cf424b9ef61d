//! Generic pass-through proxy: `ANY /proxy/?url=<u>`.
//!
//! Uses its own redirect-observing client so that 3xx answers surface to
//! the caller (re-stamped as 200, the contract browsers of the demo page
//! rely on) instead of being followed server-side.

use crate::server::{AppState, response::api_error};
use axum::{
	body::{Body, Bytes},
	http::{HeaderMap, Method, header},
	response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
	url: Option<String>,
}

/// Redirect statuses that are rewritten to 200 for the caller.
const PASSTHROUGH_REDIRECTS: [u16; 5] = [301, 302, 303, 307, 308];

pub async fn url_proxy(
	state: axum::extract::State<Arc<AppState>>,
	method: Method,
	query: axum::extract::Query<ProxyQuery>,
	headers: HeaderMap,
	body: Bytes,
) -> Response<Body> {
	let Some(url) = query.0.url.filter(|url| !url.is_empty()) else {
		return api_error(400, "url is required".to_string());
	};
	let url = match reqwest::Url::parse(&url) {
		Ok(url) => url,
		Err(err) => return api_error(400, format!("failed to parse URL: {err}")),
	};

	let mut request = state.proxy_client.request(method, url);
	let skipped_request = [header::HOST, header::CONTENT_LENGTH];
	for (name, value) in &headers {
		if skipped_request.contains(name) {
			continue;
		}
		request = request.header(name, value);
	}
	if !body.is_empty() {
		request = request.body(body);
	}

	let upstream = match request.send().await {
		Ok(upstream) => upstream,
		Err(err) => return api_error(400, format!("failed to send proxy HTTP request: {err}")),
	};

	let status = if PASSTHROUGH_REDIRECTS.contains(&upstream.status().as_u16()) {
		200
	} else {
		upstream.status().as_u16()
	};

	let skipped_response = [header::CONTENT_LENGTH, header::TRANSFER_ENCODING, header::CONNECTION];
	let mut builder = Response::builder().status(status);
	for (name, value) in upstream.headers() {
		if skipped_response.contains(name) {
			continue;
		}
		builder = builder.header(name, value);
	}
	if !upstream.headers().contains_key(header::CONTENT_TYPE) {
		builder = builder.header(header::CONTENT_TYPE, "application/octet-stream");
	}

	builder
		.body(Body::from_stream(upstream.bytes_stream()))
		.expect("proxy response is valid")
}
