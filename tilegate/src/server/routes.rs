//! Router composition. Deliberately tiny and declarative; handlers live in
//! `handlers`, lifecycle in the parent module.
//!
//! Every route is registered with and without a trailing slash (the public
//! protocol historically used trailing slashes, and axum treats the two as
//! distinct paths). The fallback forwards to the GEE relay so desktop
//! clients that expect the upstream URL layout keep working.

use super::{AppState, handlers};
use axum::{
	Router,
	routing::{any, get},
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
	Router::new()
		.route("/", get(handlers::common::index))
		.route("/health", get(handlers::common::health))
		.route("/health/", get(handlers::common::health))
		.route("/systemInfo", get(handlers::common::system_info))
		.route("/systemInfo/", get(handlers::common::system_info))
		.route("/map/list", get(handlers::tilemap::map_list))
		.route("/map/list/", get(handlers::tilemap::map_list))
		.route("/map/{id}/{z}/{x}/{y}", get(handlers::tilemap::map_tile))
		.route("/map/{id}/{z}/{x}/{y}/", get(handlers::tilemap::map_tile))
		.route("/proxy", any(handlers::proxy::url_proxy))
		.route("/proxy/", any(handlers::proxy::url_proxy))
		.route("/gee", any(handlers::gee::gee_relay))
		.route("/gee/{*path}", any(handlers::gee::gee_relay))
		.fallback(handlers::gee::gee_fallback)
		.with_state(state)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::server::test_state;
	use axum::{
		body::Body,
		http::{Request, StatusCode},
	};
	use serde_json::Value;
	use tower::ServiceExt as _; // for `oneshot`

	async fn get_response(path: &str) -> (StatusCode, Value) {
		let state = test_state().await.unwrap();
		let app = build_router(state);
		let request = Request::builder().uri(path).body(Body::empty()).unwrap();
		let response = app.oneshot(request).await.unwrap();
		let status = response.status();
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
		(status, json)
	}

	#[tokio::test]
	async fn map_list_serves_the_catalog_in_order() {
		let (status, json) = get_response("/map/list/").await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(json["code"], 200);

		let data = json["data"].as_array().unwrap();
		assert!(data.len() >= 15);
		assert_eq!(data[0]["id"], "google_satellite");
		let last = &data[data.len() - 1];
		assert_eq!(last["id"], "google_earth");

		// both route variants answer
		let (status, _) = get_response("/map/list").await;
		assert_eq!(status, StatusCode::OK);
	}

	#[tokio::test]
	async fn bad_tile_parameters_yield_the_400_envelope_quirk() {
		// HTTP status stays 200, the envelope carries the error
		let (status, json) = get_response("/map/osm_standard/abc/0/0/").await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(json["code"], 400);
		assert_eq!(json["data"], Value::Null);
	}

	#[tokio::test]
	async fn unknown_source_yields_the_400_envelope() {
		let (status, json) = get_response("/map/no_such_source/1/0/0/").await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(json["code"], 400);
		assert!(json["message"].as_str().unwrap().contains("no_such_source"));
	}

	#[tokio::test]
	async fn proxy_without_url_yields_the_400_envelope() {
		let (status, json) = get_response("/proxy/").await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(json["code"], 400);
		assert_eq!(json["message"], "url is required");
	}

	#[tokio::test]
	async fn health_answers_plain_text() {
		let state = test_state().await.unwrap();
		let app = build_router(state);
		let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
		let response = app.oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
	}
}
