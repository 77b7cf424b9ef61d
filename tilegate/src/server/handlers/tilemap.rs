//! The tile pipeline endpoints: `/map/list/` and `/map/{id}/{z}/{x}/{y}/`.

use crate::{
	cache,
	server::{
		AppState,
		response::{api_error, api_ok},
	},
};
use anyhow::{Context, Result};
use axum::{
	body::Body,
	extract::{Path, Query, State},
	http::header,
	response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tilegate_core::TileCoord;

/// Embedded "tile failed" placeholder, served when an upstream answers 200
/// with an empty body so that clients render a visible gap instead of a
/// broken image.
const FALLBACK_TILE_PNG: &[u8] = include_bytes!("../../assets/tile_failed.png");

/// `GET /map/list/`: the catalog, in declaration order.
pub async fn map_list(State(state): State<Arc<AppState>>) -> Response<Body> {
	api_ok("Get tile map source list success", state.registry.metadata_list())
}

#[derive(Debug, Deserialize)]
pub struct TileQuery {
	/// `cache=false` bypasses lookup and store for this request.
	cache: Option<String>,
}

fn parse_coord(z: &str, x: &str, y: &str) -> Result<TileCoord> {
	let z: u8 = z.parse().with_context(|| format!("zoom '{z}'"))?;
	let x: u32 = x.parse().with_context(|| format!("x '{x}'"))?;
	let y: u32 = y.parse().with_context(|| format!("y '{y}'"))?;
	TileCoord::new(z, x, y)
}

/// `GET /map/{id}/{z}/{x}/{y}/?cache=<bool>`: fetch one tile.
pub async fn map_tile(
	Path((id, z, x, y)): Path<(String, String, String, String)>,
	Query(query): Query<TileQuery>,
	State(state): State<Arc<AppState>>,
) -> Response<Body> {
	let coord = match parse_coord(&z, &x, &y) {
		Ok(coord) => coord,
		Err(err) => return api_error(400, format!("Invalid tile map parameters: {err:#}")),
	};

	let Some(provider) = state.registry.get(&id) else {
		return api_error(400, format!("Tile map source {id} not found"));
	};
	let metadata = provider.metadata();

	let use_cache = state.cache_enabled && query.cache.as_deref() != Some("false");
	let cache_key = format!(
		"{id}/{}/{}/{}.{}",
		coord.z,
		coord.x,
		coord.y,
		metadata.content_type.extension()
	);

	if use_cache {
		if let Some(cached) = cache::get().and_then(|cache| cache.lookup(&cache_key)) {
			log::debug!("tile cache hit: {cache_key}");
			return image_response(metadata.content_type.as_mime(), cached, Some(("HIT", state.cache_max_age)));
		}
		log::debug!("tile cache miss: {cache_key}");
	}

	let fetched = match provider.fetch(coord).await {
		Ok(fetched) => fetched,
		Err(err) => {
			log::error!("fetching tile {cache_key}: {err:#}");
			return api_error(500, format!("Get {id} tile map picture error: {err:#}"));
		}
	};

	// An upstream that answers with a non-image content type (error pages,
	// JSON denials) still gets served as the declared tile type.
	let content_type = fetched
		.content_type
		.filter(|value| value.contains("image"))
		.unwrap_or_else(|| metadata.content_type.as_mime().to_string());

	if fetched.body.is_empty() {
		log::warn!("upstream returned an empty body for {cache_key}, serving fallback tile");
		return image_response_with_miss("image/png", FALLBACK_TILE_PNG.to_vec(), use_cache);
	}

	if use_cache {
		if let Some(cache) = cache::get() {
			let key = cache_key.clone();
			let body = fetched.body.clone();
			// never block the client response on persistence
			tokio::task::spawn_blocking(move || match cache.store(&key, &body) {
				Ok(()) => log::debug!("tile cache store: {key}"),
				Err(err) => log::error!("tile cache store failed for {key}: {err:#}"),
			});
		}
	}

	let mut response = image_response(&content_type, fetched.body.to_vec(), None);
	if use_cache {
		stamp_cache_header(&mut response, "MISS");
	}
	response
}

fn image_response(content_type: &str, body: Vec<u8>, hit: Option<(&str, u64)>) -> Response<Body> {
	let mut builder = Response::builder()
		.status(200)
		.header(header::CONTENT_TYPE, content_type)
		.header(header::CONTENT_LENGTH, body.len());
	if let Some((x_cache, max_age)) = hit {
		builder = builder
			.header(header::CACHE_CONTROL, format!("max-age={max_age}"))
			.header("X-cache", x_cache);
	}
	builder.body(Body::from(body)).expect("image response is valid")
}

fn image_response_with_miss(content_type: &str, body: Vec<u8>, use_cache: bool) -> Response<Body> {
	let mut response = image_response(content_type, body, None);
	if use_cache {
		stamp_cache_header(&mut response, "MISS");
	}
	response
}

fn stamp_cache_header(response: &mut Response<Body>, value: &'static str) {
	response
		.headers_mut()
		.insert("X-cache", header::HeaderValue::from_static(value));
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_coord_accepts_valid_tiles() {
		let coord = parse_coord("5", "10", "12").unwrap();
		assert_eq!((coord.z, coord.x, coord.y), (5, 10, 12));
	}

	#[test]
	fn parse_coord_rejects_garbage_and_out_of_range() {
		assert!(parse_coord("x", "0", "0").is_err());
		assert!(parse_coord("5", "-1", "0").is_err());
		assert!(parse_coord("5", "32", "0").is_err()); // 32 >= 2^5
		assert!(parse_coord("23", "0", "0").is_err());
	}

	#[test]
	fn fallback_tile_is_a_png() {
		assert_eq!(&FALLBACK_TILE_PNG[0..8], b"\x89PNG\r\n\x1a\n".as_slice());
	}

	#[test]
	fn hit_response_carries_cache_headers() {
		let response = image_response("image/png", vec![1, 2, 3], Some(("HIT", 3600)));
		assert_eq!(response.status(), 200);
		assert_eq!(response.headers().get("X-cache").unwrap(), "HIT");
		assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "max-age=3600");
		assert_eq!(response.headers().get(header::CONTENT_LENGTH).unwrap(), "3");
	}
}
