//! Per-pixel reprojection of GCJ02/BD09-indexed upstream tiles into WGS84.
//!
//! An upstream that indexes its raster tiles in an encrypted datum is
//! misaligned by up to ~500 m when addressed with WGS84 tile coordinates.
//! The offset is non-linear at the tens-of-meters scale across a single
//! tile, so corner interpolation would leave visible seams; every
//! destination pixel is reverse-mapped individually instead.
//! Nearest-neighbor sampling keeps road labels and line work sharp.

use crate::{
	descriptor::WarpDatum,
	provider::{TileFetch, TileProvider},
	template,
};
use anyhow::{Context, Result, bail};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage, codecs::png::PngEncoder};
use std::collections::HashMap;
use tilegate_core::{
	TileCoord,
	geo::{gcj02_to_bd09, is_in_mainland_china, lonlat_to_tile_pixel, tile_pixel_to_lonlat, wgs84_to_gcj02},
};

const TILE_EDGE: i64 = 256;

/// Produce the WGS84 tile `coord` from an upstream indexed in `datum`.
pub(crate) async fn fetch_reprojected(provider: &TileProvider, datum: WarpDatum, coord: TileCoord) -> Result<TileFetch> {
	let x = i64::from(coord.x);
	let y = i64::from(coord.y);
	let z = coord.z;

	let (tl_lon, tl_lat) = tile_pixel_to_lonlat(x * TILE_EDGE, y * TILE_EDGE, z);
	let (br_lon, br_lat) = tile_pixel_to_lonlat((x + 1) * TILE_EDGE - 1, (y + 1) * TILE_EDGE - 1, z);

	// Fast path: outside mainland China the datums agree, so the upstream
	// tile can be passed through untouched. This covers ~99% of the globe
	// and preserves the upstream's native sharpness.
	if !is_in_mainland_china(tl_lat, tl_lon) && !is_in_mainland_china(br_lat, br_lon) {
		let url = template::expand(&provider.descriptor().url_template, coord.x, coord.y, z, None);
		return provider.get_tile(&url).await;
	}

	let mut tile = RgbaImage::new(TILE_EDGE as u32, TILE_EDGE as u32);
	// Tiny per-call cache: the warped region touches at most the 2x2 block
	// of source tiles around the requested one. Failed fetches are cached
	// too, so a dead source tile costs one request instead of 65536.
	let mut source_tiles: HashMap<String, Option<RgbaImage>> = HashMap::new();
	let world_edge = i64::from(1u32 << z);

	for py in 0..TILE_EDGE {
		for px in 0..TILE_EDGE {
			let (lon, lat) = tile_pixel_to_lonlat(x * TILE_EDGE + px, y * TILE_EDGE + py, z);
			let (mut warp_lat, mut warp_lon) = wgs84_to_gcj02(lat, lon);
			if datum == WarpDatum::Bd09 {
				(warp_lat, warp_lon) = gcj02_to_bd09(warp_lat, warp_lon);
			}
			let (gx, gy) = lonlat_to_tile_pixel(warp_lon, warp_lat, z);

			if gx < 0 || gy < 0 {
				continue;
			}
			let (tx, ty) = (gx / TILE_EDGE, gy / TILE_EDGE);
			let (sx, sy) = (gx % TILE_EDGE, gy % TILE_EDGE);
			if tx >= world_edge || ty >= world_edge {
				continue;
			}

			let key = format!("{tx}_{ty}_{z}");
			if !source_tiles.contains_key(&key) {
				let fetched = fetch_source_tile(provider, tx as u32, ty as u32, z).await?;
				source_tiles.insert(key.clone(), fetched);
			}
			let Some(source) = source_tiles.get(&key).and_then(Option::as_ref) else {
				continue; // pixel stays transparent
			};

			if (sx as u32) < source.width() && (sy as u32) < source.height() {
				tile.put_pixel(px as u32, py as u32, *source.get_pixel(sx as u32, sy as u32));
			}
		}
	}

	let mut buffer = Vec::with_capacity(256 * 256 * 4);
	PngEncoder::new(&mut buffer)
		.write_image(tile.as_raw(), tile.width(), tile.height(), ExtendedColorType::Rgba8)
		.context("encoding reprojected tile as PNG")?;

	Ok(TileFetch {
		content_type: Some("image/png".to_string()),
		body: buffer.into(),
	})
}

/// Fetch and decode one source tile.
///
/// Returns `Ok(None)` for transient failures (HTTP errors, corrupt images):
/// those only blank the affected pixels. An upstream that answers with a
/// non-raster content type fails the whole tile.
async fn fetch_source_tile(provider: &TileProvider, tx: u32, ty: u32, z: u8) -> Result<Option<RgbaImage>> {
	let mut source = TileCoord { x: tx, y: ty, z };
	if provider.descriptor().is_tms {
		source = source.flip_y();
	}
	let url = template::expand(&provider.descriptor().url_template, source.x, source.y, z, None);

	let response = match provider.request(&url).send().await {
		Ok(response) => response,
		Err(err) => {
			log::warn!("failed to fetch source tile {tx}/{ty}/{z}: {err}");
			return Ok(None);
		}
	};
	if response.status() != reqwest::StatusCode::OK {
		log::warn!("source tile {tx}/{ty}/{z} returned status {}", response.status());
		return Ok(None);
	}

	let content_type = response
		.headers()
		.get(reqwest::header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.unwrap_or("")
		.to_string();
	let format = if content_type.contains("image/png") {
		ImageFormat::Png
	} else if content_type.contains("image/jpeg") || content_type.contains("image/jpg") {
		ImageFormat::Jpeg
	} else {
		bail!("unsupported source tile content type '{content_type}' from {url}");
	};

	let body = match response.bytes().await {
		Ok(body) => body,
		Err(err) => {
			log::warn!("failed to read source tile {tx}/{ty}/{z}: {err}");
			return Ok(None);
		}
	};
	match image::load_from_memory_with_format(&body, format) {
		Ok(decoded) => Ok(Some(decoded.to_rgba8())),
		Err(err) => {
			log::warn!("failed to decode source tile {tx}/{ty}/{z}: {err}");
			Ok(None)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// The warp decision hinges on the corner test; the datum math itself is
	// covered in tilegate_core. These tests pin the corner classification
	// for tiles that must take the fast path vs. the warp path.

	fn corners_outside_china(x: u32, y: u32, z: u8) -> bool {
		let x = i64::from(x);
		let y = i64::from(y);
		let (tl_lon, tl_lat) = tile_pixel_to_lonlat(x * TILE_EDGE, y * TILE_EDGE, z);
		let (br_lon, br_lat) = tile_pixel_to_lonlat((x + 1) * TILE_EDGE - 1, (y + 1) * TILE_EDGE - 1, z);
		!is_in_mainland_china(tl_lat, tl_lon) && !is_in_mainland_china(br_lat, br_lon)
	}

	#[test]
	fn new_york_takes_the_fast_path() {
		// z=10, around (40.7N, 74W)
		assert!(corners_outside_china(301, 385, 10));
	}

	#[test]
	fn beijing_takes_the_warp_path() {
		// z=10 tile containing (39.9N, 116.4E)
		assert!(!corners_outside_china(843, 388, 10));
	}

	#[test]
	fn source_pixel_split_matches_tile_arithmetic() {
		let (gx, gy) = lonlat_to_tile_pixel(116.404, 39.915, 10);
		assert_eq!((gx / TILE_EDGE, gy / TILE_EDGE), (843, 387));
		assert!((0..TILE_EDGE).contains(&(gx % TILE_EDGE)));
		assert!((0..TILE_EDGE).contains(&(gy % TILE_EDGE)));
	}
}
