//! Web-Mercator pixel math at 256-px tile edges.
//!
//! A zoom level `z` spans a square pixel grid of `2^z * 256` on each side.
//! Pixel positions address the top-left corner of a pixel; conversions to
//! pixel space truncate toward zero, matching integer tile arithmetic
//! (`px / 256` is the tile, `px % 256` the intra-tile offset).

use std::f64::consts::PI;

/// Pixel edge length of the world at zoom `z`.
fn world_size(z: u8) -> f64 {
	f64::from(1u32 << z) * 256.0
}

/// Convert a global pixel position to WGS84 `(lon, lat)` degrees.
pub fn tile_pixel_to_lonlat(px: i64, py: i64, z: u8) -> (f64, f64) {
	let scale = world_size(z);
	let x = px as f64 / scale;
	let y = py as f64 / scale;

	let lon = x * 360.0 - 180.0;
	let n = PI - 2.0 * PI * y;
	let lat = 180.0 / PI * (0.5 * (n.exp() - (-n).exp())).atan();
	(lon, lat)
}

/// Convert WGS84 `(lon, lat)` degrees to a global pixel position.
pub fn lonlat_to_tile_pixel(lon: f64, lat: f64, z: u8) -> (i64, i64) {
	let scale = world_size(z);
	let x = (lon + 180.0) / 360.0;
	let siny = (lat * PI / 180.0).sin();
	let y = 0.5 - ((1.0 + siny) / (1.0 - siny)).ln() / (4.0 * PI);

	((x * scale) as i64, (y * scale) as i64)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn world_origin_is_northwest_corner() {
		let (lon, lat) = tile_pixel_to_lonlat(0, 0, 0);
		assert_eq!(lon, -180.0);
		assert!((lat - 85.05112877980659).abs() < 1e-9);
	}

	#[test]
	fn world_center_is_null_island() {
		let (lon, lat) = tile_pixel_to_lonlat(128, 128, 0);
		assert!(lon.abs() < 1e-9);
		assert!(lat.abs() < 1e-9);
	}

	#[rstest]
	#[case(0, 7, 19)]
	#[case(3, 100, 200)]
	#[case(10, 215_000, 100_000)]
	#[case(22, 536_870_911, 1_000_000_007)]
	fn pixel_roundtrip_within_one_pixel(#[case] z: u8, #[case] px: i64, #[case] py: i64) {
		let (lon, lat) = tile_pixel_to_lonlat(px, py, z);
		let (px2, py2) = lonlat_to_tile_pixel(lon, lat, z);
		assert!((px - px2).abs() <= 1, "px {px} -> {px2} at z{z}");
		assert!((py - py2).abs() <= 1, "py {py} -> {py2} at z{z}");
	}

	#[test]
	fn pixel_roundtrip_sweep() {
		for z in 0..=22u8 {
			let side = i64::from(1u32 << z) * 256;
			for frac in [0, 1, 3, 7] {
				let p = side / 8 * frac + side / 16;
				let (lon, lat) = tile_pixel_to_lonlat(p, p, z);
				let (px2, py2) = lonlat_to_tile_pixel(lon, lat, z);
				assert!((p - px2).abs() <= 1);
				assert!((p - py2).abs() <= 1);
			}
		}
	}
}
