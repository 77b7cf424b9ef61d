//! Coordinate systems and map kinds a tile source can declare.
//!
//! `CoordinateSystem` is what decides whether a source can be passed through
//! untouched (`WebMercator`, `Wgs84`, `Cgcs2000`) or has to go through the
//! pixel-level reprojection engine (`Gcj02`, `Bd09`).

use serde::Serialize;
use std::fmt::Display;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum CoordinateSystem {
	/// Web Mercator, EPSG:3857.
	#[serde(rename = "EPSG:3857")]
	WebMercator,
	/// World Geodetic System 1984, EPSG:4326.
	#[serde(rename = "WGS84")]
	Wgs84,
	/// Chinese offset datum, non-linear transform of WGS84.
	#[serde(rename = "GCJ02")]
	Gcj02,
	/// Baidu datum, polar rotation of GCJ02.
	#[serde(rename = "BD09")]
	Bd09,
	/// China Geodetic Coordinate System 2000; for tile purposes ~WGS84.
	#[serde(rename = "CGCS2000")]
	Cgcs2000,
}

impl Display for CoordinateSystem {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			CoordinateSystem::WebMercator => "EPSG:3857",
			CoordinateSystem::Wgs84 => "WGS84",
			CoordinateSystem::Gcj02 => "GCJ02",
			CoordinateSystem::Bd09 => "BD09",
			CoordinateSystem::Cgcs2000 => "CGCS2000",
		})
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
	Raster,
	Vector,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_matches_epsg_labels() {
		assert_eq!(CoordinateSystem::WebMercator.to_string(), "EPSG:3857");
		assert_eq!(CoordinateSystem::Gcj02.to_string(), "GCJ02");
		assert_eq!(CoordinateSystem::Cgcs2000.to_string(), "CGCS2000");
	}
}
