//! GCJ02 and BD09 datum transforms.
//!
//! GCJ02 is the state-mandated Chinese datum: a non-linear, Krasovsky-based
//! offset of WGS84 that is only applied inside mainland China. BD09 is
//! Baidu's datum, a further polar rotation on top of GCJ02. The inverse
//! transforms are deliberately absent; the warp engine only ever maps
//! requested WGS84 pixels *into* the encrypted datums.

use std::f64::consts::PI;

/// Krasovsky 1940 semi-major axis.
const A: f64 = 6378245.0;
/// Krasovsky 1940 first eccentricity squared.
const EE: f64 = 0.00669342162296594323;

/// Whether a WGS84 coordinate lies inside mainland China.
///
/// Taiwan is excluded (its tiles carry no GCJ02 offset). Hong Kong and
/// Macau are NOT excluded: the upstream imagery there is already GCJ02.
pub fn is_in_mainland_china(lat: f64, lon: f64) -> bool {
	if !(73.675379..=135.026311).contains(&lon) || !(18.197701..=53.458804).contains(&lat) {
		return false;
	}
	if (119.0..=123.0).contains(&lon) && (21.5..=25.5).contains(&lat) {
		return false; // Taiwan
	}
	true
}

/// Convert WGS84 `(lat, lon)` to GCJ02.
///
/// Points outside mainland China are returned unchanged.
pub fn wgs84_to_gcj02(lat: f64, lon: f64) -> (f64, f64) {
	if !is_in_mainland_china(lat, lon) {
		return (lat, lon);
	}

	let mut d_lat = transform_lat(lon - 105.0, lat - 35.0);
	let mut d_lon = transform_lon(lon - 105.0, lat - 35.0);
	let rad_lat = lat / 180.0 * PI;
	let mut magic = rad_lat.sin();
	magic = 1.0 - EE * magic * magic;
	let sqrt_magic = magic.sqrt();
	d_lat = (d_lat * 180.0) / ((A * (1.0 - EE)) / (magic * sqrt_magic) * PI);
	d_lon = (d_lon * 180.0) / (A / sqrt_magic * rad_lat.cos() * PI);
	(lat + d_lat, lon + d_lon)
}

/// Convert GCJ02 `(lat, lon)` to BD09 (Baidu's polar rotation).
pub fn gcj02_to_bd09(lat: f64, lon: f64) -> (f64, f64) {
	let x = lon;
	let y = lat;
	let z = (x * x + y * y).sqrt() + 0.00002 * (y * PI * 3000.0 / 180.0).sin();
	let theta = y.atan2(x) + 0.000003 * (x * PI * 3000.0 / 180.0).cos();
	let bd_lon = z * theta.cos() + 0.0065;
	let bd_lat = z * theta.sin() + 0.006;
	(bd_lat, bd_lon)
}

fn transform_lat(x: f64, y: f64) -> f64 {
	let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
	ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
	ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
	ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
	ret
}

fn transform_lon(x: f64, y: f64) -> f64 {
	let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
	ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
	ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
	ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
	ret
}
