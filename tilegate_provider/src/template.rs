//! URL template expansion for upstream tile requests.
//!
//! Recognized placeholders, each substituted exactly once:
//! `{z}` `{x}` `{y}`, the bucketed `{x/16}` `{y/16}`, an optional
//! `{quadkey}`, and `{serverpart:a,b,c}` which picks one shard uniformly at
//! random per call. Unrecognized placeholders are left verbatim.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

static SERVERPART_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{serverpart:([^}]+)\}").expect("serverpart pattern is valid"));

/// Expand a tile URL template for the given coordinate.
pub fn expand(template: &str, x: u32, y: u32, z: u8, quadkey: Option<&str>) -> String {
	let mut url = template.replacen("{x}", &x.to_string(), 1);
	url = url.replacen("{y}", &y.to_string(), 1);
	url = url.replacen("{z}", &z.to_string(), 1);
	url = url.replacen("{x/16}", &(x / 16).to_string(), 1);
	url = url.replacen("{y/16}", &(y / 16).to_string(), 1);
	if let Some(quadkey) = quadkey {
		url = url.replacen("{quadkey}", quadkey, 1);
	}
	expand_serverpart(&url)
}

/// Replace `{serverpart:<a>,<b>,...}` with one of its options, chosen
/// uniformly at random.
fn expand_serverpart(url: &str) -> String {
	let Some(captures) = SERVERPART_PATTERN.captures(url) else {
		return url.to_string();
	};
	let options: Vec<&str> = captures[1].split(',').collect();
	let choice = options[rand::rng().random_range(0..options.len())];

	let full = captures.get(0).expect("capture 0 always exists");
	let mut expanded = String::with_capacity(url.len());
	expanded.push_str(&url[..full.start()]);
	expanded.push_str(choice);
	expanded.push_str(&url[full.end()..]);
	expanded
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expands_xyz_once() {
		let url = expand("https://tiles.example.org/{z}/{x}/{y}.png", 10, 12, 5, None);
		assert_eq!(url, "https://tiles.example.org/5/10/12.png");
	}

	#[test]
	fn expands_query_style_templates() {
		let url = expand("https://www.google.com/maps/vt?lyrs=s@189&x={x}&y={y}&z={z}", 10, 12, 5, None);
		assert_eq!(url, "https://www.google.com/maps/vt?lyrs=s@189&x=10&y=12&z=5");
	}

	#[test]
	fn expands_bucketed_coordinates() {
		let url = expand("https://p0.example.org/sat/{z}/{x/16}/{y/16}/{x}_{y}.jpg", 53, 27, 9, None);
		assert_eq!(url, "https://p0.example.org/sat/9/3/1/53_27.jpg");
	}

	#[test]
	fn expands_quadkey() {
		let url = expand("https://t.example.net/tiles/a{quadkey}.jpeg", 3, 5, 3, Some("213"));
		assert_eq!(url, "https://t.example.net/tiles/a213.jpeg");
	}

	#[test]
	fn serverpart_picks_from_the_option_set() {
		for _ in 0..20 {
			let url = expand("https://{serverpart:a,b,c}.tile.example.org/{z}/{x}/{y}.png", 1, 2, 3, None);
			let host = url.strip_prefix("https://").unwrap();
			let shard = &host[..1];
			assert!(["a", "b", "c"].contains(&shard), "unexpected shard '{shard}'");
		}
	}

	#[test]
	fn unrecognized_placeholders_stay_verbatim() {
		let url = expand("https://tiles.example.org/{z}/{x}/{y}{r}.png?key={apikey}", 1, 2, 3, None);
		assert_eq!(url, "https://tiles.example.org/3/1/2{r}.png?key={apikey}");
	}
}
