//! Declarative description of one upstream tile source.
//!
//! A `ProviderDescriptor` is what the catalog writes down: the URL template,
//! the driver kind that knows how to use it, and the raw metadata fields
//! (zero/missing values are filled with defaults when the registry derives
//! the final [`TileMapMetadata`](crate::TileMapMetadata)).

use tilegate_core::{CoordinateSystem, MapType, TileContentType};

/// How tiles are fetched from the upstream.
///
/// A tagged variant instead of a trait object: the set of driver kinds is
/// closed and dispatch happens in one hot function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Driver {
	/// Plain URL-template expansion.
	Template,
	/// Bing-style quadkey addressing via the `{quadkey}` placeholder.
	Quadtree,
	/// Tencent satellite scheme: TMS y-flip plus `{x/16}`/`{y/16}` buckets.
	TencentSatellite,
	/// Per-pixel reprojection from an encrypted datum into WGS84.
	Warp { datum: WarpDatum },
	/// Google Earth Enterprise; served through the session-managed relay.
	Gee,
}

/// Source datum of a warped provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarpDatum {
	Gcj02,
	Bd09,
}

#[derive(Clone, Debug)]
pub struct ProviderDescriptor {
	pub id: String,
	pub name: String,
	/// URL template with `{z}` `{x}` `{y}` `{x/16}` `{y/16}` `{quadkey}`
	/// `{serverpart:a,b,c}` placeholders. Empty for the `gee` driver.
	pub url_template: String,
	pub referer: Option<String>,
	pub origin: Option<String>,
	pub driver: Driver,
	/// Upstream indexes tiles with the TMS y-axis convention.
	pub is_tms: bool,
	pub min_zoom: u8,
	/// `0` means "use the default" (18).
	pub max_zoom: u8,
	pub map_type: MapType,
	/// `0` means "use the default" (256).
	pub tile_size: u16,
	pub coordinate_type: CoordinateSystem,
	/// `None` means "use the default" (`image/png`).
	pub content_type: Option<TileContentType>,
}

impl ProviderDescriptor {
	pub fn new(
		id: &str,
		name: &str,
		url_template: &str,
		driver: Driver,
		coordinate_type: CoordinateSystem,
	) -> ProviderDescriptor {
		ProviderDescriptor {
			id: id.to_string(),
			name: name.to_string(),
			url_template: url_template.to_string(),
			referer: None,
			origin: None,
			driver,
			is_tms: false,
			min_zoom: 0,
			max_zoom: 0,
			map_type: MapType::Raster,
			tile_size: 0,
			coordinate_type,
			content_type: None,
		}
	}

	pub fn with_zoom(mut self, min_zoom: u8, max_zoom: u8) -> Self {
		self.min_zoom = min_zoom;
		self.max_zoom = max_zoom;
		self
	}

	pub fn with_referer(mut self, referer: &str) -> Self {
		self.referer = Some(referer.to_string());
		self
	}

	pub fn with_origin(mut self, origin: &str) -> Self {
		self.origin = Some(origin.to_string());
		self
	}

	pub fn with_content_type(mut self, content_type: TileContentType) -> Self {
		self.content_type = Some(content_type);
		self
	}

	pub fn tms(mut self) -> Self {
		self.is_tms = true;
		self
	}
}
