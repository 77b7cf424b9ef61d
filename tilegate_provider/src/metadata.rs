//! Public metadata of a registered tile source.
//!
//! One `TileMapMetadata` is produced per provider at startup (defaults
//! applied, invariants checked) and never mutated afterwards. `/map/list/`
//! serializes these verbatim.

use crate::descriptor::ProviderDescriptor;
use anyhow::{Result, ensure};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tilegate_core::types::MAX_ZOOM;
use tilegate_core::{CoordinateSystem, MapType, TileContentType};

static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("id pattern is valid"));

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TileMapMetadata {
	/// Unique ascii slug, used in the URL path.
	pub id: String,
	/// Human-readable label.
	pub name: String,
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub map_type: MapType,
	/// Pixel edge of the upstream's native tile.
	pub tile_size: u16,
	pub coordinate_type: CoordinateSystem,
	pub content_type: TileContentType,
}

impl TileMapMetadata {
	/// Derive the final metadata from a catalog descriptor, applying the
	/// documented defaults: `max_zoom 0 → 18`, `tile_size 0 → 256`,
	/// missing content type → `image/png`.
	pub fn from_descriptor(descriptor: &ProviderDescriptor) -> TileMapMetadata {
		TileMapMetadata {
			id: descriptor.id.clone(),
			name: descriptor.name.clone(),
			min_zoom: descriptor.min_zoom,
			max_zoom: if descriptor.max_zoom == 0 { 18 } else { descriptor.max_zoom },
			map_type: descriptor.map_type,
			tile_size: if descriptor.tile_size == 0 { 256 } else { descriptor.tile_size },
			coordinate_type: descriptor.coordinate_type,
			content_type: descriptor.content_type.unwrap_or(TileContentType::Png),
		}
	}

	pub fn validate(&self) -> Result<()> {
		ensure!(
			ID_PATTERN.is_match(&self.id),
			"tile source id '{}' must match [a-z0-9_]+",
			self.id
		);
		ensure!(!self.name.is_empty(), "tile source '{}' has an empty name", self.id);
		ensure!(
			self.min_zoom <= self.max_zoom,
			"tile source '{}' has min_zoom {} > max_zoom {}",
			self.id,
			self.min_zoom,
			self.max_zoom
		);
		ensure!(
			self.max_zoom <= MAX_ZOOM,
			"tile source '{}' has max_zoom {} > {MAX_ZOOM}",
			self.id,
			self.max_zoom
		);
		ensure!(
			matches!(self.tile_size, 256 | 512 | 1024),
			"tile source '{}' has unsupported tile size {}",
			self.id,
			self.tile_size
		);
		Ok(())
	}
}
