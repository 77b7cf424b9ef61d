//! This module defines the `TileContentType` enum, representing the raster
//! image formats the gateway serves, with conversions to MIME types and file
//! extensions (used for cache keys).

use anyhow::{Result, bail};
use serde::Serialize;
use std::fmt::Display;

/// Raster image format of a tile source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TileContentType {
	#[serde(rename = "image/png")]
	Png,
	#[serde(rename = "image/jpeg")]
	Jpeg,
	#[serde(rename = "image/webp")]
	Webp,
}

impl TileContentType {
	pub fn as_mime(&self) -> &'static str {
		match self {
			TileContentType::Png => "image/png",
			TileContentType::Jpeg => "image/jpeg",
			TileContentType::Webp => "image/webp",
		}
	}

	/// File extension without the leading dot, e.g. `png`.
	pub fn extension(&self) -> &'static str {
		match self {
			TileContentType::Png => "png",
			TileContentType::Jpeg => "jpeg",
			TileContentType::Webp => "webp",
		}
	}

	/// Parse a MIME type (possibly with parameters, e.g. `image/png; x=y`).
	pub fn from_mime(mime: &str) -> Result<TileContentType> {
		let essence = mime.split(';').next().unwrap_or("").trim();
		Ok(match essence {
			"image/png" => TileContentType::Png,
			"image/jpeg" | "image/jpg" => TileContentType::Jpeg,
			"image/webp" => TileContentType::Webp,
			_ => bail!("unsupported tile content type '{mime}'"),
		})
	}
}

impl Display for TileContentType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_mime())
	}
}
