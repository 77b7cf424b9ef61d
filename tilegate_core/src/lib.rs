//! # tilegate_core
//!
//! Pure types and math shared by the tilegate gateway: slippy-map tile
//! coordinates, tile content types, coordinate systems, Web-Mercator pixel
//! math, the GCJ02/BD09 datum transforms and the Bing quadkey codec.
//!
//! This crate performs no I/O; everything here is deterministic and cheap to
//! test in isolation.

pub mod geo;
pub mod types;

pub use types::{CoordinateSystem, MapType, TileContentType, TileCoord};
