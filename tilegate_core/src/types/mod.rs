mod content_type;
mod coordinate_system;
mod tile_coord;

pub use content_type::TileContentType;
pub use coordinate_system::{CoordinateSystem, MapType};
pub use tile_coord::{MAX_ZOOM, TileCoord};
