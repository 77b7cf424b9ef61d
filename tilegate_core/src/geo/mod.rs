//! Geodesy helpers: Web-Mercator pixel math, the GCJ02/BD09 datum
//! transforms and the Bing quadkey codec.

mod datum;
mod mercator;
mod quadkey;

pub use datum::{gcj02_to_bd09, is_in_mainland_china, wgs84_to_gcj02};
pub use mercator::{lonlat_to_tile_pixel, tile_pixel_to_lonlat};
pub use quadkey::{quadkey_to_xyz, xyz_to_quadkey};
