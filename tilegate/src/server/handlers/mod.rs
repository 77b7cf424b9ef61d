pub mod common;
pub mod gee;
pub mod proxy;
pub mod tilemap;
