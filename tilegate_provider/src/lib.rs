//! # tilegate_provider
//!
//! The outbound side of the tilegate gateway: upstream tile providers and
//! everything they need to talk to the outside world.
//!
//! - [`client`] builds the shared, pooled `reqwest` client (proxy policy,
//!   relaxed TLS, redirect policy).
//! - [`catalog`] declares the upstream sources; [`ProviderRegistry`] turns
//!   them into validated, dispatchable [`TileProvider`]s.
//! - The driver kinds (`template`, `quadtree`, `tencent_satellite`, the
//!   GCJ02/BD09 warp drivers and `gee`) live behind one
//!   [`TileProvider::fetch`] entry point.
//! - [`GeeSession`] manages the Google Earth Enterprise binary handshake,
//!   the periodic session refresh and the cookie-stamped relay.

pub mod catalog;
pub mod client;
mod descriptor;
mod gee;
mod metadata;
mod provider;
mod registry;
mod template;
mod warp;

pub use descriptor::{Driver, ProviderDescriptor, WarpDatum};
pub use gee::{DEFAULT_GEE_BASE_URL, GeeSession};
pub use metadata::TileMapMetadata;
pub use provider::{TileFetch, TileProvider};
pub use registry::ProviderRegistry;
