//! One registered upstream provider and its `fetch` dispatch.

use crate::{
	client::DESKTOP_USER_AGENT,
	descriptor::{Driver, ProviderDescriptor},
	metadata::TileMapMetadata,
	template, warp,
};
use anyhow::{Context, Result, bail, ensure};
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use tilegate_core::{TileCoord, geo};

/// The normalized result of one upstream tile fetch: the upstream's declared
/// content type (if any) and the full body.
#[derive(Debug, Clone)]
pub struct TileFetch {
	pub content_type: Option<String>,
	pub body: Bytes,
}

/// A validated tile source: catalog descriptor, derived metadata, shared
/// HTTP client. Built once by the registry, read-only afterwards.
#[derive(Debug)]
pub struct TileProvider {
	descriptor: ProviderDescriptor,
	metadata: TileMapMetadata,
	client: Client,
}

impl TileProvider {
	pub(crate) fn new(descriptor: ProviderDescriptor, metadata: TileMapMetadata, client: Client) -> TileProvider {
		TileProvider {
			descriptor,
			metadata,
			client,
		}
	}

	pub fn metadata(&self) -> &TileMapMetadata {
		&self.metadata
	}

	pub(crate) fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	/// Fetch one tile from the upstream, dispatching on the driver kind.
	///
	/// Every driver rejects out-of-range zoom levels before touching the
	/// network.
	pub async fn fetch(&self, coord: TileCoord) -> Result<TileFetch> {
		let meta = &self.metadata;
		ensure!(
			coord.z >= meta.min_zoom && coord.z <= meta.max_zoom,
			"zoom {} is outside the supported range {}..={} of '{}'",
			coord.z,
			meta.min_zoom,
			meta.max_zoom,
			meta.id
		);
		log::debug!("fetch tile {coord:?} from '{}'", meta.id);

		match self.descriptor.driver {
			Driver::Template => {
				let url = template::expand(&self.descriptor.url_template, coord.x, coord.y, coord.z, None);
				self.get_tile(&url).await
			}
			Driver::Quadtree => {
				let quadkey = geo::xyz_to_quadkey(coord.x, coord.y, coord.z);
				let url = template::expand(&self.descriptor.url_template, coord.x, coord.y, coord.z, Some(&quadkey));
				self.get_tile(&url).await
			}
			Driver::TencentSatellite => {
				// Tencent indexes tiles bottom-up and buckets them in 16x16
				// groups; both substitutions use the flipped y.
				let flipped = coord.flip_y();
				let url = template::expand(&self.descriptor.url_template, flipped.x, flipped.y, flipped.z, None);
				self.get_tile(&url).await
			}
			Driver::Warp { datum } => warp::fetch_reprojected(self, datum, coord).await,
			Driver::Gee => {
				bail!(
					"'{}' is served through the /gee relay, not the XYZ tile pipeline",
					meta.id
				)
			}
		}
	}

	/// Build a GET request with the browser-like headers the upstream expects.
	pub(crate) fn request(&self, url: &str) -> RequestBuilder {
		let mut request = self.client.get(url).header(header::USER_AGENT, DESKTOP_USER_AGENT);
		if let Some(referer) = &self.descriptor.referer {
			request = request.header(header::REFERER, referer);
		}
		if let Some(origin) = &self.descriptor.origin {
			request = request.header(header::ORIGIN, origin);
		}
		request
	}

	/// Issue a GET and normalize the response; any non-200 status is an error.
	pub(crate) async fn get_tile(&self, url: &str) -> Result<TileFetch> {
		let response = self
			.request(url)
			.send()
			.await
			.with_context(|| format!("requesting tile from {url}"))?;

		let status = response.status();
		ensure!(status == StatusCode::OK, "upstream returned status {status} for {url}");

		let content_type = response
			.headers()
			.get(header::CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);
		let body = response
			.bytes()
			.await
			.with_context(|| format!("reading tile body from {url}"))?;

		Ok(TileFetch { content_type, body })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::client::default_client;
	use tilegate_core::CoordinateSystem;

	fn provider(min_zoom: u8, max_zoom: u8) -> TileProvider {
		let descriptor = ProviderDescriptor::new(
			"zoomed",
			"Zoom Guard",
			"https://tiles.example.org/{z}/{x}/{y}.png",
			Driver::Template,
			CoordinateSystem::Wgs84,
		)
		.with_zoom(min_zoom, max_zoom);
		let metadata = TileMapMetadata::from_descriptor(&descriptor);
		TileProvider::new(descriptor, metadata, default_client())
	}

	#[tokio::test]
	async fn zoom_guard_rejects_before_any_network_call() {
		let provider = provider(3, 10);

		let err = provider.fetch(TileCoord::new(2, 1, 1).unwrap()).await.unwrap_err();
		assert!(err.to_string().contains("outside the supported range"));

		let err = provider.fetch(TileCoord::new(11, 0, 0).unwrap()).await.unwrap_err();
		assert!(err.to_string().contains("3..=10"));
	}

	#[tokio::test]
	async fn gee_driver_points_at_the_relay() {
		let descriptor = ProviderDescriptor::new("earth", "Earth", "", Driver::Gee, CoordinateSystem::Wgs84);
		let metadata = TileMapMetadata::from_descriptor(&descriptor);
		let provider = TileProvider::new(descriptor, metadata, default_client());

		let err = provider.fetch(TileCoord::new(5, 1, 2).unwrap()).await.unwrap_err();
		assert!(err.to_string().contains("/gee relay"));
	}
}
