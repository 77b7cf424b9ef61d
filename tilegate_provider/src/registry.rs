//! The provider registry: catalog order plus an id index.
//!
//! `/map/list/` needs the catalog declaration order, tile dispatch needs an
//! O(1) lookup; the registry maintains both, built once at startup and
//! read-only under concurrent access afterwards.

use crate::{ProviderDescriptor, TileMapMetadata, TileProvider};
use anyhow::{Context, Result, ensure};
use reqwest::Client;
use std::{collections::HashMap, sync::Arc};

#[derive(Debug)]
pub struct ProviderRegistry {
	/// Catalog declaration order, served verbatim by `/map/list/`.
	providers: Vec<Arc<TileProvider>>,
	/// Id → provider, for request dispatch.
	index: HashMap<String, Arc<TileProvider>>,
}

impl ProviderRegistry {
	/// Validate every descriptor and build the ordered list + index.
	///
	/// Metadata validation failures and duplicate ids abort startup.
	pub fn build(descriptors: Vec<ProviderDescriptor>, client: Client) -> Result<ProviderRegistry> {
		let mut providers = Vec::with_capacity(descriptors.len());
		let mut index = HashMap::with_capacity(descriptors.len());

		for descriptor in descriptors {
			let metadata = TileMapMetadata::from_descriptor(&descriptor);
			metadata
				.validate()
				.with_context(|| format!("validating tile source '{}'", descriptor.id))?;
			ensure!(
				!index.contains_key(&metadata.id),
				"duplicate tile source id '{}'",
				metadata.id
			);

			log::info!("registered tile source '{}' ({})", metadata.id, metadata.name);
			let provider = Arc::new(TileProvider::new(descriptor, metadata.clone(), client.clone()));
			index.insert(metadata.id, Arc::clone(&provider));
			providers.push(provider);
		}

		Ok(ProviderRegistry { providers, index })
	}

	pub fn get(&self, id: &str) -> Option<&Arc<TileProvider>> {
		self.index.get(id)
	}

	/// Metadata of all sources, in catalog order.
	pub fn metadata_list(&self) -> Vec<TileMapMetadata> {
		self.providers.iter().map(|provider| provider.metadata().clone()).collect()
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{catalog, client::default_client, descriptor::Driver};
	use tilegate_core::CoordinateSystem;

	fn template_descriptor(id: &str) -> ProviderDescriptor {
		ProviderDescriptor::new(
			id,
			"A Source",
			"https://tiles.example.org/{z}/{x}/{y}.png",
			Driver::Template,
			CoordinateSystem::Wgs84,
		)
	}

	#[test]
	fn preserves_declaration_order() {
		let registry = ProviderRegistry::build(
			vec![
				template_descriptor("zulu"),
				template_descriptor("alpha"),
				template_descriptor("mike"),
			],
			default_client(),
		)
		.unwrap();

		let ids: Vec<String> = registry.metadata_list().into_iter().map(|m| m.id).collect();
		assert_eq!(ids, ["zulu", "alpha", "mike"]);
		assert!(registry.get("alpha").is_some());
		assert!(registry.get("missing").is_none());
	}

	#[test]
	fn rejects_duplicate_ids() {
		let err = ProviderRegistry::build(
			vec![template_descriptor("twice"), template_descriptor("twice")],
			default_client(),
		)
		.unwrap_err();
		assert!(err.to_string().contains("duplicate tile source id"));
	}

	#[test]
	fn rejects_invalid_metadata() {
		let err = ProviderRegistry::build(vec![template_descriptor("Bad Id")], default_client()).unwrap_err();
		assert!(format!("{err:#}").contains("[a-z0-9_]+"));
	}

	#[test]
	fn the_builtin_catalog_builds() {
		let registry = ProviderRegistry::build(catalog::catalog(), default_client()).unwrap();
		assert!(registry.len() >= 15);

		// every id is unique and well-formed by construction; spot-check
		// the seeds the gateway's documentation relies on
		assert!(registry.get("google_pure_satellite").is_some());
		assert!(registry.get("bing_satellite").is_some());
		assert!(registry.get("baidu_satellite").is_some());
	}
}
