//! Start-up settings read from `<meta>` tags of the host page.

use log::debug;

use crate::api::ApiConfig;

pub const API_BASE_META: &str = "gene-graph:api-base";
pub const PLANTS_META: &str = "gene-graph:plants";

const DEFAULT_PLANTS: &[&str] = &["Arabidopsis thaliana", "Populus trichocarpa"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	pub api: ApiConfig,
	/// Entries of the plant selector, in display order.
	pub plants: Vec<String>,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api: ApiConfig::default(),
			plants: DEFAULT_PLANTS.iter().map(|&p| p.to_owned()).collect(),
		}
	}
}

impl AppConfig {
	/// Builds the config from a key lookup, falling back to defaults for
	/// missing or blank values.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let mut config = Self::default();

		if let Some(base) = lookup(API_BASE_META) {
			let base = base.trim();
			if !base.is_empty() {
				config.api.base_url = base.to_owned();
			}
		}

		if let Some(plants) = lookup(PLANTS_META) {
			let plants: Vec<String> = plants
				.split(',')
				.map(str::trim)
				.filter(|p| !p.is_empty())
				.map(str::to_owned)
				.collect();
			if !plants.is_empty() {
				config.plants = plants;
			}
		}

		config
	}

	pub fn from_document() -> Self {
		let Some(document) = web_sys::window().and_then(|w| w.document()) else {
			return Self::default();
		};
		let config = Self::from_lookup(|name| {
			document
				.query_selector(&format!(r#"meta[name="{name}"]"#))
				.ok()
				.flatten()
				.and_then(|meta| meta.get_attribute("content"))
		});
		debug!("config: {config:?}");
		config
	}
}
