//! JSON endpoints of the gene relation backend.

use std::future::Future;

use gloo_net::http::Request;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::GraphData;

pub const LOAD_GENE_LIST: &str = "run_load_gene_list";
pub const GENERATE_GRAPH: &str = "run_generate_graph";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneListRequest {
	pub plant: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GeneListResponse {
	pub geneid_list: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerateGraphRequest {
	pub geneid: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
	#[error("could not encode request for {endpoint}: {reason}")]
	Encode {
		endpoint: &'static str,
		reason: String,
	},
	#[error("request to {endpoint} failed: {reason}")]
	Network {
		endpoint: &'static str,
		reason: String,
	},
	#[error("{endpoint} answered with HTTP {status}")]
	Status { endpoint: &'static str, status: u16 },
	#[error("malformed response from {endpoint}: {reason}")]
	Decode {
		endpoint: &'static str,
		reason: String,
	},
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
	/// Prefix for both endpoints. Relative to the page by default.
	pub base_url: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: ".".into(),
		}
	}
}

impl ApiConfig {
	pub fn endpoint_url(&self, endpoint: &str) -> String {
		match self.base_url.trim_end_matches('/') {
			"" => format!("./{endpoint}"),
			base => format!("{base}/{endpoint}"),
		}
	}
}

/// The two calls the controller makes. Implemented over HTTP in the browser
/// and by scripted fakes in tests.
pub trait Backend {
	fn load_gene_list(
		&self,
		request: &GeneListRequest,
	) -> impl Future<Output = Result<GeneListResponse, ApiError>>;

	fn generate_graph(
		&self,
		request: &GenerateGraphRequest,
	) -> impl Future<Output = Result<GraphData, ApiError>>;
}

#[derive(Clone, Debug, Default)]
pub struct HttpBackend {
	config: ApiConfig,
}

impl HttpBackend {
	pub fn new(config: ApiConfig) -> Self {
		Self { config }
	}

	async fn post<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, ApiError>
	where
		B: Serialize,
		T: DeserializeOwned,
	{
		let url = self.config.endpoint_url(endpoint);
		debug!("POST {url}");

		let request = Request::post(&url)
			.json(body)
			.map_err(|e| ApiError::Encode {
				endpoint,
				reason: e.to_string(),
			})?;
		let response = request.send().await.map_err(|e| ApiError::Network {
			endpoint,
			reason: e.to_string(),
		})?;
		if !response.ok() {
			return Err(ApiError::Status {
				endpoint,
				status: response.status(),
			});
		}
		response.json::<T>().await.map_err(|e| ApiError::Decode {
			endpoint,
			reason: e.to_string(),
		})
	}
}

impl Backend for HttpBackend {
	async fn load_gene_list(
		&self,
		request: &GeneListRequest,
	) -> Result<GeneListResponse, ApiError> {
		self.post(LOAD_GENE_LIST, request).await
	}

	async fn generate_graph(&self, request: &GenerateGraphRequest) -> Result<GraphData, ApiError> {
		self.post(GENERATE_GRAPH, request).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn request_bodies_use_backend_field_names() {
		let plant = GeneListRequest {
			plant: "Arabidopsis".into(),
		};
		let gene = GenerateGraphRequest {
			geneid: "AT1G01010".into(),
		};

		assert_eq!(
			serde_json::to_string(&plant).unwrap(),
			r#"{"plant":"Arabidopsis"}"#
		);
		assert_eq!(
			serde_json::to_string(&gene).unwrap(),
			r#"{"geneid":"AT1G01010"}"#
		);
	}

	#[test]
	fn gene_list_keeps_response_order() {
		let response: GeneListResponse =
			serde_json::from_str(r#"{"geneid_list": ["AT1G01020", "AT1G01010"]}"#).unwrap();
		assert_eq!(response.geneid_list, vec!["AT1G01020", "AT1G01010"]);
	}

	#[test]
	fn endpoint_urls_join_base_and_path() {
		assert_eq!(
			ApiConfig::default().endpoint_url(LOAD_GENE_LIST),
			"./run_load_gene_list"
		);

		let remote = ApiConfig {
			base_url: "https://genes.example.org/api/".into(),
		};
		assert_eq!(
			remote.endpoint_url(GENERATE_GRAPH),
			"https://genes.example.org/api/run_generate_graph"
		);

		let empty = ApiConfig {
			base_url: String::new(),
		};
		assert_eq!(empty.endpoint_url(GENERATE_GRAPH), "./run_generate_graph");
	}

	#[test]
	fn errors_name_the_endpoint() {
		let err = ApiError::Status {
			endpoint: GENERATE_GRAPH,
			status: 500,
		};
		assert_eq!(err.to_string(), "run_generate_graph answered with HTTP 500");
	}
}
