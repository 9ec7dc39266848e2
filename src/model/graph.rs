use serde::{Deserialize, Serialize};

/// Node identifier. Negative ids belong to the placeholder legend.
pub type NodeId = i64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: NodeId,
	pub label: String,
	pub color: String,
}

/// Directed edge between two node ids.
///
/// `width` and `label` are optional on the wire: the backend sets them for
/// relation edges (number of supporting sentences and newline-joined relation
/// names), the placeholder graph leaves them out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub from: NodeId,
	pub to: NodeId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

impl GraphEdge {
	pub fn new(from: NodeId, to: NodeId) -> Self {
		Self {
			from,
			to,
			width: None,
			label: None,
		}
	}

	/// Label lines, skipping blanks (the backend sends `""` for plain edges).
	pub fn label_lines(&self) -> impl Iterator<Item = &str> {
		self.label
			.as_deref()
			.unwrap_or_default()
			.lines()
			.filter(|line| !line.trim().is_empty())
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	#[serde(rename = "node_list")]
	pub nodes: Vec<GraphNode>,
	#[serde(rename = "edge_list")]
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_backend_payload_with_optional_edge_fields() {
		let body = r##"{
			"node_list": [
				{"id": -1, "label": "GeneID", "color": "#d5abff"},
				{"id": 0, "label": "AT1G01010", "color": "#d5abff"},
				{"id": 8, "label": "NAC001", "color": "#abffff"}
			],
			"edge_list": [
				{"from": 0, "to": -1},
				{"from": 0, "to": 8, "width": 3, "label": ""},
				{"from": 8, "to": 9, "width": 2, "label": "regulates\nbinds"}
			]
		}"##;

		let data: GraphData = serde_json::from_str(body).unwrap();

		assert_eq!(data.nodes.len(), 3);
		assert_eq!(data.nodes[2].label, "NAC001");
		assert_eq!(data.edges[0], GraphEdge::new(0, -1));
		assert_eq!(data.edges[1].width, Some(3.0));
		assert_eq!(data.edges[1].label_lines().count(), 0);
		assert_eq!(
			data.edges[2].label_lines().collect::<Vec<_>>(),
			vec!["regulates", "binds"]
		);
	}

	#[test]
	fn plain_edges_serialize_without_optional_fields() {
		let json = serde_json::to_value(GraphEdge::new(-1, -2)).unwrap();
		assert_eq!(json, serde_json::json!({"from": -1, "to": -2}));
	}
}
