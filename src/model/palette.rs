use super::graph::{GraphData, GraphEdge, GraphNode, NodeId};

/// Entity categories the backend colors nodes by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
	GeneId,
	CommonName,
	Compound,
	Species,
	Location,
	Process,
}

impl Category {
	pub const ALL: [Category; 6] = [
		Category::GeneId,
		Category::CommonName,
		Category::Compound,
		Category::Species,
		Category::Location,
		Category::Process,
	];

	pub fn name(self) -> &'static str {
		match self {
			Category::GeneId => "GeneID",
			Category::CommonName => "CommonName",
			Category::Compound => "Compound",
			Category::Species => "Species",
			Category::Location => "Location",
			Category::Process => "Process",
		}
	}

	/// Pastel hue wheel at 33% saturation, 100% value.
	pub fn color(self) -> &'static str {
		match self {
			Category::GeneId => "#d5abff",
			Category::CommonName => "#abffff",
			Category::Compound => "#d5ffab",
			Category::Species => "#ffffab",
			Category::Location => "#ffd5ab",
			Category::Process => "#ffabab",
		}
	}

	fn legend_node(self, id: NodeId) -> GraphNode {
		GraphNode {
			id,
			label: self.name().to_owned(),
			color: self.color().to_owned(),
		}
	}
}

/// The legend graph shown before any gene has been requested.
///
/// Ids -2 and -3 are both CommonName nodes.
pub fn placeholder_graph() -> GraphData {
	use Category::*;

	let nodes = [
		(-1, GeneId),
		(-2, CommonName),
		(-3, CommonName),
		(-4, Compound),
		(-5, Species),
		(-6, Location),
		(-7, Process),
	]
	.into_iter()
	.map(|(id, category)| category.legend_node(id))
	.collect();

	let edges = [(-1, -2), (-2, -3), (-2, -4), (-2, -5), (-2, -6), (-2, -7)]
		.into_iter()
		.map(|(from, to)| GraphEdge::new(from, to))
		.collect();

	GraphData { nodes, edges }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn placeholder_graph_matches_legend() {
		let graph = placeholder_graph();

		let nodes: Vec<_> = graph
			.nodes
			.iter()
			.map(|n| (n.id, n.label.as_str(), n.color.as_str()))
			.collect();
		assert_eq!(
			nodes,
			vec![
				(-1, "GeneID", "#d5abff"),
				(-2, "CommonName", "#abffff"),
				(-3, "CommonName", "#abffff"),
				(-4, "Compound", "#d5ffab"),
				(-5, "Species", "#ffffab"),
				(-6, "Location", "#ffd5ab"),
				(-7, "Process", "#ffabab"),
			]
		);

		let edges: Vec<_> = graph.edges.iter().map(|e| (e.from, e.to)).collect();
		assert_eq!(
			edges,
			vec![(-1, -2), (-2, -3), (-2, -4), (-2, -5), (-2, -6), (-2, -7)]
		);
		assert!(graph.edges.iter().all(|e| e.width.is_none() && e.label.is_none()));
	}
}
