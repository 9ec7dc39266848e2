use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::warn;

use crate::model::{GraphData, GraphEdge, GraphNode, NodeId};

pub const NODE_RADIUS: f64 = 9.0;
pub const HIT_RADIUS: f64 = 14.0;
const BASE_EDGE_WIDTH: f64 = 1.0;
const MAX_EDGE_WIDTH: f64 = 8.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: NodeId,
	pub label: String,
	pub color: String,
}

impl From<&GraphNode> for NodeInfo {
	fn from(node: &GraphNode) -> Self {
		Self {
			id: node.id,
			label: node.label.clone(),
			color: node.color.clone(),
		}
	}
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	/// Stroke width in world units.
	pub width: f64,
	pub label: Vec<String>,
}

impl EdgeInfo {
	fn new(edge: &GraphEdge, source: DefaultNodeIdx, target: DefaultNodeIdx) -> Self {
		Self {
			source,
			target,
			width: stroke_width(edge.width),
			label: edge.label_lines().map(str::to_owned).collect(),
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	/// Eased 0..1 highlight strength.
	pub highlight_t: f64,
}

/// One rendered graph instance. Dropping it releases the simulation.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
}

/// Maps the backend's edge weight (count of supporting sentences) to a
/// stroke width.
pub fn stroke_width(weight: Option<f64>) -> f64 {
	match weight {
		Some(w) if w.is_finite() && w > 1.0 => {
			(BASE_EDGE_WIDTH + w.ln() * 1.5).min(MAX_EDGE_WIDTH)
		}
		_ => BASE_EDGE_WIDTH,
	}
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 400.0,
			force_spring: 0.04,
			force_max: 120.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();

		for (i, node) in data.nodes.iter().enumerate() {
			if id_to_idx.contains_key(&node.id) {
				warn!("duplicate node id {}, keeping the first", node.id);
				continue;
			}
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let radius = 60.0 + 8.0 * (data.nodes.len() as f64).sqrt();
			let idx = graph.add_node(NodeData {
				x: (radius * angle.cos()) as f32,
				y: (radius * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo::from(node),
			});
			id_to_idx.insert(node.id, idx);
		}

		let mut edges = Vec::with_capacity(data.edges.len());
		let mut springs = HashSet::new();
		for edge in &data.edges {
			let (Some(&source), Some(&target)) =
				(id_to_idx.get(&edge.from), id_to_idx.get(&edge.to))
			else {
				warn!("edge {} -> {} references an unknown node", edge.from, edge.to);
				continue;
			};
			// Self loops and repeated pairs are drawn but only one spring is added.
			if source != target && springs.insert((source, target)) {
				graph.add_edge(source, target, EdgeData::default());
			}
			edges.push(EdgeInfo::new(edge, source, target));
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
		}
	}

	pub fn node_count(&self) -> usize {
		let mut count = 0;
		self.graph.visit_nodes(|_| count += 1);
		count
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<NodeId> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id);
			}
		});
		id
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn begin_drag(&mut self, idx: DefaultNodeIdx, sx: f64, sy: f64) {
		let mut start = (0.0, 0.0);
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				start = (node.x(), node.y());
			}
		});
		self.drag = DragState {
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: start.0,
			node_start_y: start.1,
		};
	}

	/// Moves the dragged node and pins it where it is dropped.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let k = self.transform.k;
		let nx = self.drag.node_start_x + ((sx - self.drag.start_x) / k) as f32;
		let ny = self.drag.node_start_y + ((sy - self.drag.start_y) / k) as f32;
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = nx;
				node.data.y = ny;
				node.data.is_anchor = true;
			}
		});
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn release_pointer(&mut self) {
		self.drag.node_idx = None;
		self.pan.active = false;
	}

	pub fn is_dragging(&self) -> bool {
		self.drag.node_idx.is_some()
	}

	/// Zooms by `factor` keeping the screen point under the cursor fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = k;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for e in &self.edges {
				if e.source == idx {
					self.hover.neighbors.insert(e.target);
				} else if e.target == idx {
					self.hover.neighbors.insert(e.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);

		let target = if self.hover.node.is_some() { 1.0 } else { 0.0 };
		self.hover.highlight_t += (target - self.hover.highlight_t) * (6.0 * dt as f64).min(1.0);
		if self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		// Keep the graph centred in the new viewport.
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::placeholder_graph;

	fn node(id: NodeId, label: &str) -> GraphNode {
		GraphNode {
			id,
			label: label.into(),
			color: "#abffff".into(),
		}
	}

	#[test]
	fn builds_one_node_per_id_and_keeps_duplicate_edges() {
		let data = GraphData {
			nodes: vec![node(0, "AT1G01010"), node(1, "NAC001"), node(1, "again")],
			edges: vec![GraphEdge::new(0, 1), GraphEdge::new(0, 1), GraphEdge::new(0, 42)],
		};

		let state = ForceGraphState::new(&data, 800.0, 600.0);

		assert_eq!(state.node_count(), 2);
		assert_eq!(state.edges.len(), 2);
		let labels: HashSet<_> = {
			let mut labels = HashSet::new();
			state.graph.visit_nodes(|n| {
				labels.insert(n.data.user_data.label.clone());
			});
			labels
		};
		assert!(labels.contains("NAC001"));
		assert!(!labels.contains("again"));
	}

	#[test]
	fn repeated_pairs_share_one_spring() {
		let mut edges = vec![GraphEdge::new(1, 0), GraphEdge::new(1, 1)];
		edges.extend((0..500).map(|_| GraphEdge::new(0, 1)));
		let data = GraphData {
			nodes: vec![node(0, "AT1G01010"), node(1, "NAC001")],
			edges,
		};

		let state = ForceGraphState::new(&data, 800.0, 600.0);

		let mut springs = 0;
		state.graph.visit_edges(|_, _, _| springs += 1);
		assert_eq!(springs, 2);
		assert_eq!(state.edges.len(), 502);
	}

	#[test]
	fn placeholder_graph_builds_fully() {
		let state = ForceGraphState::new(&placeholder_graph(), 800.0, 600.0);
		assert_eq!(state.node_count(), 7);
		assert_eq!(state.edges.len(), 6);
	}

	#[test]
	fn edge_weight_widens_stroke_up_to_a_cap() {
		assert_eq!(stroke_width(None), BASE_EDGE_WIDTH);
		assert_eq!(stroke_width(Some(1.0)), BASE_EDGE_WIDTH);
		assert!(stroke_width(Some(4.0)) > stroke_width(Some(2.0)));
		assert_eq!(stroke_width(Some(1e9)), MAX_EDGE_WIDTH);
		assert_eq!(stroke_width(Some(f64::NAN)), BASE_EDGE_WIDTH);
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let mut state = ForceGraphState::new(&placeholder_graph(), 800.0, 600.0);
		let before = state.screen_to_graph(100.0, 50.0);
		state.zoom_at(100.0, 50.0, 2.0);
		let after = state.screen_to_graph(100.0, 50.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
		assert_eq!(state.transform.k, 2.0);
	}

	#[test]
	fn hovering_highlights_neighbours() {
		let mut state = ForceGraphState::new(&placeholder_graph(), 800.0, 600.0);
		let common_name = state.edges[0].target;
		state.set_hover(Some(common_name));
		// -2 touches every other placeholder node.
		assert_eq!(state.hover.neighbors.len(), 6);
		state.set_hover(None);
		assert!(state.hover.neighbors.is_empty());
	}
}
