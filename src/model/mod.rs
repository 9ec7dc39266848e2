//! Graph data exchanged with the backend and drawn by the canvas.

mod graph;
mod palette;

pub use graph::{GraphData, GraphEdge, GraphNode, NodeId};
pub use palette::{Category, placeholder_graph};
