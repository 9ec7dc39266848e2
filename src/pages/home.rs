use leptos::prelude::*;

use crate::api::HttpBackend;
use crate::components::controls::GeneControls;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::legend::CategoryLegend;
use crate::config::AppConfig;
use crate::controller::GraphController;
use crate::model::GraphData;

/// Graph handed to the canvas. Only notifies when the controller replaces
/// its graph, not on other edits such as typing a gene id.
pub fn graph_view(controller: RwSignal<GraphController>) -> Signal<GraphData> {
	let revision = Memo::new(move |_| controller.with(|c| c.graph_revision()));
	Signal::derive(move || {
		revision.track();
		controller.with_untracked(|c| c.graph().clone())
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = AppConfig::from_document();
	let controller = RwSignal::new(GraphController::new());
	let backend = HttpBackend::new(config.api);
	let graph = graph_view(controller);

	view! {
		<div class="gene-graph">
			<aside class="sidebar">
				<h1>"Gene relation graph"</h1>
				<GeneControls controller=controller backend=backend plants=config.plants />
				<CategoryLegend />
				<p class="hint">
					"Drag nodes to pin them. Scroll to zoom. Drag the background to pan."
				</p>
			</aside>
			<div id="div_graph" class="graph-container">
				<ForceGraphCanvas data=graph />
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;
	use crate::model::{GraphEdge, GraphNode, placeholder_graph};

	fn single_gene(gene: &str) -> GraphData {
		GraphData {
			nodes: vec![GraphNode {
				id: 0,
				label: gene.into(),
				color: "#d5abff".into(),
			}],
			edges: vec![GraphEdge::new(0, -1)],
		}
	}

	/// Counts how often a subscriber of `graph` is re-run.
	fn count_rebuilds(graph: Signal<GraphData>) -> (Memo<()>, Arc<AtomicUsize>) {
		let runs = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&runs);
		let rebuilds = Memo::new(move |_| {
			graph.track();
			counter.fetch_add(1, Ordering::SeqCst);
		});
		(rebuilds, runs)
	}

	#[test]
	fn canvas_data_follows_graph_replacements_only() {
		let owner = Owner::new();
		owner.with(|| {
			let controller = RwSignal::new(GraphController::new());
			let graph = graph_view(controller);
			let (rebuilds, runs) = count_rebuilds(graph);

			rebuilds.get();
			assert_eq!(runs.load(Ordering::SeqCst), 1);
			assert_eq!(graph.get_untracked(), placeholder_graph());

			controller.update(|c| c.set_gene_input("AT1G01010"));
			controller.update(|c| c.set_selected_gene("AT1G01010"));
			rebuilds.get();
			assert_eq!(runs.load(Ordering::SeqCst), 1);

			controller.update(|c| c.replace_graph(single_gene("AT1G01010")));
			rebuilds.get();
			assert_eq!(runs.load(Ordering::SeqCst), 2);
			assert_eq!(graph.get_untracked(), single_gene("AT1G01010"));

			// An identical graph is still a fresh instance.
			controller.update(|c| c.replace_graph(single_gene("AT1G01010")));
			rebuilds.get();
			assert_eq!(runs.load(Ordering::SeqCst), 3);
		});
	}
}
