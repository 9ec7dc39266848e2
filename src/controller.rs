//! View state behind the page and the three user actions that mutate it.
//!
//! Every network action is split into a `begin_*` step, which updates the
//! view and hands out a [`Ticket`], and a `finish_*` step that applies the
//! response. Tickets are stamped with a per-action generation so a response
//! to a superseded request is dropped instead of overwriting newer state.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use leptos::prelude::{RwSignal, Update};
use log::{debug, info, warn};

use crate::api::{ApiError, Backend, GeneListRequest, GeneListResponse, GenerateGraphRequest};
use crate::model::{GraphData, placeholder_graph};

/// First entry of the gene selector.
pub const PLACEHOLDER_OPTION: &str = "--select--";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
	#[default]
	Ready,
	Loading,
	Error(String),
}

impl Status {
	/// Shown status of two concurrent actions: Loading outranks Error,
	/// Error outranks Ready. The first argument wins a tie of two errors.
	pub fn combine(first: &Status, second: &Status) -> Status {
		match (first, second) {
			(Status::Loading, _) | (_, Status::Loading) => Status::Loading,
			(Status::Error(message), _) | (_, Status::Error(message)) => {
				Status::Error(message.clone())
			}
			(Status::Ready, Status::Ready) => Status::Ready,
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			Status::Ready => "Ready",
			Status::Loading => "Loading...",
			Status::Error(_) => "Error",
		}
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Status::Error(message) => write!(f, "Error: {message}"),
			other => f.write_str(other.label()),
		}
	}
}

/// An in-flight request and the generation it was issued under.
#[derive(Debug)]
pub struct Ticket<R> {
	generation: u64,
	pub request: R,
}

#[derive(Clone, Debug)]
pub struct GraphController {
	gene_list_status: Status,
	graph_status: Status,
	plant: String,
	gene_options: Arc<[String]>,
	selected_gene: String,
	gene_input: String,
	graph: GraphData,
	graph_revision: u64,
	gene_list_generation: u64,
	graph_generation: u64,
}

impl Default for GraphController {
	fn default() -> Self {
		Self::new()
	}
}

impl GraphController {
	pub fn new() -> Self {
		Self {
			gene_list_status: Status::Ready,
			graph_status: Status::Ready,
			plant: String::new(),
			gene_options: placeholder_options(),
			selected_gene: PLACEHOLDER_OPTION.to_owned(),
			gene_input: String::new(),
			graph: placeholder_graph(),
			graph_revision: 0,
			gene_list_generation: 0,
			graph_generation: 0,
		}
	}

	/// Status of the page. The graph action's error is reported ahead of the
	/// gene list's.
	pub fn status(&self) -> Status {
		Status::combine(&self.graph_status, &self.gene_list_status)
	}

	/// Selector entries. Cloning the handle does not copy the list.
	pub fn gene_options(&self) -> Arc<[String]> {
		Arc::clone(&self.gene_options)
	}

	pub fn selected_gene(&self) -> &str {
		&self.selected_gene
	}

	pub fn gene_input(&self) -> &str {
		&self.gene_input
	}

	pub fn graph(&self) -> &GraphData {
		&self.graph
	}

	/// Number of times the rendered graph has been replaced since start-up.
	pub fn graph_revision(&self) -> u64 {
		self.graph_revision
	}

	pub fn set_plant(&mut self, plant: impl Into<String>) {
		self.plant = plant.into();
	}

	pub fn set_selected_gene(&mut self, gene: impl Into<String>) {
		self.selected_gene = gene.into();
	}

	pub fn set_gene_input(&mut self, gene: impl Into<String>) {
		self.gene_input = gene.into();
	}

	pub fn begin_load_gene_list(&mut self) -> Ticket<GeneListRequest> {
		self.gene_list_status = Status::Loading;
		self.gene_options = placeholder_options();
		self.selected_gene = PLACEHOLDER_OPTION.to_owned();
		self.gene_list_generation += 1;

		Ticket {
			generation: self.gene_list_generation,
			request: GeneListRequest {
				plant: self.plant.clone(),
			},
		}
	}

	/// Applies a gene list response. Returns `false` when the ticket was
	/// superseded and the response dropped.
	pub fn finish_load_gene_list(
		&mut self,
		ticket: Ticket<GeneListRequest>,
		result: Result<GeneListResponse, ApiError>,
	) -> bool {
		if ticket.generation != self.gene_list_generation {
			debug!(
				"dropping stale gene list for {:?} (generation {} < {})",
				ticket.request.plant, ticket.generation, self.gene_list_generation
			);
			return false;
		}

		match result {
			Ok(response) => {
				debug!(
					"{} genes for {:?}",
					response.geneid_list.len(),
					ticket.request.plant
				);
				self.gene_options = std::iter::once(PLACEHOLDER_OPTION.to_owned())
					.chain(response.geneid_list)
					.collect();
				self.gene_list_status = Status::Ready;
			}
			Err(e) => self.gene_list_status = failure(e),
		}
		true
	}

	/// Local only: leaves the status of in-flight requests alone.
	pub fn select_gene_id(&mut self) {
		self.gene_input = self.selected_gene.clone();
	}

	pub fn begin_generate_graph(&mut self) -> Ticket<GenerateGraphRequest> {
		self.graph_status = Status::Loading;
		self.graph_generation += 1;

		Ticket {
			generation: self.graph_generation,
			request: GenerateGraphRequest {
				geneid: self.gene_input.clone(),
			},
		}
	}

	/// Applies a graph response. Returns `false` when the ticket was
	/// superseded and the response dropped.
	pub fn finish_generate_graph(
		&mut self,
		ticket: Ticket<GenerateGraphRequest>,
		result: Result<GraphData, ApiError>,
	) -> bool {
		if ticket.generation != self.graph_generation {
			debug!(
				"dropping stale graph for {:?} (generation {} < {})",
				ticket.request.geneid, ticket.generation, self.graph_generation
			);
			return false;
		}

		match result {
			Ok(graph) => {
				self.replace_graph(graph);
				self.graph_status = Status::Ready;
			}
			Err(e) => self.graph_status = failure(e),
		}
		true
	}

	/// Discards the current graph and installs `graph` in its place.
	pub fn replace_graph(&mut self, graph: GraphData) {
		self.graph_revision += 1;
		info!(
			"graph revision {}: {} nodes, {} edges",
			self.graph_revision,
			graph.nodes.len(),
			graph.edges.len()
		);
		if graph.is_empty() {
			warn!("backend returned an empty graph");
		}
		self.graph = graph;
	}
}

fn placeholder_options() -> Arc<[String]> {
	Arc::from([PLACEHOLDER_OPTION.to_owned()])
}

fn failure(error: ApiError) -> Status {
	warn!("{error}");
	Status::Error(error.to_string())
}

/// Shared access to a controller that never outlives a single call, so no
/// borrow is held across an `.await`.
pub trait ControllerHandle {
	/// Runs `f` against the controller. `None` if it is gone.
	fn with_controller<R>(&self, f: impl FnOnce(&mut GraphController) -> R) -> Option<R>;
}

impl ControllerHandle for RefCell<GraphController> {
	fn with_controller<R>(&self, f: impl FnOnce(&mut GraphController) -> R) -> Option<R> {
		Some(f(&mut self.borrow_mut()))
	}
}

impl ControllerHandle for RwSignal<GraphController> {
	fn with_controller<R>(&self, f: impl FnOnce(&mut GraphController) -> R) -> Option<R> {
		self.try_update(f)
	}
}

pub async fn load_gene_list<H, B>(handle: &H, backend: &B)
where
	H: ControllerHandle,
	B: Backend,
{
	let Some(ticket) = handle.with_controller(GraphController::begin_load_gene_list) else {
		return;
	};
	let result = backend.load_gene_list(&ticket.request).await;
	handle.with_controller(|c| c.finish_load_gene_list(ticket, result));
}

pub async fn generate_graph<H, B>(handle: &H, backend: &B)
where
	H: ControllerHandle,
	B: Backend,
{
	let Some(ticket) = handle.with_controller(GraphController::begin_generate_graph) else {
		return;
	};
	let result = backend.generate_graph(&ticket.request).await;
	handle.with_controller(|c| c.finish_generate_graph(ticket, result));
}
