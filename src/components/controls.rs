use leptos::ev::{Event, MouseEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpBackend;
use crate::controller::{
	GraphController, PLACEHOLDER_OPTION, Status, generate_graph, load_gene_list,
};

/// Plant and gene pickers, the free-text gene box and the status line.
#[component]
pub fn GeneControls(
	controller: RwSignal<GraphController>,
	backend: HttpBackend,
	plants: Vec<String>,
) -> impl IntoView {
	let gene_options = Memo::new(move |_| controller.with(|c| c.gene_options()));
	let status = Memo::new(move |_| controller.with(|c| c.status()));

	let backend_load = backend.clone();
	let on_plant_change = move |ev: Event| {
		let plant = event_target_value(&ev);
		controller.update(|c| c.set_plant(plant));
		let backend = backend_load.clone();
		spawn_local(async move { load_gene_list(&controller, &backend).await });
	};

	let on_gene_change = move |ev: Event| {
		let gene = event_target_value(&ev);
		controller.update(|c| {
			c.set_selected_gene(gene);
			c.select_gene_id();
		});
	};

	let on_gene_input = move |ev: Event| {
		let gene = event_target_value(&ev);
		controller.update(|c| c.set_gene_input(gene));
	};

	let on_generate = move |_: MouseEvent| {
		let backend = backend.clone();
		spawn_local(async move { generate_graph(&controller, &backend).await });
	};

	view! {
		<div class="gene-controls">
			<div
				id="div_status"
				title=move || status.get().to_string()
				class=move || match status.get() {
					Status::Error(_) => "status status-error",
					_ => "status",
				}
			>
				{move || status.with(|s| s.label())}
				{move || match status.get() {
					Status::Error(message) => {
						Some(view! { <span class="status-detail">{message}</span> })
					}
					_ => None,
				}}
			</div>

			<label for="sl_plant">"Plant"</label>
			<select id="sl_plant" on:change=on_plant_change>
				<option value="" disabled=true selected=true>{PLACEHOLDER_OPTION}</option>
				{plants
					.into_iter()
					.map(|plant| {
						let value = plant.clone();
						view! { <option value=value>{plant}</option> }
					})
					.collect_view()}
			</select>

			<label for="sl_gene">"Gene ID"</label>
			<select
				id="sl_gene"
				on:change=on_gene_change
				prop:value=move || controller.with(|c| c.selected_gene().to_owned())
			>
				{move || {
					gene_options
						.get()
						.iter()
						.map(|gene| {
							let (value, text) = (gene.clone(), gene.clone());
							view! { <option value=value>{text}</option> }
						})
						.collect_view()
				}}
			</select>

			<textarea
				id="ta_gene"
				rows="1"
				placeholder="AT1G01010"
				prop:value=move || controller.with(|c| c.gene_input().to_owned())
				on:input=on_gene_input
			></textarea>

			<button on:click=on_generate>"Generate graph"</button>
		</div>
	}
}
