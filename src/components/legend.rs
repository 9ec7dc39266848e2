use leptos::prelude::*;

use crate::model::Category;

#[component]
pub fn CategoryLegend() -> impl IntoView {
	view! {
		<ul class="category-legend">
			{Category::ALL
				.into_iter()
				.map(|category| {
					view! {
						<li>
							<span
								class="swatch"
								style=format!("background-color: {}", category.color())
							></span>
							{category.name()}
						</li>
					}
				})
				.collect_view()}
		</ul>
	}
}
