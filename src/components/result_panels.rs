use leptos::prelude::*;

use crate::api::{BillOfMaterials, FirmwareCode};

#[component]
fn Pending(text: &'static str) -> impl IntoView {
	view! { <div class="panel-placeholder">{text}</div> }
}

/// Generated firmware with its explanation.
#[component]
pub fn CodePanel(
	#[prop(into)] code: Signal<Option<FirmwareCode>>,
	#[prop(into)] loading: Signal<bool>,
) -> impl IntoView {
	move || match code.get() {
		Some(firmware) => view! {
			<div class="code-panel">
				<pre class="code-panel__source"><code>{firmware.code}</code></pre>
				{(!firmware.explanation.is_empty())
					.then(|| view! { <p class="code-panel__explanation">{firmware.explanation}</p> })}
			</div>
		}
		.into_any(),
		None if loading.get() => view! { <Pending text="Generating code..." /> }.into_any(),
		None => view! { <Pending text="Generate a diagram to get matching code." /> }.into_any(),
	}
}

/// Bill of materials as a table.
#[component]
pub fn BomPanel(
	#[prop(into)] bom: Signal<Option<BillOfMaterials>>,
	#[prop(into)] loading: Signal<bool>,
) -> impl IntoView {
	move || match bom.get() {
		Some(bom) => view! {
			<div class="bom-panel">
				<table>
					<thead>
						<tr>
							<th>"Component"</th>
							<th>"Qty"</th>
							<th>"Est. price"</th>
							<th>"Source"</th>
						</tr>
					</thead>
					<tbody>
						{bom
							.items
							.into_iter()
							.map(|item| {
								view! {
									<tr>
										<td>{item.component}</td>
										<td>{item.quantity}</td>
										<td>{item.estimated_price}</td>
										<td>{item.source}</td>
									</tr>
								}
							})
							.collect_view()}
					</tbody>
				</table>
				{(!bom.total_estimated_cost.is_empty())
					.then(|| {
						view! {
							<p class="bom-panel__total">
								"Total estimated cost: " <strong>{bom.total_estimated_cost}</strong>
							</p>
						}
					})}
				{bom.notes.map(|notes| view! { <p class="muted">{notes}</p> })}
			</div>
		}
		.into_any(),
		None if loading.get() => view! { <Pending text="Pricing components..." /> }.into_any(),
		None => view! { <Pending text="Generate a diagram to get a bill of materials." /> }
			.into_any(),
	}
}
