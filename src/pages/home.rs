use leptos::prelude::*;
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::components::knowledge_graph::{
	CategoryFilter, Document, EXPORT_FILE_NAME, GraphBuilder, GraphFilter, KnowledgeGraph,
	KnowledgeGraphCanvas, LayoutStrategy, NodeCategory, download_json, fresh_seed,
};

/// Research notes the page starts with.
fn sample_documents() -> Vec<Document> {
	vec![
		Document::new(
			"1",
			"Attention Survey",
			"A survey of Transformer models in Natural Language Processing, from BERT to GPT. \
			 Covers Deep Learning training at Google and OpenAI.",
		),
		Document::new(
			"2",
			"Vision Benchmarks",
			"Computer Vision benchmarks for Neural Networks trained with PyTorch at Stanford.",
		),
		Document::new(
			"3",
			"Graph Retrieval",
			"Combining a Knowledge Graph with Information Retrieval and Machine Learning \
			 for question answering at Microsoft.",
		),
		Document::new(
			"4",
			"Agents Reading List",
			"Reinforcement Learning and Artificial Intelligence agents from DeepMind, \
			 with notes on Statistics and Data Science.",
		),
	]
}

fn summary(graph: &KnowledgeGraph) -> String {
	let per_category = NodeCategory::ALL
		.into_iter()
		.map(|c| format!("{} {}", graph.count(c), c))
		.collect::<Vec<_>>()
		.join(", ");
	format!(
		"{} nodes ({per_category}), {} edges",
		graph.nodes.len(),
		graph.edges.len()
	)
}

/// Knowledge graph page: the canvas plus search, filters and document input.
#[component]
pub fn Home() -> impl IntoView {
	let documents = RwSignal::new(sample_documents());
	let seed = RwSignal::new(fresh_seed());
	let search = RwSignal::new(String::new());
	let category = RwSignal::new(CategoryFilter::All);
	let strategy = RwSignal::new(LayoutStrategy::default());
	let selected = RwSignal::new(None::<String>);
	let new_name = RwSignal::new(String::new());
	let new_content = RwSignal::new(String::new());

	let graph = Memo::new(move |_| {
		let mut rng = ChaCha8Rng::seed_from_u64(seed.get());
		documents.with(|docs| GraphBuilder::default().build(docs, &mut rng))
	});
	let filter = Signal::derive(move || GraphFilter {
		search: search.get(),
		category: category.get(),
	});

	let add_document = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let (name, content) = (new_name.get_untracked(), new_content.get_untracked());
		if name.trim().is_empty() || content.trim().is_empty() {
			return;
		}
		documents.update(|docs| {
			let id = (docs.len() + 1).to_string();
			info!("adding document {id} ({name})");
			docs.push(Document::new(id, name.trim(), content));
		});
		new_name.set(String::new());
		new_content.set(String::new());
	};

	let export = move |_: leptos::ev::MouseEvent| {
		if let Err(err) = graph.with_untracked(download_json) {
			error!("could not export {EXPORT_FILE_NAME}: {err}");
		}
	};

	let details = move || {
		let id = selected.get()?;
		graph.with(|g| {
			let node = g.node(&id)?.clone();
			let neighbors: Vec<String> = g
				.neighbors(&id)
				.into_iter()
				.filter_map(|n| g.node(n))
				.map(|n| n.label.clone())
				.collect();
			Some(view! {
				<aside class="node-details">
					<h2>{node.label}</h2>
					<p>{format!("{} · {} connections", node.category, node.connections)}</p>
					<ul>
						{neighbors.into_iter().map(|n| view! { <li>{n}</li> }).collect_view()}
					</ul>
					<button on:click=move |_| selected.set(None)>"Close"</button>
				</aside>
			})
		})
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<KnowledgeGraphCanvas
					graph=graph
					filter=filter
					strategy=strategy
					on_select=move |id: String| selected.set(Some(id))
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Knowledge Graph"</h1>
					<p class="subtitle">
						{move || graph.with(summary)}
						{move || filter.with(GraphFilter::is_active).then_some(" (filtered view)")}
					</p>

					<div class="graph-controls">
						<input
							type="search"
							placeholder="Search nodes"
							prop:value=move || search.get()
							on:input=move |ev| search.set(event_target_value(&ev))
						/>
						<select
							prop:value=move || category.get().as_str()
							on:change=move |ev| {
								category.set(CategoryFilter::parse(&event_target_value(&ev)))
							}
						>
							<option value="all">"All categories"</option>
							{NodeCategory::ALL
								.into_iter()
								.map(|c| view! { <option value=c.as_str()>{c.as_str()}</option> })
								.collect_view()}
						</select>
						<select
							prop:value=move || strategy.get().as_str()
							on:change=move |ev| {
								strategy.set(event_target_value(&ev).parse().unwrap_or_default())
							}
						>
							{LayoutStrategy::ALL
								.into_iter()
								.map(|l| view! { <option value=l.as_str()>{l.as_str()}</option> })
								.collect_view()}
						</select>
						<button on:click=move |_| seed.set(fresh_seed())>"Regenerate"</button>
						<button on:click=export>"Export JSON"</button>
					</div>

					<form class="add-document" on:submit=add_document>
						<input
							type="text"
							placeholder="Document name"
							prop:value=move || new_name.get()
							on:input=move |ev| new_name.set(event_target_value(&ev))
						/>
						<textarea
							placeholder="Document text"
							prop:value=move || new_content.get()
							on:input=move |ev| new_content.set(event_target_value(&ev))
						/>
						<button type="submit">"Add document"</button>
					</form>

					<ul class="documents">
						{move || {
							documents
								.get()
								.into_iter()
								.map(|d| view! { <li>{d.name}</li> })
								.collect_view()
						}}
					</ul>
				</div>
				{details}
			</div>
		</ErrorBoundary>
	}
}
