use log::info;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::error::GraphError;
use super::types::KnowledgeGraph;

pub const EXPORT_FILE_NAME: &str = "knowledge_graph.json";

/// Pretty JSON with top-level `nodes` and `edges` arrays.
pub fn to_json(graph: &KnowledgeGraph) -> Result<String, GraphError> {
	Ok(serde_json::to_string_pretty(graph)?)
}

/// Hand the graph to the browser as a `knowledge_graph.json` download.
pub fn download_json(graph: &KnowledgeGraph) -> Result<(), GraphError> {
	let json = to_json(graph)?;
	let parts = js_sys::Array::of1(&JsValue::from_str(&json));
	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| GraphError::Browser("no document".into()))?;
	let anchor: HtmlAnchorElement = document
		.create_element("a")?
		.dyn_into()
		.map_err(|_| GraphError::Browser("anchor cast failed".into()))?;
	anchor.set_href(&url);
	anchor.set_download(EXPORT_FILE_NAME);
	anchor.click();
	Url::revoke_object_url(&url)?;

	info!(
		"exported {} nodes and {} edges to {EXPORT_FILE_NAME}",
		graph.nodes.len(),
		graph.edges.len()
	);
	Ok(())
}
