use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),

	#[error("edge `{edge}` references missing node `{node}`")]
	DanglingEdge { edge: String, node: String },

	#[error("unknown variant `{0}`")]
	UnknownVariant(String),

	#[error("failed to serialize graph: {0}")]
	Serialize(#[from] serde_json::Error),

	/// Browser API failure, carrying the JS error rendered as text.
	#[error("browser error: {0}")]
	Browser(String),
}

impl From<wasm_bindgen::JsValue> for GraphError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		GraphError::Browser(format!("{value:?}"))
	}
}
