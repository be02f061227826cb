use std::ops::Range;

/// Concept terms matched against document content.
pub const CONCEPT_TERMS: &[&str] = &[
	"Machine Learning",
	"Artificial Intelligence",
	"Neural Networks",
	"Deep Learning",
	"Natural Language Processing",
	"Computer Vision",
	"Data Science",
	"Knowledge Graph",
	"Reinforcement Learning",
	"Transformer",
	"Information Retrieval",
	"Statistics",
];

/// Named entities matched against document content.
pub const ENTITY_TERMS: &[&str] = &[
	"OpenAI",
	"Google",
	"Microsoft",
	"Stanford",
	"DeepMind",
	"BERT",
	"GPT",
	"PyTorch",
	"TensorFlow",
];

/// Canvas size used when neither a prop nor the parent element gives one.
pub const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Parameters of the graph data builder.
#[derive(Clone, Debug)]
pub struct BuilderConfig {
	pub concepts: Vec<String>,
	pub entities: Vec<String>,
	pub max_concepts_per_document: usize,
	pub max_entities_per_document: usize,
	pub contains_weight: Range<f64>,
	pub mentions_weight: Range<f64>,
	/// Chance of a `related` edge between any two concepts.
	pub related_probability: f64,
	pub related_weight: Range<f64>,
}

impl Default for BuilderConfig {
	fn default() -> Self {
		Self {
			concepts: CONCEPT_TERMS.iter().map(|s| s.to_string()).collect(),
			entities: ENTITY_TERMS.iter().map(|s| s.to_string()).collect(),
			max_concepts_per_document: 5,
			max_entities_per_document: 3,
			contains_weight: 0.5..1.0,
			mentions_weight: 0.4..0.8,
			related_probability: 0.3,
			related_weight: 0.2..0.6,
		}
	}
}

/// Parameters of the layout engine and the force simulation.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Force layouts keep nodes this far from every canvas edge.
	pub margin: f64,
	pub circle_radius_ratio: f64,
	pub repulsion: f64,
	/// Share of the repulsion force applied per pair and iteration.
	pub repulsion_strength: f64,
	pub attraction: f64,
	pub max_iterations: usize,
	/// Stop early once the mean node displacement of one iteration falls
	/// below this value. `None` always runs `max_iterations`.
	pub energy_threshold: Option<f64>,
	/// Simulation iterations run per animation frame in the canvas view.
	pub iterations_per_frame: usize,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			margin: 50.0,
			circle_radius_ratio: 0.3,
			repulsion: 1000.0,
			repulsion_strength: 0.1,
			attraction: 0.01,
			max_iterations: 50,
			energy_threshold: Some(0.05),
			iterations_per_frame: 5,
		}
	}
}
