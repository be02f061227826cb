//! Derives a knowledge graph from documents by keyword matching.

use std::collections::HashSet;

use log::debug;
use rand::Rng;

use super::config::BuilderConfig;
use super::types::{Document, GraphEdge, GraphNode, KnowledgeGraph, NodeCategory, RelationKind};

/// Lowercase label with whitespace runs collapsed to `-`.
pub fn normalize_label(label: &str) -> String {
	label
		.split_whitespace()
		.map(str::to_lowercase)
		.collect::<Vec<_>>()
		.join("-")
}

pub struct GraphBuilder {
	config: BuilderConfig,
}

impl Default for GraphBuilder {
	fn default() -> Self {
		Self::new(BuilderConfig::default())
	}
}

impl GraphBuilder {
	pub fn new(config: BuilderConfig) -> Self {
		Self { config }
	}

	/// Build a fresh graph. Only the `related` edges and the edge weights
	/// depend on `rng`; the node set is a pure function of `documents`.
	pub fn build<R: Rng>(&self, documents: &[Document], rng: &mut R) -> KnowledgeGraph {
		let mut graph = KnowledgeGraph::default();
		let mut known = HashSet::new();
		let mut edge_seq = 0usize;
		let mut next_edge_id = || {
			edge_seq += 1;
			format!("edge-{edge_seq}")
		};

		for doc in documents {
			let doc_id = format!("doc-{}", doc.id);
			graph
				.nodes
				.push(GraphNode::new(doc_id.clone(), doc.name.clone(), NodeCategory::Document));

			let content = doc.content.to_lowercase();
			let matches = [
				(
					NodeCategory::Concept,
					&self.config.concepts,
					self.config.max_concepts_per_document,
					RelationKind::Contains,
					&self.config.contains_weight,
				),
				(
					NodeCategory::Entity,
					&self.config.entities,
					self.config.max_entities_per_document,
					RelationKind::Mentions,
					&self.config.mentions_weight,
				),
			];

			for (category, terms, cap, kind, weight) in matches {
				let found = terms
					.iter()
					.filter(|term| content.contains(&term.to_lowercase()))
					.take(cap);
				for term in found {
					let node_id = format!("{}-{}", category.as_str(), normalize_label(term));
					if known.insert(node_id.clone()) {
						graph
							.nodes
							.push(GraphNode::new(node_id.clone(), term.clone(), category));
					}
					graph.edges.push(GraphEdge {
						id: next_edge_id(),
						source: doc_id.clone(),
						target: node_id,
						weight: rng.gen_range(weight.clone()),
						kind,
					});
				}
			}
		}

		let concepts: Vec<String> = graph
			.nodes
			.iter()
			.filter(|n| n.category == NodeCategory::Concept)
			.map(|n| n.id.clone())
			.collect();
		for (i, source) in concepts.iter().enumerate() {
			for target in &concepts[i + 1..] {
				if rng.gen_bool(self.config.related_probability) {
					graph.edges.push(GraphEdge {
						id: next_edge_id(),
						source: source.clone(),
						target: target.clone(),
						weight: rng.gen_range(self.config.related_weight.clone()),
						kind: RelationKind::Related,
					});
				}
			}
		}

		graph.recount_connections();
		debug!(
			"built graph from {} documents: {} nodes, {} edges",
			documents.len(),
			graph.nodes.len(),
			graph.edges.len()
		);
		graph
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	use super::*;

	fn scenario() -> Vec<Document> {
		vec![
			Document::new("1", "Survey", "An intro to Machine Learning with BERT."),
			Document::new("2", "Notes", "Neural Networks from scratch."),
		]
	}

	fn build(docs: &[Document], seed: u64) -> KnowledgeGraph {
		GraphBuilder::default().build(docs, &mut ChaCha8Rng::seed_from_u64(seed))
	}

	#[test]
	fn two_document_scenario() {
		let graph = build(&scenario(), 7);
		assert_eq!(graph.count(NodeCategory::Document), 2);
		assert_eq!(graph.count(NodeCategory::Concept), 2);
		assert_eq!(graph.count(NodeCategory::Entity), 1);
		assert!(graph.node("concept-machine-learning").is_some());
		assert!(graph.node("concept-neural-networks").is_some());
		assert_eq!(graph.node("entity-bert").map(|n| n.label.as_str()), Some("BERT"));

		let direct: Vec<&GraphEdge> = graph
			.edges
			.iter()
			.filter(|e| matches!(e.kind, RelationKind::Contains | RelationKind::Mentions))
			.collect();
		assert_eq!(direct.len(), 3);
		assert!(direct.iter().all(|e| e.source.starts_with("doc-")));

		let related = graph.edges.len() - direct.len();
		assert!(related <= 1);
		assert!(graph.validate().is_ok());
	}

	#[test]
	fn empty_input_gives_empty_graph() {
		let graph = build(&[], 1);
		assert!(graph.nodes.is_empty());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn matching_is_case_insensitive_and_deduplicated() {
		let docs = vec![
			Document::new("a", "A", "machine learning at GOOGLE"),
			Document::new("b", "B", "MACHINE LEARNING, again"),
		];
		let graph = build(&docs, 3);
		assert_eq!(graph.count(NodeCategory::Concept), 1);
		assert_eq!(graph.count(NodeCategory::Entity), 1);
		let ml = graph.node("concept-machine-learning").unwrap();
		assert_eq!(ml.connections, 2);
	}

	#[test]
	fn caps_matches_per_document() {
		let content = CONCEPTS_AND_ENTITIES.join(" ");
		let graph = build(&[Document::new("x", "All", content)], 11);
		assert_eq!(graph.count(NodeCategory::Concept), 5);
		assert_eq!(graph.count(NodeCategory::Entity), 3);
	}

	const CONCEPTS_AND_ENTITIES: &[&str] = &[
		"Machine Learning",
		"Deep Learning",
		"Computer Vision",
		"Data Science",
		"Statistics",
		"Knowledge Graph",
		"OpenAI",
		"Google",
		"Microsoft",
		"Stanford",
	];

	#[test]
	fn node_set_is_stable_across_seeds() {
		let docs = scenario();
		let ids = |g: &KnowledgeGraph| g.nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>();
		assert_eq!(ids(&build(&docs, 1)), ids(&build(&docs, 2)));
	}

	#[test]
	fn same_seed_reproduces_edges() {
		let docs = scenario();
		assert_eq!(build(&docs, 42), build(&docs, 42));
	}

	#[test]
	fn weights_stay_in_configured_ranges() {
		let docs = vec![Document::new(
			"w",
			"Wide",
			"Deep Learning, Data Science, Statistics, Computer Vision and BERT",
		)];
		let graph = build(&docs, 5);
		for edge in &graph.edges {
			let range = match edge.kind {
				RelationKind::Contains => 0.5..1.0,
				RelationKind::Mentions => 0.4..0.8,
				RelationKind::Related => 0.2..0.6,
				RelationKind::Similar => unreachable!(),
			};
			assert!(range.contains(&edge.weight), "{edge:?}");
		}
	}

	#[test]
	fn normalizes_labels() {
		assert_eq!(
			normalize_label("  Natural   Language Processing "),
			"natural-language-processing"
		);
	}

	/// One document per concept term, so no per-document cap applies.
	fn every_concept(config: &BuilderConfig) -> Vec<Document> {
		config
			.concepts
			.iter()
			.enumerate()
			.map(|(i, term)| Document::new(i.to_string(), term.clone(), term.clone()))
			.collect()
	}

	fn related_pairs(graph: &KnowledgeGraph) -> Vec<(&str, &str)> {
		graph
			.edges
			.iter()
			.filter(|e| e.kind == RelationKind::Related)
			.map(|e| (e.source.as_str(), e.target.as_str()))
			.collect()
	}

	#[test]
	fn certain_probability_links_every_concept_pair_once() {
		let config = BuilderConfig {
			related_probability: 1.0,
			..BuilderConfig::default()
		};
		let docs = every_concept(&config);
		let graph = GraphBuilder::new(config).build(&docs, &mut ChaCha8Rng::seed_from_u64(8));
		let concepts = graph.count(NodeCategory::Concept);
		assert_eq!(concepts, 12);

		let pairs = related_pairs(&graph);
		assert_eq!(pairs.len(), concepts * (concepts - 1) / 2);
		let unordered: HashSet<(&str, &str)> = pairs
			.iter()
			.map(|&(s, t)| if s < t { (s, t) } else { (t, s) })
			.collect();
		assert_eq!(unordered.len(), pairs.len());
		for (s, t) in pairs {
			assert_ne!(s, t);
			assert!(s.starts_with("concept-") && t.starts_with("concept-"));
		}
		assert!(graph.validate().is_ok());
	}

	#[test]
	fn zero_probability_adds_no_related_edges() {
		let config = BuilderConfig {
			related_probability: 0.0,
			..BuilderConfig::default()
		};
		let docs = every_concept(&config);
		let graph = GraphBuilder::new(config).build(&docs, &mut ChaCha8Rng::seed_from_u64(8));
		assert!(related_pairs(&graph).is_empty());
	}

	#[test]
	fn related_edges_follow_configured_probability() {
		let docs = every_concept(&BuilderConfig::default());
		let (mut related, mut pairs) = (0usize, 0usize);
		for seed in 0..100 {
			let graph = build(&docs, seed);
			let concepts = graph.count(NodeCategory::Concept);
			pairs += concepts * (concepts - 1) / 2;
			related += related_pairs(&graph).len();
		}
		// 6600 trials at p = 0.3; a standard deviation is about 0.006
		let ratio = related as f64 / pairs as f64;
		assert!((0.27..0.33).contains(&ratio), "related ratio {ratio}");
	}
}
