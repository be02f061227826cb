use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::Rng;

use super::config::LayoutConfig;
use super::error::GraphError;
use super::simulation::ForceSimulation;
use super::types::{KnowledgeGraph, NodeCategory, Point, Positions};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutStrategy {
	Circular,
	Hierarchical,
	#[default]
	Force,
}

impl LayoutStrategy {
	pub const ALL: [LayoutStrategy; 3] = [
		LayoutStrategy::Force,
		LayoutStrategy::Circular,
		LayoutStrategy::Hierarchical,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			LayoutStrategy::Circular => "circular",
			LayoutStrategy::Hierarchical => "hierarchical",
			LayoutStrategy::Force => "force",
		}
	}
}

impl fmt::Display for LayoutStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LayoutStrategy {
	type Err = GraphError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		LayoutStrategy::ALL
			.into_iter()
			.find(|l| l.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| GraphError::UnknownVariant(s.to_string()))
	}
}

/// Vertical band of a category in the hierarchical layout, as a fraction of
/// the canvas height. Topics sit between documents and concepts.
pub fn band(category: NodeCategory) -> f64 {
	match category {
		NodeCategory::Document => 0.2,
		NodeCategory::Topic => 0.35,
		NodeCategory::Concept => 0.5,
		NodeCategory::Entity => 0.8,
	}
}

pub fn circular(
	graph: &KnowledgeGraph,
	width: f64,
	height: f64,
	config: &LayoutConfig,
) -> Positions {
	let n = graph.nodes.len() as f64;
	let (cx, cy) = (width / 2.0, height / 2.0);
	let radius = config.circle_radius_ratio * width.min(height);
	graph
		.nodes
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let angle = 2.0 * PI * i as f64 / n;
			(
				node.id.clone(),
				Point::new(cx + radius * angle.cos(), cy + radius * angle.sin()),
			)
		})
		.collect()
}

pub fn hierarchical(graph: &KnowledgeGraph, width: f64, height: f64) -> Positions {
	let mut totals: HashMap<NodeCategory, usize> = HashMap::new();
	for node in &graph.nodes {
		*totals.entry(node.category).or_default() += 1;
	}
	let mut seen: HashMap<NodeCategory, usize> = HashMap::new();
	graph
		.nodes
		.iter()
		.map(|node| {
			let slot = seen.entry(node.category).or_default();
			*slot += 1;
			let count = totals[&node.category] as f64;
			let x = width * *slot as f64 / (count + 1.0);
			(node.id.clone(), Point::new(x, height * band(node.category)))
		})
		.collect()
}

/// Position every node of `graph`. Only the force strategy consumes `rng`.
pub fn compute_layout<R: Rng>(
	graph: &KnowledgeGraph,
	width: f64,
	height: f64,
	strategy: LayoutStrategy,
	config: &LayoutConfig,
	rng: &mut R,
) -> Positions {
	debug!("{strategy} layout of {} nodes on {width}x{height}", graph.nodes.len());
	match strategy {
		LayoutStrategy::Circular => circular(graph, width, height, config),
		LayoutStrategy::Hierarchical => hierarchical(graph, width, height),
		LayoutStrategy::Force => {
			ForceSimulation::new(graph, width, height, config, rng).run_to_completion()
		}
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	use super::*;
	use crate::components::knowledge_graph::types::GraphNode;

	fn nodes(categories: &[NodeCategory]) -> KnowledgeGraph {
		KnowledgeGraph {
			nodes: categories
				.iter()
				.enumerate()
				.map(|(i, &c)| GraphNode::new(format!("n{i}"), format!("N{i}"), c))
				.collect(),
			edges: vec![],
		}
	}

	fn layout(graph: &KnowledgeGraph, strategy: LayoutStrategy, seed: u64) -> Positions {
		compute_layout(
			graph,
			800.0,
			600.0,
			strategy,
			&LayoutConfig::default(),
			&mut ChaCha8Rng::seed_from_u64(seed),
		)
	}

	#[test]
	fn circular_nodes_sit_on_the_radius() {
		let g = nodes(&[NodeCategory::Concept; 7]);
		let center = Point::new(400.0, 300.0);
		for p in layout(&g, LayoutStrategy::Circular, 0).values() {
			assert!((p.distance(center) - 180.0).abs() < 1e-9);
		}
	}

	#[test]
	fn circular_first_node_is_at_angle_zero() {
		let g = nodes(&[NodeCategory::Concept; 4]);
		let p = layout(&g, LayoutStrategy::Circular, 0)["n0"];
		assert_eq!(p, Point::new(580.0, 300.0));
	}

	#[test]
	fn hierarchical_uses_category_bands() {
		let g = nodes(&[
			NodeCategory::Document,
			NodeCategory::Concept,
			NodeCategory::Concept,
			NodeCategory::Entity,
			NodeCategory::Topic,
		]);
		let pos = layout(&g, LayoutStrategy::Hierarchical, 0);
		let close = |id: &str, x: f64, y: f64| {
			let p = pos[id];
			(p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9
		};
		assert!(close("n0", 400.0, 120.0));
		assert!(close("n1", 800.0 / 3.0, 300.0));
		assert!(close("n2", 1600.0 / 3.0, 300.0));
		assert!(close("n3", 400.0, 480.0));
		assert!(close("n4", 400.0, 210.0));
	}

	#[test]
	fn analytic_layouts_are_deterministic() {
		let g = nodes(&[NodeCategory::Document, NodeCategory::Entity, NodeCategory::Concept]);
		for strategy in [LayoutStrategy::Circular, LayoutStrategy::Hierarchical] {
			assert_eq!(layout(&g, strategy, 1), layout(&g, strategy, 2));
		}
	}

	#[test]
	fn seeded_force_layout_is_reproducible() {
		let g = nodes(&[NodeCategory::Document, NodeCategory::Concept, NodeCategory::Entity]);
		assert_eq!(
			layout(&g, LayoutStrategy::Force, 17),
			layout(&g, LayoutStrategy::Force, 17)
		);
	}

	#[test]
	fn empty_graph_yields_no_positions() {
		let g = KnowledgeGraph::default();
		for strategy in LayoutStrategy::ALL {
			assert!(layout(&g, strategy, 0).is_empty());
		}
	}

	#[test]
	fn strategy_round_trips_through_str() {
		for strategy in LayoutStrategy::ALL {
			assert_eq!(strategy.to_string().parse::<LayoutStrategy>().unwrap(), strategy);
		}
		assert!("spiral".parse::<LayoutStrategy>().is_err());
	}

	fn category() -> impl Strategy<Value = NodeCategory> {
		prop::sample::select(NodeCategory::ALL.to_vec())
	}

	proptest! {
		#[test]
		fn every_node_gets_a_position(
			cats in proptest::collection::vec(category(), 0..30),
			seed in any::<u64>(),
		) {
			let g = nodes(&cats);
			for strategy in LayoutStrategy::ALL {
				let pos = layout(&g, strategy, seed);
				prop_assert_eq!(pos.len(), g.nodes.len());
				for node in &g.nodes {
					prop_assert!(pos.contains_key(&node.id));
				}
			}
		}
	}
}
