use std::collections::HashSet;

use super::types::{KnowledgeGraph, NodeCategory};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
	#[default]
	All,
	Only(NodeCategory),
}

impl CategoryFilter {
	pub fn matches(self, category: NodeCategory) -> bool {
		match self {
			CategoryFilter::All => true,
			CategoryFilter::Only(c) => c == category,
		}
	}

	/// Value used by the category `<select>`.
	pub fn as_str(self) -> &'static str {
		match self {
			CategoryFilter::All => "all",
			CategoryFilter::Only(c) => c.as_str(),
		}
	}

	pub fn parse(value: &str) -> Self {
		value.parse::<NodeCategory>().map(CategoryFilter::Only).unwrap_or_default()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphFilter {
	pub search: String,
	pub category: CategoryFilter,
}

impl GraphFilter {
	pub fn is_active(&self) -> bool {
		!self.search.trim().is_empty() || self.category != CategoryFilter::All
	}

	/// Subgraph of matching nodes and the edges between them. Connection
	/// counts keep their full-graph values.
	pub fn apply(&self, graph: &KnowledgeGraph) -> KnowledgeGraph {
		let needle = self.search.trim().to_lowercase();
		let nodes: Vec<_> = graph
			.nodes
			.iter()
			.filter(|n| self.category.matches(n.category))
			.filter(|n| needle.is_empty() || n.label.to_lowercase().contains(&needle))
			.cloned()
			.collect();
		let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		let edges = graph
			.edges
			.iter()
			.filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
			.cloned()
			.collect();
		KnowledgeGraph { nodes, edges }
	}
}
