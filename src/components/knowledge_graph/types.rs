use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::GraphError;

/// Kind of entity a node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
	Document,
	Concept,
	Entity,
	Topic,
}

impl NodeCategory {
	pub const ALL: [NodeCategory; 4] = [
		NodeCategory::Document,
		NodeCategory::Concept,
		NodeCategory::Entity,
		NodeCategory::Topic,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			NodeCategory::Document => "document",
			NodeCategory::Concept => "concept",
			NodeCategory::Entity => "entity",
			NodeCategory::Topic => "topic",
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			NodeCategory::Document => "#3b82f6",
			NodeCategory::Concept => "#10b981",
			NodeCategory::Entity => "#f59e0b",
			NodeCategory::Topic => "#8b5cf6",
		}
	}

	/// Size hint used for the rendered radius.
	pub fn size(self) -> f64 {
		match self {
			NodeCategory::Document => 20.0,
			NodeCategory::Concept => 15.0,
			NodeCategory::Entity => 12.0,
			NodeCategory::Topic => 18.0,
		}
	}
}

impl fmt::Display for NodeCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NodeCategory {
	type Err = GraphError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		NodeCategory::ALL
			.into_iter()
			.find(|c| c.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| GraphError::UnknownVariant(s.to_string()))
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
	Related,
	Mentions,
	Contains,
	Similar,
}

impl RelationKind {
	/// Related and similar edges are drawn dashed.
	pub fn is_dashed(self) -> bool {
		matches!(self, RelationKind::Related | RelationKind::Similar)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	#[serde(rename = "type")]
	pub category: NodeCategory,
	pub size: f64,
	pub color: String,
	pub connections: usize,
}

impl GraphNode {
	pub fn new(id: impl Into<String>, label: impl Into<String>, category: NodeCategory) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			category,
			size: category.size(),
			color: category.color().to_string(),
			connections: 0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub weight: f64,
	#[serde(rename = "type")]
	pub kind: RelationKind,
}

impl GraphEdge {
	/// The endpoint opposite `id`, if this edge touches it.
	pub fn other(&self, id: &str) -> Option<&str> {
		if self.source == id {
			Some(&self.target)
		} else if self.target == id {
			Some(&self.source)
		} else {
			None
		}
	}
}

/// One snapshot of the graph: rebuilt from scratch, never persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Map of node id to its index in `nodes`.
	pub fn index(&self) -> HashMap<&str, usize> {
		self.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect()
	}

	/// Ids of the nodes sharing an edge with `id`, in edge order.
	pub fn neighbors(&self, id: &str) -> Vec<&str> {
		let mut seen = HashSet::new();
		self.edges
			.iter()
			.filter_map(|e| e.other(id))
			.filter(|other| seen.insert(*other))
			.collect()
	}

	pub fn count(&self, category: NodeCategory) -> usize {
		self.nodes.iter().filter(|n| n.category == category).count()
	}

	pub fn recount_connections(&mut self) {
		let mut counts: HashMap<&str, usize> = HashMap::new();
		for edge in &self.edges {
			*counts.entry(edge.source.as_str()).or_default() += 1;
			*counts.entry(edge.target.as_str()).or_default() += 1;
		}
		for node in &mut self.nodes {
			node.connections = counts.get(node.id.as_str()).copied().unwrap_or(0);
		}
	}

	/// Strict check for duplicate ids and dangling edges.
	///
	/// Layout and rendering never call this; they skip dangling edges.
	pub fn validate(&self) -> Result<(), GraphError> {
		let mut ids = HashSet::new();
		for node in &self.nodes {
			if !ids.insert(node.id.as_str()) {
				return Err(GraphError::DuplicateNode(node.id.clone()));
			}
		}
		for edge in &self.edges {
			for endpoint in [&edge.source, &edge.target] {
				if !ids.contains(endpoint.as_str()) {
					return Err(GraphError::DanglingEdge {
						edge: edge.id.clone(),
						node: endpoint.clone(),
					});
				}
			}
		}
		Ok(())
	}
}

/// Input document as handed over by the document panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
	pub id: String,
	pub name: String,
	pub content: String,
}

impl Document {
	pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			content: content.into(),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
	}
}

/// Node id to canvas coordinate, valid for one layout computation.
pub type Positions = HashMap<String, Point>;
