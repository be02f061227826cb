use std::collections::HashMap;

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::config::LayoutConfig;
use super::layout::{LayoutStrategy, compute_layout};
use super::simulation::ForceSimulation;
use super::types::{GraphNode, KnowledgeGraph, Point, Positions};

/// Extra world-space slack around a node for hit testing.
pub const HIT_PADDING: f64 = 4.0;

/// Pointer travel (screen px) below which a press counts as a click.
const CLICK_SLOP: f64 = 3.0;

pub fn node_radius(node: &GraphNode) -> f64 {
	node.size / 2.0
}

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Point,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Pause before a fresh hover starts to light up, in seconds.
const HOVER_DWELL: f64 = 0.08;
/// Exponential rates (per second) of the highlight fade.
const FADE_IN_RATE: f64 = 1.8;
const FADE_OUT_RATE: f64 = 1.26;

/// A hovered node and the nodes one edge away from it.
#[derive(Clone, Debug)]
pub struct Highlight {
	pub node: String,
	/// Neighbour id to the strongest edge weight linking it to `node`.
	pub neighbors: HashMap<String, f64>,
}

impl Highlight {
	fn around(graph: &KnowledgeGraph, node: String) -> Self {
		let mut neighbors = HashMap::new();
		for edge in &graph.edges {
			if let Some(other) = edge.other(&node) {
				let w = neighbors.entry(other.to_string()).or_insert(edge.weight);
				*w = w.max(edge.weight);
			}
		}
		Self { node, neighbors }
	}

	fn covers(&self, id: &str) -> bool {
		self.node == id || self.neighbors.contains_key(id)
	}
}

/// The live highlight, or the one fading out after the pointer left it.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub current: Option<Highlight>,
	pub fading: Option<Highlight>,
	/// 0 (no highlight) to 1 (fully lit).
	pub strength: f64,
	dwell: f64,
}

impl HoverState {
	/// The highlight being drawn, live or fading.
	pub fn shown(&self) -> Option<&Highlight> {
		self.current.as_ref().or(self.fading.as_ref())
	}

	fn hovered_id(&self) -> Option<&str> {
		self.current.as_ref().map(|h| h.node.as_str())
	}

	fn advance(&mut self, dt: f64) {
		if self.current.is_some() {
			self.dwell = (self.dwell + dt).min(HOVER_DWELL);
			if self.dwell >= HOVER_DWELL {
				self.strength = approach(self.strength, 1.0, FADE_IN_RATE, dt);
			}
			return;
		}
		self.strength = approach(self.strength, 0.0, FADE_OUT_RATE, dt);
		if self.strength < 0.01 {
			self.strength = 0.0;
			self.fading = None;
		}
	}
}

/// Move `value` towards `target` by the fraction `1 - e^(-rate·dt)`.
fn approach(value: f64, target: f64, rate: f64, dt: f64) -> f64 {
	value + (target - value) * (1.0 - (-rate * dt).exp())
}

/// Everything the canvas needs between frames. Owns the only live layout;
/// replacing it drops any simulation still in progress.
pub struct GraphViewState {
	pub graph: KnowledgeGraph,
	pub positions: Positions,
	pub strategy: LayoutStrategy,
	pub config: LayoutConfig,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	simulation: Option<ForceSimulation>,
}

impl GraphViewState {
	pub fn new(width: f64, height: f64, config: LayoutConfig) -> Self {
		Self {
			graph: KnowledgeGraph::default(),
			positions: Positions::new(),
			strategy: LayoutStrategy::default(),
			config,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			simulation: None,
		}
	}

	pub fn set_graph(&mut self, graph: KnowledgeGraph, strategy: LayoutStrategy, seed: u64) {
		self.graph = graph;
		self.strategy = strategy;
		self.hover = HoverState::default();
		self.drag = DragState::default();
		self.relayout(seed);
	}

	/// Recompute positions from scratch. Force layouts start from their
	/// random seed positions and settle over the following ticks.
	pub fn relayout(&mut self, seed: u64) {
		let mut rng = ChaCha8Rng::seed_from_u64(seed);
		if self.strategy == LayoutStrategy::Force && !self.graph.is_empty() {
			let sim =
				ForceSimulation::new(&self.graph, self.width, self.height, &self.config, &mut rng);
			self.positions = sim.positions();
			self.simulation = Some(sim);
		} else {
			self.positions = compute_layout(
				&self.graph,
				self.width,
				self.height,
				self.strategy,
				&self.config,
				&mut rng,
			);
			self.simulation = None;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64, seed: u64) {
		self.width = width;
		self.height = height;
		self.relayout(seed);
	}

	pub fn is_settling(&self) -> bool {
		self.simulation.is_some()
	}

	pub fn position(&self, id: &str) -> Option<Point> {
		self.positions.get(id).copied()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under the screen point; later nodes are drawn on top.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let cursor = Point::new(gx, gy);
		self.graph
			.nodes
			.iter()
			.rev()
			.find(|node| {
				self.position(&node.id)
					.is_some_and(|p| p.distance(cursor) < node_radius(node) + HIT_PADDING)
			})
			.map(|node| node.id.clone())
	}

	pub fn set_hover(&mut self, node: Option<String>) {
		if self.hover.hovered_id() == node.as_deref() {
			return;
		}
		let previous = self.hover.current.take();
		match node {
			Some(id) => {
				if previous.is_none() {
					self.hover.dwell = 0.0;
				}
				// Jumping straight to another node drops the old highlight
				self.hover.fading = None;
				self.hover.current = Some(Highlight::around(&self.graph, id));
			}
			None => self.hover.fading = previous,
		}
	}

	pub fn is_highlighted(&self, id: &str) -> bool {
		self.hover.shown().is_some_and(|h| h.covers(id))
	}

	pub fn is_hovered(&self, id: &str) -> bool {
		self.hover.shown().is_some_and(|h| h.node == id)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.shown().is_some()
	}

	/// Weight of the strongest edge between `id` and the highlighted node.
	pub fn link_weight(&self, id: &str) -> Option<f64> {
		self.hover.shown()?.neighbors.get(id).copied()
	}

	/// Press on a node or on the background.
	pub fn press(&mut self, x: f64, y: f64) {
		match self.node_at_position(x, y) {
			Some(id) => {
				let node_start = self.position(&id).unwrap_or_default();
				self.drag = DragState {
					active: true,
					node: Some(id),
					start_x: x,
					start_y: y,
					node_start,
					moved: false,
				};
			}
			None => {
				self.pan = PanState {
					active: true,
					start_x: x,
					start_y: y,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
			}
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
			if !self.drag.moved && dx.hypot(dy) < CLICK_SLOP {
				return;
			}
			if !self.drag.moved {
				self.drag.moved = true;
				// Hand-placed nodes win over the simulation
				if let Some(sim) = self.simulation.take() {
					debug!("force layout interrupted by drag after {} iterations", sim.iteration());
				}
			}
			if let Some(id) = &self.drag.node {
				let p = Point::new(
					self.drag.node_start.x + dx / self.transform.k,
					self.drag.node_start.y + dy / self.transform.k,
				);
				self.positions.insert(id.clone(), p);
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// End any drag or pan. Returns the node id when the press was a click.
	pub fn release(&mut self) -> Option<String> {
		let clicked = if self.drag.active && !self.drag.moved {
			self.drag.node.clone()
		} else {
			None
		};
		self.drag = DragState::default();
		self.pan.active = false;
		clicked
	}

	pub fn leave(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.set_hover(None);
	}

	/// Zoom by one wheel notch around the cursor.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f64) {
		let finished = match &mut self.simulation {
			Some(sim) => {
				sim.run(self.config.iterations_per_frame);
				sim.write_positions(&mut self.positions);
				sim.is_finished()
			}
			None => false,
		};
		if finished {
			self.simulation = None;
		}

		self.hover.advance(dt);
	}
}
