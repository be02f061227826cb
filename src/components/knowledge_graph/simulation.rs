//! Force-directed layout: all-pairs repulsion plus weighted springs along
//! edges, clamped to the canvas.
//!
//! The simulation is a stepper so the canvas can spread the O(N²) work over
//! several animation frames. It stops at `max_iterations` or once an
//! iteration moves nodes less than `energy_threshold` on average.

use log::debug;
use rand::Rng;

use super::config::LayoutConfig;
use super::types::{KnowledgeGraph, Point, Positions};

pub struct ForceSimulation {
	ids: Vec<String>,
	points: Vec<Point>,
	/// (source index, target index, weight); dangling edges are dropped.
	springs: Vec<(usize, usize, f64)>,
	width: f64,
	height: f64,
	config: LayoutConfig,
	iteration: usize,
	settled: bool,
}

impl ForceSimulation {
	pub fn new<R: Rng>(
		graph: &KnowledgeGraph,
		width: f64,
		height: f64,
		config: &LayoutConfig,
		rng: &mut R,
	) -> Self {
		let margin = config.margin;
		let index = graph.index();
		let points = graph
			.nodes
			.iter()
			.map(|_| Point::new(sample(rng, margin, width), sample(rng, margin, height)))
			.collect();
		let springs = graph
			.edges
			.iter()
			.filter_map(|e| {
				let (&s, &t) = (index.get(e.source.as_str())?, index.get(e.target.as_str())?);
				Some((s, t, e.weight))
			})
			.collect();

		Self {
			ids: graph.nodes.iter().map(|n| n.id.clone()).collect(),
			points,
			springs,
			width,
			height,
			config: config.clone(),
			iteration: 0,
			settled: false,
		}
	}

	pub fn iteration(&self) -> usize {
		self.iteration
	}

	pub fn is_finished(&self) -> bool {
		self.settled || self.iteration >= self.config.max_iterations
	}

	/// Run one iteration and return the mean node displacement.
	pub fn step(&mut self) -> f64 {
		if self.is_finished() || self.points.is_empty() {
			self.settled = true;
			return 0.0;
		}
		let before = self.points.clone();
		let n = self.points.len();
		let cfg = &self.config;

		for i in 0..n {
			for j in 0..n {
				if i == j {
					continue;
				}
				let (pi, pj) = (self.points[i], self.points[j]);
				let (dx, dy) = (pi.x - pj.x, pi.y - pj.y);
				let dist = guard(dx, dy);
				let force = cfg.repulsion / (dist * dist);
				self.points[i].x += dx / dist * force * cfg.repulsion_strength;
				self.points[i].y += dy / dist * force * cfg.repulsion_strength;
			}
		}

		for &(s, t, weight) in &self.springs {
			if s == t {
				continue;
			}
			let (ps, pt) = (self.points[s], self.points[t]);
			let (dx, dy) = (pt.x - ps.x, pt.y - ps.y);
			let dist = guard(dx, dy);
			let force = dist * cfg.attraction * weight;
			let (fx, fy) = (dx / dist * force, dy / dist * force);
			self.points[s].x += fx;
			self.points[s].y += fy;
			self.points[t].x -= fx;
			self.points[t].y -= fy;
		}

		let margin = cfg.margin;
		let (max_x, max_y) = (upper(margin, self.width), upper(margin, self.height));
		for p in &mut self.points {
			p.x = p.x.clamp(margin, max_x);
			p.y = p.y.clamp(margin, max_y);
		}

		self.iteration += 1;
		let moved = before
			.iter()
			.zip(&self.points)
			.map(|(a, b)| a.distance(*b))
			.sum::<f64>()
			/ n as f64;
		if let Some(threshold) = cfg.energy_threshold {
			if moved < threshold {
				self.settled = true;
			}
		}
		moved
	}

	/// Run at most `budget` iterations; returns how many ran.
	pub fn run(&mut self, budget: usize) -> usize {
		let mut ran = 0;
		while ran < budget && !self.is_finished() {
			self.step();
			ran += 1;
		}
		if self.is_finished() {
			debug!(
				"force layout of {} nodes finished after {} iterations",
				self.points.len(),
				self.iteration
			);
		}
		ran
	}

	pub fn run_to_completion(&mut self) -> Positions {
		self.run(usize::MAX);
		self.positions()
	}

	pub fn positions(&self) -> Positions {
		self.ids.iter().cloned().zip(self.points.iter().copied()).collect()
	}

	/// Copy current coordinates into `positions` without reallocating keys.
	pub fn write_positions(&self, positions: &mut Positions) {
		for (id, p) in self.ids.iter().zip(&self.points) {
			match positions.get_mut(id) {
				Some(slot) => *slot = *p,
				None => {
					positions.insert(id.clone(), *p);
				}
			}
		}
	}
}

/// Coincident nodes are treated as one unit apart.
fn guard(dx: f64, dy: f64) -> f64 {
	let dist = (dx * dx + dy * dy).sqrt();
	if dist == 0.0 { 1.0 } else { dist }
}

/// Upper clamp bound; a canvas narrower than two margins collapses to the margin.
fn upper(margin: f64, extent: f64) -> f64 {
	(extent - margin).max(margin)
}

fn sample<R: Rng>(rng: &mut R, margin: f64, extent: f64) -> f64 {
	let hi = upper(margin, extent);
	if hi > margin {
		rng.gen_range(margin..hi)
	} else {
		margin
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	use super::*;
	use crate::components::knowledge_graph::types::{
		GraphEdge, GraphNode, NodeCategory, RelationKind,
	};

	fn graph(n: usize, edges: &[(usize, usize)]) -> KnowledgeGraph {
		KnowledgeGraph {
			nodes: (0..n)
				.map(|i| {
					GraphNode::new(format!("n{i}"), format!("Node {i}"), NodeCategory::Concept)
				})
				.collect(),
			edges: edges
				.iter()
				.enumerate()
				.map(|(i, &(s, t))| GraphEdge {
					id: format!("e{i}"),
					source: format!("n{s}"),
					target: format!("n{t}"),
					weight: 1.0,
					kind: RelationKind::Related,
				})
				.collect(),
		}
	}

	fn fixed_iterations() -> LayoutConfig {
		LayoutConfig {
			energy_threshold: None,
			..LayoutConfig::default()
		}
	}

	fn simulation(
		g: &KnowledgeGraph,
		width: f64,
		height: f64,
		cfg: &LayoutConfig,
		seed: u64,
	) -> ForceSimulation {
		ForceSimulation::new(g, width, height, cfg, &mut ChaCha8Rng::seed_from_u64(seed))
	}

	fn assert_close(actual: f64, expected: f64) {
		assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
	}

	#[test]
	fn repulsion_step_pushes_nodes_apart() {
		let g = graph(2, &[]);
		let mut sim = simulation(&g, 800.0, 600.0, &fixed_iterations(), 0);
		sim.points = vec![Point::new(300.0, 300.0), Point::new(310.0, 300.0)];
		sim.step();

		// n0: 1000 / 10² · 0.1 = 1.0 to the left
		assert_close(sim.points[0].x, 299.0);
		// n1 sees n0 already moved, 11 units away: 1000 / 11² · 0.1
		assert_close(sim.points[1].x, 310.0 + 100.0 / 121.0);
		assert_close(sim.points[0].y, 300.0);
		assert_close(sim.points[1].y, 300.0);
		assert_eq!(sim.iteration(), 1);
	}

	#[test]
	fn spring_step_scales_with_edge_weight() {
		let mut g = graph(2, &[(0, 1)]);
		g.edges[0].weight = 0.5;
		let cfg = LayoutConfig {
			repulsion: 0.0,
			..fixed_iterations()
		};
		let mut sim = simulation(&g, 800.0, 600.0, &cfg, 0);
		sim.points = vec![Point::new(300.0, 300.0), Point::new(500.0, 300.0)];
		sim.step();

		// 200 · 0.01 · 0.5 = 1.0 towards each other
		assert_close(sim.points[0].x, 301.0);
		assert_close(sim.points[1].x, 499.0);
		assert_close(sim.points[0].y, 300.0);
		assert_close(sim.points[1].y, 300.0);
	}

	#[test]
	fn step_clamps_into_margins() {
		let g = graph(2, &[]);
		let mut sim = simulation(&g, 800.0, 600.0, &fixed_iterations(), 0);
		sim.points = vec![Point::new(50.0, 50.0), Point::new(51.0, 50.0)];
		sim.step();
		assert_eq!(sim.points[0], Point::new(50.0, 50.0));
		assert!(sim.points[1].x > 51.0);
	}

	#[test]
	fn runs_exactly_max_iterations_without_threshold() {
		let g = graph(6, &[(0, 1), (1, 2)]);
		let mut sim = simulation(&g, 800.0, 600.0, &fixed_iterations(), 1);
		sim.run_to_completion();
		assert_eq!(sim.iteration(), 50);
		assert!(sim.is_finished());
	}

	#[test]
	fn chunked_run_matches_single_run() {
		let g = graph(8, &[(0, 1), (2, 3), (3, 4)]);
		let cfg = fixed_iterations();
		let mut whole = simulation(&g, 640.0, 480.0, &cfg, 9);
		let mut chunked = simulation(&g, 640.0, 480.0, &cfg, 9);
		let expected = whole.run_to_completion();
		while !chunked.is_finished() {
			assert!(chunked.run(7) <= 7);
		}
		assert_eq!(chunked.positions(), expected);
	}

	#[test]
	fn energy_threshold_can_stop_early() {
		let g = graph(2, &[]);
		let cfg = LayoutConfig {
			energy_threshold: Some(f64::INFINITY),
			..LayoutConfig::default()
		};
		let mut sim = simulation(&g, 800.0, 600.0, &cfg, 4);
		sim.run_to_completion();
		assert_eq!(sim.iteration(), 1);
	}

	#[test]
	fn edges_pull_endpoints_together() {
		let g = graph(2, &[(0, 1)]);
		let cfg = LayoutConfig {
			repulsion: 0.0,
			..fixed_iterations()
		};
		let mut sim = simulation(&g, 800.0, 600.0, &cfg, 2);
		let start = sim.positions();
		let before = start["n0"].distance(start["n1"]);
		let end = sim.run_to_completion();
		assert!(end["n0"].distance(end["n1"]) < before);
	}

	#[test]
	fn dangling_edges_are_ignored() {
		let mut g = graph(2, &[(0, 1)]);
		g.edges[0].target = "ghost".into();
		let mut sim = simulation(&g, 300.0, 300.0, &LayoutConfig::default(), 3);
		assert_eq!(sim.run_to_completion().len(), 2);
	}

	#[test]
	fn tiny_canvas_pins_nodes_to_margin() {
		let g = graph(3, &[]);
		let mut sim = simulation(&g, 40.0, 40.0, &LayoutConfig::default(), 5);
		for p in sim.run_to_completion().values() {
			assert_eq!((p.x, p.y), (50.0, 50.0));
		}
	}

	proptest! {
		#[test]
		fn positions_stay_inside_margins(
			n in 0usize..25,
			seed in any::<u64>(),
			width in 120.0f64..1600.0,
			height in 120.0f64..1200.0,
			links in proptest::collection::vec((0usize..25, 0usize..25), 0..40),
		) {
			let links: Vec<(usize, usize)> =
				links.into_iter().filter(|&(s, t)| s < n && t < n).collect();
			let g = graph(n, &links);
			let mut sim = simulation(&g, width, height, &LayoutConfig::default(), seed);
			let positions = sim.run_to_completion();
			prop_assert_eq!(positions.len(), n);
			for p in positions.values() {
				prop_assert!(p.x >= 50.0 && p.x <= width - 50.0);
				prop_assert!(p.y >= 50.0 && p.y <= height - 50.0);
			}
		}
	}
}
