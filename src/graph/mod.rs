mod quadtree;

use std::collections::HashMap;

use eframe::egui::Vec2;

use crate::config::EdgeConfig;
use crate::field::{Node, Viewport};
use crate::phase::PhaseWeights;
use crate::util::{lerp, stable_pair};
use quadtree::NeighborTree;

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub distance: f32,
    /// Position of the traveling highlight along the edge, in `[0, 1)`.
    pub pulse_t: f32,
    pub pulse_speed: f32,
}

impl Edge {
    pub fn advance_pulse(&mut self) {
        let next = self.pulse_t + self.pulse_speed;
        self.pulse_t = if next.is_finite() { next.rem_euclid(1.0) } else { 0.0 };
        if self.pulse_t >= 1.0 {
            self.pulse_t = 0.0;
        }
    }
}

/// Bounded-degree nearest-neighbor connectivity, rebuilt whole every tick.
///
/// The search is a brute-force scan up to `spatial_index_threshold` nodes and
/// a quadtree radius query above it; both yield the same edges.
pub struct EdgeGraph {
    config: EdgeConfig,
    base_distance: f32,
    max_distance: f32,
    cap: usize,
    edges: Vec<Edge>,
    carried_pulses: HashMap<(usize, usize), f32>,
    positions: Vec<Vec2>,
    candidates: Vec<(f32, usize)>,
}

impl EdgeGraph {
    pub fn new(config: EdgeConfig) -> Self {
        Self {
            config,
            base_distance: 0.0,
            max_distance: 0.0,
            cap: 0,
            edges: Vec::new(),
            carried_pulses: HashMap::new(),
            positions: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Re-derives the distance threshold and drops all state tied to the
    /// previous population.
    pub fn resize(&mut self, viewport: Viewport) {
        self.base_distance = self.config.base_distance_fraction * viewport.min_dimension().max(0.0);
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.edges.clear();
        self.carried_pulses.clear();
        self.max_distance = 0.0;
        self.cap = 0;
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    pub fn base_distance(&self) -> f32 {
        self.base_distance
    }

    /// Threshold used by the latest rebuild.
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Degree cap used by the latest rebuild.
    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn max_distance_for(&self, weights: PhaseWeights) -> f32 {
        self.base_distance * (0.1 + (0.6 * weights.cohere) + (0.8 * weights.order))
    }

    pub fn cap_for(&self, weights: PhaseWeights) -> usize {
        let blend = weights.connectivity_blend().clamp(0.0, 1.0);
        ((self.config.max_k as f32 * blend).floor() as usize).min(self.config.max_k)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    pub fn rebuild(&mut self, nodes: &[Node], weights: PhaseWeights) -> &mut [Edge] {
        self.edges.clear();
        self.cap = self.cap_for(weights);
        self.max_distance = self.max_distance_for(weights);

        let max_distance = self.max_distance;
        if self.cap == 0 || nodes.len() < 2 || max_distance <= 0.0 || !max_distance.is_finite() {
            return &mut self.edges;
        }

        self.positions.clear();
        self.positions.extend(nodes.iter().map(Node::position));

        let tree = if nodes.len() > self.config.spatial_index_threshold {
            NeighborTree::build(&self.positions)
        } else {
            None
        };

        for from in 0..nodes.len() {
            let origin = self.positions[from];
            self.candidates.clear();

            match &tree {
                Some(tree) => {
                    tree.neighbors_within(origin, max_distance, from, &mut self.candidates);
                }
                None => {
                    for (to, position) in self.positions.iter().enumerate() {
                        let distance = (*position - origin).length();
                        if to != from && distance < max_distance {
                            self.candidates.push((distance, to));
                        }
                    }
                }
            }

            self.candidates
                .sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

            for &(distance, to) in self.candidates.iter().take(self.cap) {
                let (offset, speed) = stable_pair(from, to);
                let pulse_t = self
                    .carried_pulses
                    .get(&(from, to))
                    .copied()
                    .unwrap_or(offset);
                self.edges.push(Edge {
                    from,
                    to,
                    distance,
                    pulse_t,
                    pulse_speed: lerp(
                        self.config.pulse_speed_min,
                        self.config.pulse_speed_max,
                        speed,
                    ),
                });
            }
        }

        &mut self.edges
    }

    /// Remembers pulse progress so a connection that survives the next
    /// rebuild keeps its marker moving instead of restarting.
    pub fn commit_pulses(&mut self) {
        self.carried_pulses.clear();
        for edge in &self.edges {
            self.carried_pulses.insert((edge.from, edge.to), edge.pulse_t);
        }
    }
}
