mod forces;

use eframe::egui::{Vec2, vec2};

use crate::config::{MotionConfig, PopulationConfig};
use crate::phase::PhaseWeights;
use crate::random::RandomSource;

pub const DEPTH_MIN: f32 = -1.0;
pub const DEPTH_MAX: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        Self { width, height, dpr }
    }

    pub fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn min_dimension(self) -> f32 {
        self.width.min(self.height)
    }

    /// Pixel density as used for sizing; capped at 2 like most hosts do.
    pub fn clamped_dpr(self) -> f32 {
        if self.dpr.is_finite() {
            self.dpr.clamp(0.5, 2.0)
        } else {
            1.0
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub size: f32,
    pub is_accent: bool,
    pub pulse_phase: f32,
}

impl Node {
    pub fn position(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    /// Depth remapped to `[0, 1]`, 1 being nearest.
    pub fn depth_t(&self) -> f32 {
        ((self.z - DEPTH_MIN) / (DEPTH_MAX - DEPTH_MIN)).clamp(0.0, 1.0)
    }
}

/// Inputs of one update step, snapshotted at tick start.
#[derive(Clone, Copy, Debug)]
pub struct Motion {
    pub weights: PhaseWeights,
    pub pointer: PointerState,
    pub progress: f32,
    pub active: bool,
    pub elapsed: f32,
}

pub fn population_for(config: &PopulationConfig, viewport: Viewport) -> usize {
    let area = f64::from(viewport.width.max(0.0)) * f64::from(viewport.height.max(0.0));
    let reference = f64::from(config.reference_width) * f64::from(config.reference_height);
    let density = f64::from(config.base_count) * (area / reference);
    let compact = if viewport.width < config.compact_width {
        f64::from(config.compact_scale)
    } else {
        1.0
    };
    let raw = (density * compact * f64::from(viewport.clamped_dpr())).floor();

    if !raw.is_finite() || raw <= 0.0 {
        return config.min_nodes;
    }
    (raw.min(usize::MAX as f64) as usize).clamp(config.min_nodes, config.max_nodes)
}

pub struct NodeField {
    population: PopulationConfig,
    motion: MotionConfig,
    viewport: Viewport,
    nodes: Vec<Node>,
    impulses: Vec<forces::Impulse>,
}

impl NodeField {
    pub fn new(population: PopulationConfig, motion: MotionConfig) -> Self {
        Self {
            population,
            motion,
            viewport: Viewport::new(0.0, 0.0, 1.0),
            nodes: Vec::new(),
            impulses: Vec::new(),
        }
    }

    /// Replaces the whole population for a new viewport.
    pub fn initialize(
        &mut self,
        width: f32,
        height: f32,
        dpr: f32,
        rng: &mut impl RandomSource,
    ) -> usize {
        self.viewport = Viewport::new(width, height, dpr);
        let count = population_for(&self.population, self.viewport);
        let (min, max) = self.bounds();

        self.nodes.clear();
        self.nodes.reserve(count.saturating_sub(self.nodes.capacity()));
        for _ in 0..count {
            let x = rng.range(min.x, max.x);
            let y = rng.range(min.y, max.y);
            let z = rng.range(DEPTH_MIN, DEPTH_MAX);
            let size = rng.range(self.population.size_min, self.population.size_max);
            let is_accent = rng.chance(self.population.accent_probability);
            let pulse_phase = rng.range(0.0, std::f32::consts::TAU);
            self.nodes.push(Node {
                x,
                y,
                z,
                vx: 0.0,
                vy: 0.0,
                vz: 0.0,
                size,
                is_accent,
                pulse_phase,
            });
        }
        count
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Corners of the box nodes are kept inside.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let width = self.viewport.width.max(0.0);
        let height = self.viewport.height.max(0.0);
        let margin_x = self.population.margin.min(width * 0.5);
        let margin_y = self.population.margin.min(height * 0.5);
        (
            vec2(margin_x, margin_y),
            vec2(width - margin_x, height - margin_y),
        )
    }

    pub fn update(&mut self, motion: &Motion, rng: &mut impl RandomSource) {
        if motion.active {
            self.accumulate(motion, rng);
            self.integrate();
        }

        for node in &mut self.nodes {
            node.pulse_phase += self.motion.pulse_increment;
        }
    }

    fn accumulate(&mut self, motion: &Motion, rng: &mut impl RandomSource) {
        let config = &self.motion;
        let weights = motion.weights;

        self.impulses.clear();
        self.impulses
            .reserve(self.nodes.len().saturating_sub(self.impulses.capacity()));
        for index in 0..self.nodes.len() {
            let node = &self.nodes[index];
            let mut impulse = forces::Impulse::default();

            if weights.chaos > 0.0 {
                impulse += forces::chaos_impulse(node, motion.pointer, config, weights.chaos, rng);
            }
            if weights.cohere > 0.0 {
                impulse.planar +=
                    forces::cohere_impulse(&self.nodes, index, config, weights.cohere, rng);
            }
            if weights.order > 0.0 {
                impulse.planar += forces::order_impulse(
                    node,
                    config,
                    weights.order,
                    motion.progress,
                    motion.elapsed,
                    rng,
                );
            }

            self.impulses.push(impulse);
        }

        for (node, impulse) in self.nodes.iter_mut().zip(&self.impulses) {
            node.vx += impulse.planar.x;
            node.vy += impulse.planar.y;
            node.vz += impulse.depth;
        }
    }

    fn integrate(&mut self) {
        let (min, max) = self.bounds();
        let damping = self.motion.damping;
        let bounce = self.motion.bounce;

        for node in &mut self.nodes {
            node.x += node.vx;
            node.y += node.vy;
            node.z += node.vz;
            node.vx *= damping;
            node.vy *= damping;
            node.vz *= damping;

            reflect(&mut node.x, &mut node.vx, min.x, max.x, bounce);
            reflect(&mut node.y, &mut node.vy, min.y, max.y, bounce);
            reflect(&mut node.z, &mut node.vz, DEPTH_MIN, DEPTH_MAX, bounce);
        }
    }
}

/// Inelastic bounce off `[min, max]`.
fn reflect(position: &mut f32, velocity: &mut f32, min: f32, max: f32, bounce: f32) {
    if !position.is_finite() || !velocity.is_finite() {
        *position = (min + max) * 0.5;
        *velocity = 0.0;
    } else if *position < min {
        *position = min;
        *velocity = velocity.abs() * bounce;
    } else if *position > max {
        *position = max;
        *velocity = -velocity.abs() * bounce;
    }
}
