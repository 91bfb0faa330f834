mod color;
mod surface;
mod trail;

use eframe::egui::{Color32, Vec2, vec2};
use tracing::trace;

use crate::config::{EdgeConfig, PaletteConfig, RenderConfig};
use crate::field::{Node, Viewport};
use crate::graph::Edge;
use crate::phase::PhaseWeights;
use crate::random::RandomSource;
use color::{Palette, blend_color};
pub use surface::{BlendMode, MIN_ALPHA, MIN_RADIUS, Surface};
use surface::{floor_alpha, floor_radius};
use trail::Trails;

/// Per-frame inputs shared by both draw modes.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub weights: PhaseWeights,
    pub progress: f32,
    pub active: bool,
    pub elapsed: f32,
    pub viewport: Viewport,
    /// Connection threshold of the current edge set.
    pub max_distance: f32,
    /// Reduced motion: draw the same frame for the same state, no pulses
    /// and no trails.
    pub still: bool,
}

#[derive(Clone, Copy)]
struct GlowDab {
    center: Vec2,
    radius: f32,
    color: Color32,
}

pub struct Renderer {
    config: RenderConfig,
    edges: EdgeConfig,
    palette: Palette,
    draw_order: Vec<usize>,
    glow: Vec<GlowDab>,
    curve: Vec<Vec2>,
    trails: Trails,
}

/// Edge opacity before the per-edge distance fade.
fn edge_alpha(weights: PhaseWeights) -> f32 {
    ((0.2 * weights.chaos) + (0.4 * weights.cohere) + (0.6 * weights.order)).min(1.0)
}

fn quadratic_point(start: Vec2, control: Vec2, end: Vec2, t: f32) -> Vec2 {
    let inverse = 1.0 - t;
    (start * (inverse * inverse)) + (control * (2.0 * inverse * t)) + (end * (t * t))
}

impl Renderer {
    pub fn new(config: RenderConfig, edges: EdgeConfig, palette: PaletteConfig) -> Self {
        Self {
            config,
            edges,
            palette: Palette::new(palette),
            draw_order: Vec::new(),
            glow: Vec::new(),
            curve: Vec::new(),
            trails: Trails::default(),
        }
    }

    /// Forgets motion history, for a new population.
    pub fn reset(&mut self) {
        self.trails.clear();
    }

    /// Paints one frame. The static path is used until the field activates.
    pub fn draw(
        &mut self,
        input: &FrameInput,
        nodes: &[Node],
        edges: &mut [Edge],
        rng: &mut impl RandomSource,
        surface: &mut Surface,
    ) {
        if input.active && !input.still {
            self.trails.record(nodes, self.config.trail_length);
        } else {
            self.trails.clear();
        }

        if input.active {
            self.draw_dynamic(input, nodes, edges, rng, surface);
        } else {
            self.draw_static(input, nodes, surface);
        }
    }

    /// Gradient-only frame used when motion is reduced.
    pub fn draw_fallback(&mut self, input: &FrameInput, surface: &mut Surface) {
        let tint = self.palette.node(input.progress, self.config.ambient_alpha);
        self.draw_ambient(input.viewport, tint, surface);
    }

    fn draw_ambient(&self, viewport: Viewport, tint: Color32, surface: &mut Surface) {
        let center = vec2(viewport.width * 0.5, viewport.height * 0.5);
        let radius = viewport.width.max(viewport.height) * 0.75;
        surface.radial_gradient(center, radius, tint, Color32::TRANSPARENT);
    }

    fn draw_static(&mut self, input: &FrameInput, nodes: &[Node], surface: &mut Surface) {
        let tint = self.palette.chaos(self.config.ambient_alpha);
        self.draw_ambient(input.viewport, tint, surface);

        for node in nodes {
            let depth = node.depth_t();
            let radius = floor_radius(node.size * (0.6 + (0.8 * depth)));
            let alpha = floor_alpha(0.25 + (0.55 * depth));
            let color = if node.is_accent {
                self.palette.accent(alpha)
            } else {
                self.palette.chaos(alpha)
            };
            let halo = if node.is_accent {
                self.palette.accent(floor_alpha(alpha * 0.12))
            } else {
                self.palette.chaos(floor_alpha(alpha * 0.12))
            };

            surface.fill_circle(node.position(), radius * self.config.glow_scale * 0.6, halo);
            surface.fill_circle(node.position(), radius, color);
        }
    }

    fn sort_by_depth(&mut self, nodes: &[Node]) {
        self.draw_order.clear();
        self.draw_order.extend(0..nodes.len());
        self.draw_order
            .sort_by(|a, b| nodes[*a].z.total_cmp(&nodes[*b].z));
    }

    fn draw_dynamic(
        &mut self,
        input: &FrameInput,
        nodes: &[Node],
        edges: &mut [Edge],
        rng: &mut impl RandomSource,
        surface: &mut Surface,
    ) {
        self.sort_by_depth(nodes);
        self.draw_trails(input, nodes, surface);
        self.draw_edges(input, nodes, edges, rng, surface);

        self.glow.clear();
        let glow_ready = match self.glow.try_reserve(nodes.len()) {
            Ok(()) => true,
            Err(error) => {
                trace!(%error, "glow buffer unavailable, skipping glow pass");
                false
            }
        };

        self.draw_nodes(input, nodes, glow_ready, surface);
        if glow_ready {
            self.composite_glow(surface);
        }
    }

    fn draw_trails(&self, input: &FrameInput, nodes: &[Node], surface: &mut Surface) {
        if self.trails.len() < 2 {
            return;
        }

        for &index in &self.draw_order {
            let node = &nodes[index];
            let depth_alpha = self.config.trail_alpha * (0.3 + (0.6 * node.depth_t()));
            for (from, to, weight) in self.trails.segments(index) {
                if (to - from).length_sq() < 0.01 {
                    continue;
                }
                let alpha = floor_alpha(depth_alpha * weight);
                let color = if node.is_accent {
                    self.palette.accent(alpha)
                } else {
                    self.palette.node(input.progress, alpha)
                };
                surface.stroke_path(&[from, to], node.size * 0.5 * weight, color);
            }
        }
    }

    fn draw_edges(
        &mut self,
        input: &FrameInput,
        nodes: &[Node],
        edges: &mut [Edge],
        rng: &mut impl RandomSource,
        surface: &mut Surface,
    ) {
        let weights = input.weights;
        let base_alpha = edge_alpha(weights);
        let show_probability = 1.0 - (0.8 * weights.chaos);
        let width = self.config.edge_width * (1.0 + weights.order);
        let bend_scale = self.edges.curvature * (0.35 + weights.chaos);
        let segments = self.config.curve_segments.max(1);
        let max_distance = input.max_distance.max(f32::EPSILON);

        for edge in edges.iter_mut() {
            let (Some(from), Some(to)) = (nodes.get(edge.from), nodes.get(edge.to)) else {
                continue;
            };

            let visible = input.still || weights.chaos <= 0.0 || rng.chance(show_probability);
            if visible {
                let start = from.position();
                let end = to.position();
                let delta = end - start;
                let length = delta.length();
                let normal = if length > 0.0001 {
                    vec2(-delta.y, delta.x) / length
                } else {
                    Vec2::ZERO
                };
                let wobble = ((input.elapsed * self.edges.curve_speed)
                    + ((edge.from + edge.to) as f32 * 0.7))
                    .sin();
                let control = ((start + end) * 0.5) + (normal * (wobble * bend_scale * length));

                self.curve.clear();
                self.curve.extend((0..=segments).map(|step| {
                    quadratic_point(start, control, end, step as f32 / segments as f32)
                }));

                let fade = 1.0 - (0.5 * (edge.distance / max_distance).clamp(0.0, 1.0));
                let color = self.palette.node(input.progress, floor_alpha(base_alpha * fade));
                surface.stroke_path(&self.curve, width, color);

                if !input.still && rng.chance(self.edges.pulse_probability) {
                    let marker = quadratic_point(start, control, end, edge.pulse_t);
                    let bright = blend_color(
                        self.palette.node(input.progress, 0.9),
                        Color32::WHITE,
                        0.65,
                    );
                    surface.fill_circle(marker, 1.4 + weights.order, bright);
                }
            }

            if !input.still {
                edge.advance_pulse();
            }
        }
    }

    fn draw_nodes(
        &mut self,
        input: &FrameInput,
        nodes: &[Node],
        collect_glow: bool,
        surface: &mut Surface,
    ) {
        let order = input.weights.order;
        let glow_alpha = self.config.glow_alpha + (self.config.glow_order_boost * order);

        for &index in &self.draw_order {
            let node = &nodes[index];
            let depth = node.depth_t();
            let shimmer = 1.0 + (0.12 * node.pulse_phase.sin());
            let radius =
                floor_radius(node.size * (0.55 + (0.9 * depth)) * (1.0 + (0.6 * order)) * shimmer);
            let alpha = floor_alpha((0.3 + (0.6 * depth)) * (1.0 + (0.4 * order)));
            let (color, glow) = if node.is_accent {
                (self.palette.accent(alpha), self.palette.accent(floor_alpha(glow_alpha)))
            } else {
                (
                    self.palette.node(input.progress, alpha),
                    self.palette.node(input.progress, floor_alpha(glow_alpha)),
                )
            };

            surface.fill_circle(node.position(), radius, color);
            if collect_glow {
                self.glow.push(GlowDab {
                    center: node.position(),
                    radius: radius * self.config.glow_scale * (1.0 + (0.5 * order)),
                    color: glow,
                });
            }
        }
    }

    fn composite_glow(&mut self, surface: &mut Surface) {
        surface.set_blend(BlendMode::Additive);
        for dab in self.glow.drain(..) {
            surface.fill_circle(dab.center, dab.radius, dab.color);
        }
        surface.set_blend(BlendMode::Normal);
    }
}
