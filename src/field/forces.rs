use std::ops::AddAssign;

use eframe::egui::{Vec2, vec2};

use super::{Node, PointerState};
use crate::config::MotionConfig;
use crate::random::RandomSource;
use crate::util::clamp01;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(super) struct Impulse {
    pub(super) planar: Vec2,
    pub(super) depth: f32,
}

impl AddAssign for Impulse {
    fn add_assign(&mut self, other: Self) {
        self.planar += other.planar;
        self.depth += other.depth;
    }
}

/// Radial pointer force: repulsive inside the inner radius, mildly attractive
/// out to the interaction radius, fading linearly to zero at its rim.
pub(super) fn pointer_force(position: Vec2, pointer: PointerState, config: &MotionConfig) -> Vec2 {
    if !pointer.active {
        return Vec2::ZERO;
    }

    let delta = position - pointer.position;
    let distance = delta.length();
    if distance <= 0.0001 || distance >= config.pointer_radius {
        return Vec2::ZERO;
    }

    let direction = delta / distance;
    let falloff = 1.0 - (distance / config.pointer_radius);
    if distance < config.pointer_inner_radius {
        direction * (config.pointer_repel * falloff)
    } else {
        -direction * (config.pointer_attract * falloff)
    }
}

pub(super) fn chaos_impulse(
    node: &Node,
    pointer: PointerState,
    config: &MotionConfig,
    strength: f32,
    rng: &mut impl RandomSource,
) -> Impulse {
    let mut planar = vec2(
        rng.centered(config.chaos_jitter),
        rng.centered(config.chaos_jitter),
    );
    let depth = rng.centered(config.chaos_depth_jitter);

    if rng.chance(config.chaos_kick_probability) {
        planar += vec2(rng.centered(config.chaos_kick), rng.centered(config.chaos_kick));
    }

    planar += pointer_force(node.position(), pointer, config);

    Impulse {
        planar: planar * strength,
        depth: depth * strength,
    }
}

/// Occasional nudges plus a rarer steer toward one nearby node, which makes
/// local clusters rather than global attractors.
pub(super) fn cohere_impulse(
    nodes: &[Node],
    index: usize,
    config: &MotionConfig,
    strength: f32,
    rng: &mut impl RandomSource,
) -> Vec2 {
    let mut planar = Vec2::ZERO;

    if rng.chance(config.cohere_nudge_probability) {
        planar += vec2(rng.centered(config.cohere_nudge), rng.centered(config.cohere_nudge));
    }

    if rng.chance(config.cluster_probability) {
        let position = nodes[index].position();
        let radius_sq = config.cluster_radius * config.cluster_radius;
        let neighbors = nodes
            .iter()
            .enumerate()
            .filter(|&(other, node)| {
                other != index && (node.position() - position).length_sq() < radius_sq
            })
            .map(|(other, _)| other)
            .collect::<Vec<_>>();

        if !neighbors.is_empty() {
            let target = nodes[neighbors[rng.index(neighbors.len())]].position();
            let delta = target - position;
            let distance = delta.length();
            if distance > 0.0001 {
                planar += (delta / distance) * config.cluster_pull;
            }
        }
    }

    planar * strength
}

/// Settling nudges and a positional wave, both fading as progress nears 1.
pub(super) fn order_impulse(
    node: &Node,
    config: &MotionConfig,
    strength: f32,
    progress: f32,
    elapsed: f32,
    rng: &mut impl RandomSource,
) -> Vec2 {
    let settle = 1.0 - clamp01(progress);
    let mut planar = Vec2::ZERO;

    if rng.chance(config.order_nudge_probability) {
        planar += vec2(rng.centered(config.order_nudge), rng.centered(config.order_nudge)) * settle;
    }

    if rng.chance(config.wave_probability) {
        let phase = ((node.x + node.y) * config.wave_frequency) + (elapsed * config.wave_speed);
        planar += vec2(phase.sin(), phase.cos()) * (config.wave_strength * settle);
    }

    planar * strength
}
