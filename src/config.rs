use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// How a reduced-motion preference is honored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducedMotion {
    /// Skip simulation and render the field at mid progress.
    #[default]
    Freeze,
    /// Paint only the ambient gradient.
    Gradient,
}

/// Every tunable of the field. One record covers all page variants; files
/// only need to name the values they change.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub activation_threshold: f32,
    pub reduced_motion: ReducedMotion,
    /// Height of the virtual page in viewport heights.
    pub page_screens: f32,
    pub population: PopulationConfig,
    pub motion: MotionConfig,
    pub edges: EdgeConfig,
    pub palette: PaletteConfig,
    pub render: RenderConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub base_count: f32,
    pub reference_width: f32,
    pub reference_height: f32,
    pub min_nodes: usize,
    pub max_nodes: usize,
    pub size_min: f32,
    pub size_max: f32,
    pub accent_probability: f32,
    pub margin: f32,
    /// Viewports narrower than this get `compact_scale` times the nodes.
    pub compact_width: f32,
    pub compact_scale: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub chaos_jitter: f32,
    pub chaos_depth_jitter: f32,
    pub chaos_kick_probability: f32,
    pub chaos_kick: f32,
    pub pointer_radius: f32,
    pub pointer_inner_radius: f32,
    pub pointer_repel: f32,
    pub pointer_attract: f32,
    pub cohere_nudge_probability: f32,
    pub cohere_nudge: f32,
    pub cluster_probability: f32,
    pub cluster_radius: f32,
    pub cluster_pull: f32,
    pub order_nudge_probability: f32,
    pub order_nudge: f32,
    pub wave_probability: f32,
    pub wave_strength: f32,
    pub wave_frequency: f32,
    pub wave_speed: f32,
    pub damping: f32,
    pub bounce: f32,
    pub pulse_increment: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub max_k: usize,
    pub base_distance_fraction: f32,
    pub spatial_index_threshold: usize,
    pub pulse_probability: f32,
    pub pulse_speed_min: f32,
    pub pulse_speed_max: f32,
    pub curvature: f32,
    pub curve_speed: f32,
}

/// How the node color follows progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteRamp {
    /// Hue and lightness interpolate from the start to the end values.
    #[default]
    Hue,
    /// RGB blend through `stops`: chaos, organized, precision.
    Stops,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub ramp: PaletteRamp,
    pub stops: [[u8; 3]; 3],
    pub start_hue: f32,
    pub end_hue: f32,
    pub saturation: f32,
    pub start_lightness: f32,
    pub end_lightness: f32,
    pub accent_hue: f32,
    pub accent_lightness: f32,
    pub background: [u8; 3],
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub glow_scale: f32,
    pub glow_alpha: f32,
    pub glow_order_boost: f32,
    pub edge_width: f32,
    pub curve_segments: usize,
    pub ambient_alpha: f32,
    /// Frames of position history drawn behind moving nodes; 0 disables.
    pub trail_length: usize,
    pub trail_alpha: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            activation_threshold: 0.3,
            reduced_motion: ReducedMotion::Freeze,
            page_screens: 5.0,
            population: PopulationConfig::default(),
            motion: MotionConfig::default(),
            edges: EdgeConfig::default(),
            palette: PaletteConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            base_count: 1200.0,
            reference_width: 1920.0,
            reference_height: 1080.0,
            min_nodes: 24,
            max_nodes: 2400,
            size_min: 0.8,
            size_max: 2.4,
            accent_probability: 0.03,
            margin: 20.0,
            compact_width: 768.0,
            compact_scale: 0.5,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            chaos_jitter: 0.06,
            chaos_depth_jitter: 0.002,
            chaos_kick_probability: 0.01,
            chaos_kick: 1.2,
            pointer_radius: 200.0,
            pointer_inner_radius: 80.0,
            pointer_repel: 0.6,
            pointer_attract: 0.08,
            cohere_nudge_probability: 0.02,
            cohere_nudge: 0.3,
            cluster_probability: 0.005,
            cluster_radius: 100.0,
            cluster_pull: 0.4,
            order_nudge_probability: 0.01,
            order_nudge: 0.2,
            wave_probability: 0.01,
            wave_strength: 0.15,
            wave_frequency: 0.012,
            wave_speed: 1.6,
            damping: 0.98,
            bounce: 0.2,
            pulse_increment: 0.02,
        }
    }
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            max_k: 4,
            base_distance_fraction: 0.08,
            spatial_index_threshold: 400,
            pulse_probability: 0.015,
            pulse_speed_min: 0.004,
            pulse_speed_max: 0.018,
            curvature: 0.12,
            curve_speed: 0.8,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            ramp: PaletteRamp::Hue,
            stops: [[255, 60, 60], [0, 183, 255], [0, 255, 153]],
            start_hue: 358.0,
            end_hue: 156.0,
            saturation: 1.0,
            start_lightness: 0.62,
            end_lightness: 0.5,
            accent_hue: 11.0,
            accent_lightness: 0.61,
            background: [5, 5, 5],
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            glow_scale: 3.5,
            glow_alpha: 0.08,
            glow_order_boost: 0.16,
            edge_width: 0.6,
            curve_segments: 8,
            ambient_alpha: 0.12,
            trail_length: 6,
            trail_alpha: 0.35,
        }
    }
}

impl FieldConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("invalid TOML")?;
        Ok(config.sanitized())
    }

    /// Pulls every value into a range the simulation can work with.
    pub fn sanitized(mut self) -> Self {
        self.activation_threshold = finite_or(self.activation_threshold, 0.3).clamp(0.0, 1.0);
        self.page_screens = finite_or(self.page_screens, 5.0).clamp(1.5, 40.0);

        let population = &mut self.population;
        population.base_count = finite_or(population.base_count, 1200.0).max(1.0);
        population.reference_width = finite_or(population.reference_width, 1920.0).max(1.0);
        population.reference_height = finite_or(population.reference_height, 1080.0).max(1.0);
        population.min_nodes = population.min_nodes.max(2);
        population.max_nodes = population.max_nodes.max(population.min_nodes);
        population.size_min = finite_or(population.size_min, 0.8).max(0.1);
        population.size_max = finite_or(population.size_max, 2.4).max(population.size_min);
        population.accent_probability =
            finite_or(population.accent_probability, 0.03).clamp(0.0, 1.0);
        population.margin = finite_or(population.margin, 20.0).max(0.0);
        population.compact_width = finite_or(population.compact_width, 768.0).max(0.0);
        population.compact_scale = finite_or(population.compact_scale, 0.5).clamp(0.0, 1.0);

        let motion = &mut self.motion;
        motion.damping = finite_or(motion.damping, 0.98).clamp(0.5, 1.0);
        motion.bounce = finite_or(motion.bounce, 0.2).clamp(0.0, 1.0);
        motion.pointer_radius = finite_or(motion.pointer_radius, 200.0).max(1.0);
        motion.pointer_inner_radius =
            finite_or(motion.pointer_inner_radius, 80.0).clamp(0.0, motion.pointer_radius);
        motion.cluster_radius = finite_or(motion.cluster_radius, 100.0).max(0.0);
        motion.chaos_jitter = finite_or(motion.chaos_jitter, 0.06).max(0.0);
        motion.chaos_depth_jitter = finite_or(motion.chaos_depth_jitter, 0.002).max(0.0);
        motion.chaos_kick = finite_or(motion.chaos_kick, 1.2).max(0.0);
        motion.pointer_repel = finite_or(motion.pointer_repel, 0.6);
        motion.pointer_attract = finite_or(motion.pointer_attract, 0.08);
        motion.cohere_nudge = finite_or(motion.cohere_nudge, 0.3).max(0.0);
        motion.cluster_pull = finite_or(motion.cluster_pull, 0.4);
        motion.order_nudge = finite_or(motion.order_nudge, 0.2).max(0.0);
        motion.wave_strength = finite_or(motion.wave_strength, 0.15);
        motion.wave_frequency = finite_or(motion.wave_frequency, 0.012);
        motion.wave_speed = finite_or(motion.wave_speed, 1.6);
        motion.pulse_increment = finite_or(motion.pulse_increment, 0.02);
        for probability in [
            &mut motion.chaos_kick_probability,
            &mut motion.cohere_nudge_probability,
            &mut motion.cluster_probability,
            &mut motion.order_nudge_probability,
            &mut motion.wave_probability,
        ] {
            *probability = finite_or(*probability, 0.0).clamp(0.0, 1.0);
        }

        let edges = &mut self.edges;
        edges.max_k = edges.max_k.min(32);
        edges.base_distance_fraction =
            finite_or(edges.base_distance_fraction, 0.08).clamp(0.0, 1.0);
        edges.pulse_probability = finite_or(edges.pulse_probability, 0.015).clamp(0.0, 1.0);
        edges.pulse_speed_min = finite_or(edges.pulse_speed_min, 0.004).clamp(0.0, 1.0);
        edges.pulse_speed_max =
            finite_or(edges.pulse_speed_max, 0.018).clamp(edges.pulse_speed_min, 1.0);
        edges.curvature = finite_or(edges.curvature, 0.12);
        edges.curve_speed = finite_or(edges.curve_speed, 0.8);

        let palette = &mut self.palette;
        palette.saturation = finite_or(palette.saturation, 1.0).clamp(0.0, 1.0);
        palette.start_lightness = finite_or(palette.start_lightness, 0.62).clamp(0.0, 1.0);
        palette.end_lightness = finite_or(palette.end_lightness, 0.5).clamp(0.0, 1.0);
        palette.accent_lightness = finite_or(palette.accent_lightness, 0.61).clamp(0.0, 1.0);

        let render = &mut self.render;
        render.glow_scale = finite_or(render.glow_scale, 3.5).max(1.0);
        render.glow_alpha = finite_or(render.glow_alpha, 0.08).clamp(0.0, 1.0);
        render.glow_order_boost = finite_or(render.glow_order_boost, 0.16).clamp(0.0, 1.0);
        render.edge_width = finite_or(render.edge_width, 0.6).max(0.0);
        render.trail_length = render.trail_length.min(32);
        render.trail_alpha = finite_or(render.trail_alpha, 0.35).clamp(0.0, 1.0);
        render.curve_segments = render.curve_segments.clamp(1, 64);
        render.ambient_alpha = finite_or(render.ambient_alpha, 0.12).clamp(0.0, 1.0);

        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}
