use eframe::egui::Pos2;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{FieldConfig, ReducedMotion};
use crate::field::{Motion, Node, NodeField, PointerState, Viewport};
use crate::graph::{Edge, EdgeGraph};
use crate::phase::{PhaseWeights, weights};
use crate::random::RandomSource;
use crate::render::{FrameInput, Renderer, Surface};
use crate::scheduler::{FrameHost, FrameScheduler, SchedulerState};
use crate::util::clamp01;

/// Simulated seconds per tick, fixed so runs replay identically.
pub const TICK_SECONDS: f32 = 1.0 / 60.0;

/// Progress the field is shown at when motion is frozen.
pub const FROZEN_PROGRESS: f32 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("viewport {width}x{height} cannot hold a field")]
    UnusableViewport { width: f32, height: f32 },
}

/// Ambient inputs, sampled once at the start of a tick.
#[derive(Clone, Copy, Debug)]
pub struct Signals {
    pub progress: f32,
    pub pointer: PointerState,
    pub viewport: Viewport,
    /// Top-left corner of the field in host coordinates.
    pub origin: Pos2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scheduler is paused or stopped; nothing was drawn.
    Skipped,
    /// Below the activation threshold: static frame, nodes at rest.
    Static,
    Dynamic,
    /// Reduced motion: one still frame, no further ticks requested.
    Still,
}

pub struct FieldEngine<R: RandomSource> {
    config: FieldConfig,
    rng: R,
    field: NodeField,
    graph: EdgeGraph,
    renderer: Renderer,
    scheduler: FrameScheduler,
    viewport: Viewport,
    weights: PhaseWeights,
    progress: f32,
    elapsed: f32,
}

impl<R: RandomSource> FieldEngine<R> {
    pub fn initialize(config: FieldConfig, viewport: Viewport, rng: R) -> Result<Self, SetupError> {
        if !viewport.is_usable() {
            return Err(SetupError::UnusableViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let config = config.sanitized();
        let mut engine = Self {
            field: NodeField::new(config.population.clone(), config.motion.clone()),
            graph: EdgeGraph::new(config.edges.clone()),
            renderer: Renderer::new(
                config.render.clone(),
                config.edges.clone(),
                config.palette.clone(),
            ),
            scheduler: FrameScheduler::new(),
            viewport,
            weights: weights(0.0),
            progress: 0.0,
            elapsed: 0.0,
            rng,
            config,
        };
        engine.reseed(viewport);

        info!(
            width = viewport.width,
            height = viewport.height,
            dpr = viewport.dpr,
            nodes = engine.field.len(),
            "field initialized"
        );
        Ok(engine)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn weights(&self) -> PhaseWeights {
        self.weights
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn nodes(&self) -> &[Node] {
        self.field.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    pub fn base_distance(&self) -> f32 {
        self.graph.base_distance()
    }

    pub fn max_distance(&self) -> f32 {
        self.graph.max_distance()
    }

    pub fn edge_cap(&self) -> usize {
        self.graph.cap()
    }

    pub fn is_active(&self) -> bool {
        self.progress >= self.config.activation_threshold
    }

    /// Rebuilds the population for a new surface size. Unusable sizes (a
    /// minimized window) keep the current field.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        if !viewport.is_usable() {
            debug!(width = viewport.width, height = viewport.height, "ignoring unusable resize");
            return;
        }

        self.reseed(viewport);
        debug!(
            width = viewport.width,
            height = viewport.height,
            nodes = self.field.len(),
            "field resized"
        );
    }

    fn reseed(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.field
            .initialize(viewport.width, viewport.height, viewport.dpr, &mut self.rng);
        self.graph.resize(viewport);
        self.renderer.reset();
    }

    pub fn tick(
        &mut self,
        signals: &Signals,
        host: &mut impl FrameHost,
        surface: &mut Surface,
    ) -> TickOutcome {
        if !self.scheduler.begin_tick(host) {
            return TickOutcome::Skipped;
        }

        self.resize(signals.viewport);
        surface.begin(signals.origin);

        if host.prefers_reduced_motion() {
            self.draw_still(surface);
            self.scheduler.finish_tick(host, false);
            return TickOutcome::Still;
        }

        let outcome = self.step(clamp01(signals.progress), signals.pointer, surface);
        self.scheduler.finish_tick(host, true);
        outcome
    }

    fn step(&mut self, progress: f32, pointer: PointerState, surface: &mut Surface) -> TickOutcome {
        self.progress = progress;
        self.weights = weights(progress);
        let active = self.is_active();

        self.field.update(
            &Motion {
                weights: self.weights,
                pointer,
                progress,
                active,
                elapsed: self.elapsed,
            },
            &mut self.rng,
        );

        let input = FrameInput {
            weights: self.weights,
            progress,
            active,
            elapsed: self.elapsed,
            viewport: self.viewport,
            max_distance: self.graph.max_distance_for(self.weights),
            still: false,
        };

        if active {
            let edges = self.graph.rebuild(self.field.nodes(), self.weights);
            self.renderer
                .draw(&input, self.field.nodes(), edges, &mut self.rng, surface);
            self.graph.commit_pulses();
        } else {
            self.graph.clear();
            self.renderer
                .draw(&input, self.field.nodes(), &mut [], &mut self.rng, surface);
        }

        self.elapsed += TICK_SECONDS;
        if active {
            TickOutcome::Dynamic
        } else {
            TickOutcome::Static
        }
    }

    fn draw_still(&mut self, surface: &mut Surface) {
        self.progress = FROZEN_PROGRESS;
        self.weights = weights(FROZEN_PROGRESS);
        let input = FrameInput {
            weights: self.weights,
            progress: FROZEN_PROGRESS,
            active: self.is_active(),
            elapsed: self.elapsed,
            viewport: self.viewport,
            max_distance: self.graph.max_distance_for(self.weights),
            still: true,
        };

        match self.config.reduced_motion {
            ReducedMotion::Freeze => {
                let edges = if input.active {
                    self.graph.rebuild(self.field.nodes(), self.weights)
                } else {
                    self.graph.clear();
                    self.graph.edges_mut()
                };
                self.renderer
                    .draw(&input, self.field.nodes(), edges, &mut self.rng, surface);
            }
            ReducedMotion::Gradient => {
                self.graph.clear();
                self.renderer.draw_fallback(&input, surface);
            }
        }
    }

    /// Stops ticking for good. Safe to call more than once.
    pub fn dispose(&mut self, host: &mut impl FrameHost) {
        if self.scheduler.state() != SchedulerState::Stopped {
            info!("field disposed");
        }
        self.scheduler.teardown(host);
    }
}
