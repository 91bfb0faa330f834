use eframe::egui::{self, Color32, Context, Key, Sense};
use phase_lattice::{
    FieldConfig, FieldEngine, FrameHost, PointerState, RngSource, Signals, Surface, Viewport,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

mod hud;
mod page;

use hud::FpsMeter;
use page::VirtualPage;

type Engine = FieldEngine<RngSource<SmallRng>>;

/// Startup options gathered from the command line.
pub struct Launch {
    pub config: FieldConfig,
    pub seed: Option<u64>,
    pub pinned_progress: Option<f32>,
    pub reduced_motion: bool,
}

pub struct FieldApp {
    ctx: Context,
    config: FieldConfig,
    seed: Option<u64>,
    pinned_progress: Option<f32>,
    reduced_motion: bool,
    state: FieldState,
    page: VirtualPage,
    surface: Surface,
    fps: FpsMeter,
    show_hud: bool,
}

enum FieldState {
    Pending,
    Ready(Box<Engine>),
    /// Setup failed; the window stays blank.
    Failed,
}

/// Drives ticks through egui repaints.
struct EguiHost<'a> {
    ctx: &'a Context,
    visible: bool,
    reduced_motion: bool,
}

impl FrameHost for EguiHost<'_> {
    fn request_tick(&mut self) {
        self.ctx.request_repaint();
    }

    // egui cannot withdraw a repaint request; a stray one just redraws once.
    fn cancel(&mut self) {}

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

impl FieldApp {
    pub fn new(cc: &eframe::CreationContext<'_>, launch: Launch) -> Self {
        let page = VirtualPage::new(launch.config.page_screens);
        Self {
            ctx: cc.egui_ctx.clone(),
            config: launch.config,
            seed: launch.seed,
            pinned_progress: launch.pinned_progress,
            reduced_motion: launch.reduced_motion,
            state: FieldState::Pending,
            page,
            surface: Surface::default(),
            fps: FpsMeter::default(),
            show_hud: false,
        }
    }

    fn make_engine(&self, viewport: Viewport) -> FieldState {
        let rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        match FieldEngine::initialize(self.config.clone(), viewport, RngSource(rng)) {
            Ok(engine) => FieldState::Ready(Box::new(engine)),
            Err(error) => {
                debug!(%error, "field setup aborted");
                FieldState::Failed
            }
        }
    }

    fn handle_keys(&mut self, ctx: &Context, viewport_height: f32) {
        ctx.input(|input| {
            if input.key_pressed(Key::M) {
                self.reduced_motion = !self.reduced_motion;
                info!(reduced_motion = self.reduced_motion, "reduced motion toggled");
            }
            if input.key_pressed(Key::F3) {
                self.show_hud = !self.show_hud;
            }

            let scroll = input.smooth_scroll_delta.y;
            if scroll != 0.0 {
                self.page.scroll_by(-scroll, viewport_height);
            }
            if input.key_pressed(Key::ArrowDown) {
                self.page.scroll_by(page::LINE_STEP, viewport_height);
            }
            if input.key_pressed(Key::ArrowUp) {
                self.page.scroll_by(-page::LINE_STEP, viewport_height);
            }
            if input.key_pressed(Key::PageDown) || input.key_pressed(Key::Space) {
                self.page.scroll_by(viewport_height * page::SCREEN_STEP, viewport_height);
            }
            if input.key_pressed(Key::PageUp) {
                self.page.scroll_by(-viewport_height * page::SCREEN_STEP, viewport_height);
            }
            if input.key_pressed(Key::Home) {
                self.page.jump_to(0.0);
            }
            if input.key_pressed(Key::End) {
                self.page.jump_to(1.0);
            }
        });
    }

    fn progress(&self) -> f32 {
        self.pinned_progress.unwrap_or_else(|| self.page.progress())
    }

    fn dispose(&mut self) {
        if let FieldState::Ready(engine) = &mut self.state {
            let mut host = EguiHost {
                ctx: &self.ctx,
                visible: false,
                reduced_motion: self.reduced_motion,
            };
            engine.dispose(&mut host);
        }
    }
}

impl eframe::App for FieldApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.fps.record(ctx);

        let (minimized, close_requested) = ctx.input(|input| {
            (
                input.viewport().minimized.unwrap_or(false),
                input.viewport().close_requested(),
            )
        });
        if close_requested {
            self.dispose();
        }

        let [r, g, b] = self.config.palette.background;
        let background = Color32::from_rgb(r, g, b);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(background))
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
                self.handle_keys(ctx, rect.height());

                let viewport = Viewport::new(rect.width(), rect.height(), ctx.pixels_per_point());
                if matches!(self.state, FieldState::Pending) {
                    self.state = self.make_engine(viewport);
                }

                let pointer = match response.hover_pos() {
                    Some(position) => PointerState {
                        position: position - rect.min,
                        active: true,
                    },
                    None => PointerState::default(),
                };
                let signals = Signals {
                    progress: self.progress(),
                    pointer,
                    viewport,
                    origin: rect.min,
                };

                let FieldState::Ready(engine) = &mut self.state else {
                    return;
                };
                let mut host = EguiHost {
                    ctx,
                    visible: !minimized,
                    reduced_motion: self.reduced_motion,
                };
                engine.tick(&signals, &mut host, &mut self.surface);

                let painter = ui.painter_at(rect);
                painter.extend(self.surface.take_shapes());

                if self.show_hud {
                    hud::draw(&painter, rect, &**engine, &self.fps);
                }
            });
    }
}

impl Drop for FieldApp {
    fn drop(&mut self) {
        self.dispose();
    }
}
