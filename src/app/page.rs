use phase_lattice::util::clamp01;

pub(in crate::app) const LINE_STEP: f32 = 48.0;
pub(in crate::app) const SCREEN_STEP: f32 = 0.9;

/// Stand-in for a scrollable document `screens` viewports tall. Position is
/// kept as a fraction so resizing the window does not move it.
#[derive(Debug)]
pub(in crate::app) struct VirtualPage {
    screens: f32,
    progress: f32,
}

impl VirtualPage {
    pub(in crate::app) fn new(screens: f32) -> Self {
        Self {
            screens: screens.max(1.0),
            progress: 0.0,
        }
    }

    /// Scrollable distance in pixels for a viewport of `height`.
    fn travel(&self, height: f32) -> f32 {
        (self.screens - 1.0) * height.max(0.0)
    }

    pub(in crate::app) fn scroll_by(&mut self, pixels: f32, viewport_height: f32) {
        let travel = self.travel(viewport_height);
        if travel <= f32::EPSILON || !pixels.is_finite() {
            return;
        }
        self.progress = clamp01(self.progress + (pixels / travel));
    }

    pub(in crate::app) fn jump_to(&mut self, progress: f32) {
        self.progress = clamp01(progress);
    }

    pub(in crate::app) fn progress(&self) -> f32 {
        self.progress
    }
}
