use std::collections::VecDeque;

use eframe::egui::{Align2, Color32, Context, FontId, Painter, Rect, vec2};
use phase_lattice::{FieldEngine, RandomSource};

const FPS_SAMPLE_WINDOW: usize = 180;

#[derive(Default)]
pub(in crate::app) struct FpsMeter {
    current: f32,
    samples: VecDeque<f32>,
}

impl FpsMeter {
    pub(in crate::app) fn record(&mut self, ctx: &Context) {
        self.push_frame_time(ctx.input(|input| input.stable_dt));
    }

    fn push_frame_time(&mut self, dt: f32) {
        if dt <= f32::EPSILON {
            return;
        }

        self.current = (1.0 / dt).clamp(0.0, 1000.0);
        self.samples.push_back(self.current);
        while self.samples.len() > FPS_SAMPLE_WINDOW {
            self.samples.pop_front();
        }
    }

    fn text(&self) -> String {
        let mut parts = vec![format!("FPS {:.0}", self.current)];
        if !self.samples.is_empty() {
            let avg = self.samples.iter().sum::<f32>() / self.samples.len() as f32;
            parts.push(format!("avg {:.1}", avg));
        }
        if self.current > f32::EPSILON {
            parts.push(format!("{:.1} ms", 1000.0 / self.current));
        }
        parts.join(" | ")
    }
}

fn engine_lines<R: RandomSource>(engine: &FieldEngine<R>) -> [String; 3] {
    let weights = engine.weights();
    [
        format!(
            "progress {:.3} | {:?} | {:?}",
            engine.progress(),
            weights.dominant(),
            engine.state()
        ),
        format!(
            "chaos {:.2} | cohere {:.2} | order {:.2}",
            weights.chaos, weights.cohere, weights.order
        ),
        format!(
            "{} nodes | {} edges | k {} | reach {:.1}px",
            engine.nodes().len(),
            engine.edges().len(),
            engine.edge_cap(),
            engine.max_distance()
        ),
    ]
}

pub(in crate::app) fn draw<R: RandomSource>(
    painter: &Painter,
    rect: Rect,
    engine: &FieldEngine<R>,
    fps: &FpsMeter,
) {
    let font = FontId::monospace(12.0);
    let color = Color32::from_rgba_unmultiplied(235, 235, 235, 210);
    let mut cursor = rect.left_top() + vec2(10.0, 10.0);

    let lines = std::iter::once(fps.text()).chain(engine_lines(engine));
    for line in lines {
        let drawn = painter.text(cursor, Align2::LEFT_TOP, line, font.clone(), color);
        cursor.y = drawn.bottom() + 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_keeps_a_bounded_window() {
        let mut meter = FpsMeter::default();
        for _ in 0..(FPS_SAMPLE_WINDOW + 20) {
            meter.push_frame_time(1.0 / 60.0);
        }
        assert_eq!(meter.samples.len(), FPS_SAMPLE_WINDOW);
        assert!(meter.text().starts_with("FPS 60"));
    }

    #[test]
    fn zero_frame_time_is_ignored() {
        let mut meter = FpsMeter::default();
        meter.push_frame_time(0.0);
        assert!(meter.samples.is_empty());
        assert_eq!(meter.text(), "FPS 0");
    }
}
