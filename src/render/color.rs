use eframe::egui::Color32;

use crate::config::{PaletteConfig, PaletteRamp};
use crate::util::{clamp01, lerp};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = clamp01(amount);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), channel(alpha))
}

fn channel(value: f32) -> u8 {
    (clamp01(value) * 255.0).round() as u8
}

/// `hue` in degrees, the rest in `[0, 1]`.
pub(super) fn hsl_color(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Color32 {
    let hue = (if hue.is_finite() { hue.rem_euclid(360.0) } else { 0.0 }) / 60.0;
    let saturation = clamp01(saturation);
    let lightness = clamp01(lightness);

    let chroma = (1.0 - ((2.0 * lightness) - 1.0).abs()) * saturation;
    let secondary = chroma * (1.0 - ((hue % 2.0) - 1.0).abs());
    let (r, g, b) = match hue as u32 {
        0 => (chroma, secondary, 0.0),
        1 => (secondary, chroma, 0.0),
        2 => (0.0, chroma, secondary),
        3 => (0.0, secondary, chroma),
        4 => (secondary, 0.0, chroma),
        _ => (chroma, 0.0, secondary),
    };
    let offset = lightness - (chroma * 0.5);

    Color32::from_rgba_unmultiplied(
        channel(r + offset),
        channel(g + offset),
        channel(b + offset),
        channel(alpha),
    )
}

/// Global node color ramp. Scroll progress, not per-node state, picks the
/// hue so the whole field shifts together.
#[derive(Clone, Debug)]
pub(super) struct Palette {
    config: PaletteConfig,
}

impl Palette {
    pub(super) fn new(config: PaletteConfig) -> Self {
        Self { config }
    }

    pub(super) fn node(&self, progress: f32, alpha: f32) -> Color32 {
        let t = clamp01(progress);
        if self.config.ramp == PaletteRamp::Stops {
            return with_alpha(self.stop_blend(t), alpha);
        }
        hsl_color(
            lerp(self.config.start_hue, self.config.end_hue, t),
            self.config.saturation,
            lerp(self.config.start_lightness, self.config.end_lightness, t),
            alpha,
        )
    }

    /// Two-segment RGB blend: first stop to second over the first half of
    /// progress, second to third over the rest.
    fn stop_blend(&self, t: f32) -> Color32 {
        let [first, second, third] = self.config.stops.map(|[r, g, b]| Color32::from_rgb(r, g, b));
        if t < 0.5 {
            blend_color(first, second, t * 2.0)
        } else {
            blend_color(second, third, (t - 0.5) * 2.0)
        }
    }

    /// Color at the chaos end of the ramp.
    pub(super) fn chaos(&self, alpha: f32) -> Color32 {
        self.node(0.0, alpha)
    }

    pub(super) fn accent(&self, alpha: f32) -> Color32 {
        hsl_color(
            self.config.accent_hue,
            self.config.saturation,
            self.config.accent_lightness,
            alpha,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues_convert_exactly() {
        assert_eq!(hsl_color(0.0, 1.0, 0.5, 1.0), Color32::from_rgb(255, 0, 0));
        assert_eq!(hsl_color(120.0, 1.0, 0.5, 1.0), Color32::from_rgb(0, 255, 0));
        assert_eq!(hsl_color(240.0, 1.0, 0.5, 1.0), Color32::from_rgb(0, 0, 255));
        assert_eq!(hsl_color(360.0, 1.0, 0.5, 1.0), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn lightness_extremes_are_black_and_white() {
        assert_eq!(hsl_color(200.0, 1.0, 0.0, 1.0), Color32::from_rgb(0, 0, 0));
        assert_eq!(hsl_color(200.0, 1.0, 1.0, 1.0), Color32::from_rgb(255, 255, 255));
    }

    #[test]
    fn non_finite_inputs_still_produce_a_color() {
        let color = hsl_color(f32::NAN, 1.0, f32::NAN, f32::INFINITY);
        assert_eq!(color.a(), 0);
    }

    #[test]
    fn palette_ramp_moves_with_progress() {
        let palette = Palette::new(PaletteConfig::default());
        assert_eq!(palette.node(0.0, 1.0), palette.chaos(1.0));
        assert_ne!(palette.node(0.0, 1.0), palette.node(1.0, 1.0));
        assert_ne!(palette.accent(1.0), palette.chaos(1.0));
        assert_eq!(palette.node(7.0, 1.0), palette.node(1.0, 1.0));
    }

    #[test]
    fn stop_ramp_passes_through_each_stop() {
        let palette = Palette::new(PaletteConfig {
            ramp: PaletteRamp::Stops,
            ..PaletteConfig::default()
        });
        assert_eq!(palette.node(0.0, 1.0), Color32::from_rgb(255, 60, 60));
        assert_eq!(palette.node(0.5, 1.0), Color32::from_rgb(0, 183, 255));
        assert_eq!(palette.node(1.0, 1.0), Color32::from_rgb(0, 255, 153));
        assert_eq!(palette.chaos(1.0), Color32::from_rgb(255, 60, 60));

        let quarter = palette.node(0.25, 1.0);
        assert!(quarter.r() > 0 && quarter.r() < 255);
        assert!(quarter.b() > 60 && quarter.b() < 255);
        assert_eq!(palette.node(0.5, 0.0).a(), 0);
    }

    #[test]
    fn blend_color_endpoints() {
        let base = Color32::from_rgb(10, 20, 30);
        let overlay = Color32::from_rgb(250, 240, 230);
        assert_eq!(blend_color(base, overlay, 0.0), base);
        assert_eq!(blend_color(base, overlay, 1.0), overlay);
    }
}
