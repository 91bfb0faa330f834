use std::f32::consts::TAU;

use eframe::egui::{Color32, Mesh, Pos2, Shape, Stroke, Vec2, vec2};

pub const MIN_RADIUS: f32 = 0.35;
pub const MIN_ALPHA: f32 = 0.02;

const GRADIENT_SEGMENTS: u32 = 48;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Normal,
    /// Colors add onto what is already painted.
    Additive,
}

/// Frame-local list of shapes in paint order. Coordinates handed to it are
/// relative to the field's top-left corner.
#[derive(Default)]
pub struct Surface {
    origin: Pos2,
    blend: BlendMode,
    shapes: Vec<Shape>,
}

pub(super) fn floor_radius(radius: f32) -> f32 {
    if radius.is_finite() {
        radius.max(MIN_RADIUS)
    } else {
        MIN_RADIUS
    }
}

pub(super) fn floor_alpha(alpha: f32) -> f32 {
    if alpha.is_finite() {
        alpha.clamp(MIN_ALPHA, 1.0)
    } else {
        MIN_ALPHA
    }
}

impl Surface {
    pub fn new(origin: Pos2) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Starts a new frame at `origin`, dropping the previous shapes.
    pub fn begin(&mut self, origin: Pos2) {
        self.origin = origin;
        self.blend = BlendMode::Normal;
        self.shapes.clear();
    }

    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    pub fn set_blend(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn take_shapes(&mut self) -> Vec<Shape> {
        std::mem::take(&mut self.shapes)
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn at(&self, local: Vec2) -> Pos2 {
        self.origin + local
    }

    fn blended(&self, color: Color32) -> Color32 {
        match self.blend {
            BlendMode::Normal => color,
            // egui treats premultiplied color with zero alpha as additive.
            BlendMode::Additive => {
                Color32::from_rgba_premultiplied(color.r(), color.g(), color.b(), 0)
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color32) {
        let color = self.blended(color);
        let shape = Shape::circle_filled(self.at(center), floor_radius(radius), color);
        self.shapes.push(shape);
    }

    pub fn stroke_path(&mut self, points: &[Vec2], width: f32, color: Color32) {
        if points.len() < 2 {
            return;
        }
        let color = self.blended(color);
        let points = points.iter().map(|point| self.at(*point)).collect::<Vec<_>>();
        self.shapes.push(Shape::line(points, Stroke::new(width.max(0.1), color)));
    }

    /// Triangle fan fading from `inner` at the center to `outer` at `radius`.
    pub fn radial_gradient(&mut self, center: Vec2, radius: f32, inner: Color32, outer: Color32) {
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }

        let mut mesh = Mesh::default();
        mesh.colored_vertex(self.at(center), self.blended(inner));
        for segment in 0..GRADIENT_SEGMENTS {
            let angle = (segment as f32 / GRADIENT_SEGMENTS as f32) * TAU;
            let rim = center + (vec2(angle.cos(), angle.sin()) * radius);
            mesh.colored_vertex(self.at(rim), self.blended(outer));
        }
        for segment in 0..GRADIENT_SEGMENTS {
            let current = segment + 1;
            let next = ((segment + 1) % GRADIENT_SEGMENTS) + 1;
            mesh.add_triangle(0, current, next);
        }
        self.shapes.push(Shape::mesh(mesh));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn shapes_are_offset_by_origin() {
        let mut surface = Surface::new(pos2(100.0, 50.0));
        surface.fill_circle(vec2(10.0, 10.0), 3.0, Color32::WHITE);
        let Shape::Circle(circle) = &surface.shapes()[0] else {
            panic!("expected a circle");
        };
        assert_eq!(circle.center, pos2(110.0, 60.0));
        assert_eq!(circle.radius, 3.0);
    }

    #[test]
    fn degenerate_radius_is_floored() {
        let mut surface = Surface::default();
        surface.fill_circle(Vec2::ZERO, -4.0, Color32::WHITE);
        surface.fill_circle(Vec2::ZERO, f32::NAN, Color32::WHITE);
        for shape in surface.shapes() {
            let Shape::Circle(circle) = shape else {
                panic!("expected a circle");
            };
            assert_eq!(circle.radius, MIN_RADIUS);
        }
    }

    #[test]
    fn additive_blend_zeroes_alpha() {
        let mut surface = Surface::default();
        surface.set_blend(BlendMode::Additive);
        surface.fill_circle(Vec2::ZERO, 2.0, Color32::from_rgba_unmultiplied(200, 100, 50, 128));
        let Shape::Circle(circle) = &surface.shapes()[0] else {
            panic!("expected a circle");
        };
        assert_eq!(circle.fill.a(), 0);
        assert!(circle.fill.r() > 0);
    }

    #[test]
    fn begin_resets_frame_state() {
        let mut surface = Surface::default();
        surface.set_blend(BlendMode::Additive);
        surface.fill_circle(Vec2::ZERO, 2.0, Color32::WHITE);
        surface.begin(pos2(1.0, 1.0));
        assert!(surface.is_empty());
        assert_eq!(surface.blend(), BlendMode::Normal);
    }

    #[test]
    fn gradient_is_a_closed_fan() {
        let mut surface = Surface::default();
        surface.radial_gradient(vec2(50.0, 50.0), 40.0, Color32::WHITE, Color32::TRANSPARENT);
        let Shape::Mesh(mesh) = &surface.shapes()[0] else {
            panic!("expected a mesh");
        };
        assert_eq!(mesh.vertices.len(), GRADIENT_SEGMENTS as usize + 1);
        assert_eq!(mesh.indices.len(), GRADIENT_SEGMENTS as usize * 3);

        surface.radial_gradient(Vec2::ZERO, 0.0, Color32::WHITE, Color32::TRANSPARENT);
        assert_eq!(surface.shapes().len(), 1);
    }

    #[test]
    fn single_point_paths_are_skipped() {
        let mut surface = Surface::default();
        surface.stroke_path(&[Vec2::ZERO], 1.0, Color32::WHITE);
        assert!(surface.is_empty());
    }
}
