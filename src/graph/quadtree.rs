use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 12;
/// Cells this small stop splitting, which bounds the depth when many nodes
/// share a spot.
const MIN_HALF_EXTENT: f32 = 0.5;

/// Point quadtree answering "which nodes lie within `radius` of here".
/// Leaves own copies of the positions, so a query needs nothing else.
pub(super) struct NeighborTree {
    root: Cell,
}

struct Cell {
    center: Vec2,
    half_extent: f32,
    points: Vec<(usize, Vec2)>,
    children: Option<Box<[Cell; 4]>>,
}

impl NeighborTree {
    /// `None` when there is nothing to index or a position is not finite.
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let (min, max) = positions.iter().try_fold(
            (vec2(f32::INFINITY, f32::INFINITY), vec2(f32::NEG_INFINITY, f32::NEG_INFINITY)),
            |(min, max), point| {
                (point.x.is_finite() && point.y.is_finite())
                    .then(|| (min.min(*point), max.max(*point)))
            },
        )?;
        if positions.is_empty() {
            return None;
        }

        let span = max - min;
        let mut root = Cell {
            center: (min + max) * 0.5,
            half_extent: (span.x.max(span.y) * 0.5) + 1.0,
            points: positions.iter().copied().enumerate().collect(),
            children: None,
        };
        root.split();
        Some(Self { root })
    }

    /// Appends `(distance, index)` for every point closer than `radius` to
    /// `origin`, except `skip`.
    pub(super) fn neighbors_within(
        &self,
        origin: Vec2,
        radius: f32,
        skip: usize,
        out: &mut Vec<(f32, usize)>,
    ) {
        self.root.visit(origin, radius, skip, out);
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.root.depth()
    }
}

fn quadrant(center: Vec2, point: Vec2) -> usize {
    usize::from(point.x >= center.x) | (usize::from(point.y >= center.y) << 1)
}

impl Cell {
    fn split(&mut self) {
        if self.points.len() <= LEAF_CAPACITY || self.half_extent <= MIN_HALF_EXTENT {
            return;
        }

        let center = self.center;
        let quarter = self.half_extent * 0.5;
        let mut children = Box::new(std::array::from_fn::<_, 4, _>(|slot| Cell {
            center: center
                + vec2(
                    if slot & 1 == 1 { quarter } else { -quarter },
                    if slot & 2 == 2 { quarter } else { -quarter },
                ),
            half_extent: quarter,
            points: Vec::new(),
            children: None,
        }));
        for (index, point) in self.points.drain(..) {
            children[quadrant(center, point)].points.push((index, point));
        }
        for child in children.iter_mut() {
            child.split();
        }
        self.children = Some(children);
    }

    /// Squared gap between the cell and a point; zero when inside.
    fn gap_sq(&self, point: Vec2) -> f32 {
        let dx = ((self.center.x - point.x).abs() - self.half_extent).max(0.0);
        let dy = ((self.center.y - point.y).abs() - self.half_extent).max(0.0);
        (dx * dx) + (dy * dy)
    }

    fn visit(&self, origin: Vec2, radius: f32, skip: usize, out: &mut Vec<(f32, usize)>) {
        if self.gap_sq(origin) > radius * radius {
            return;
        }

        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.visit(origin, radius, skip, out);
                }
            }
            None => {
                for &(index, point) in &self.points {
                    let distance = (point - origin).length();
                    if index != skip && distance < radius {
                        out.push((distance, index));
                    }
                }
            }
        }
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.children
            .as_ref()
            .map_or(0, |children| 1 + children.iter().map(Cell::depth).max().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(side: usize, spacing: f32) -> Vec<Vec2> {
        (0..side * side)
            .map(|index| vec2((index % side) as f32 * spacing, (index / side) as f32 * spacing))
            .collect()
    }

    fn sorted(mut found: Vec<(f32, usize)>) -> Vec<usize> {
        found.sort_by_key(|&(_, index)| index);
        found.into_iter().map(|(_, index)| index).collect()
    }

    #[test]
    fn build_rejects_empty_and_non_finite_input() {
        assert!(NeighborTree::build(&[]).is_none());
        assert!(NeighborTree::build(&[vec2(1.0, 1.0), vec2(f32::NAN, 1.0)]).is_none());
    }

    #[test]
    fn query_matches_a_linear_scan() {
        let positions = grid(20, 5.0);
        let tree = NeighborTree::build(&positions).unwrap();
        assert!(tree.depth() > 0);

        let origin = positions[210];
        let mut found = Vec::new();
        tree.neighbors_within(origin, 11.0, 210, &mut found);

        let expected = positions
            .iter()
            .enumerate()
            .filter(|&(index, point)| index != 210 && (*point - origin).length() < 11.0)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        assert!(!expected.is_empty());
        assert_eq!(sorted(found), expected);
    }

    #[test]
    fn stacked_points_stop_splitting() {
        let positions = vec![vec2(3.0, 3.0); 100];
        let tree = NeighborTree::build(&positions).unwrap();
        assert!(tree.depth() <= 3);

        let mut found = Vec::new();
        tree.neighbors_within(vec2(3.0, 3.0), 1.0, 0, &mut found);
        assert_eq!(found.len(), 99);
        assert!(found.iter().all(|&(distance, _)| distance == 0.0));
    }
}
