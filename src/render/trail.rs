use std::collections::VecDeque;

use eframe::egui::Vec2;

use crate::field::Node;

/// Recent node positions, one frame per entry, newest last.
#[derive(Debug, Default)]
pub(super) struct Trails {
    frames: VecDeque<Vec<Vec2>>,
}

impl Trails {
    pub(super) fn clear(&mut self) {
        self.frames.clear();
    }

    pub(super) fn len(&self) -> usize {
        self.frames.len()
    }

    /// Appends the current positions and keeps at most `length` frames. A
    /// population change starts the history over.
    pub(super) fn record(&mut self, nodes: &[Node], length: usize) {
        if length == 0 {
            self.frames.clear();
            return;
        }
        if self.frames.back().is_some_and(|frame| frame.len() != nodes.len()) {
            self.frames.clear();
        }

        let mut recycled = None;
        while self.frames.len() >= length {
            recycled = self.frames.pop_front();
        }
        let mut frame = recycled.unwrap_or_default();
        frame.clear();
        frame.extend(nodes.iter().map(Node::position));
        self.frames.push_back(frame);
    }

    /// Path of node `index` as `(from, to, weight)` segments, oldest first.
    /// Weight grows to 1 at the newest segment.
    pub(super) fn segments(&self, index: usize) -> impl Iterator<Item = (Vec2, Vec2, f32)> + '_ {
        let spans = self.frames.len().saturating_sub(1).max(1) as f32;
        self.frames
            .iter()
            .zip(self.frames.iter().skip(1))
            .enumerate()
            .filter_map(move |(step, (older, newer))| {
                let from = *older.get(index)?;
                let to = *newer.get(index)?;
                Some((from, to, (step + 1) as f32 / spans))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn node_at(x: f32) -> Node {
        Node {
            x,
            y: 0.0,
            z: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            size: 1.0,
            is_accent: false,
            pulse_phase: 0.0,
        }
    }

    #[test]
    fn history_is_bounded() {
        let mut trails = Trails::default();
        for step in 0..10 {
            trails.record(&[node_at(step as f32)], 4);
        }
        assert_eq!(trails.len(), 4);

        let segments = trails.segments(0).collect::<Vec<_>>();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].0, vec2(6.0, 0.0));
        assert_eq!(segments[2].1, vec2(9.0, 0.0));
        assert_eq!(segments[2].2, 1.0);
        assert!(segments[0].2 < segments[1].2);
    }

    #[test]
    fn population_change_restarts_history() {
        let mut trails = Trails::default();
        trails.record(&[node_at(0.0)], 4);
        trails.record(&[node_at(1.0)], 4);
        trails.record(&[node_at(1.0), node_at(2.0)], 4);
        assert_eq!(trails.len(), 1);
        assert_eq!(trails.segments(0).count(), 0);
    }

    #[test]
    fn zero_length_disables_history() {
        let mut trails = Trails::default();
        trails.record(&[node_at(0.0)], 0);
        assert_eq!(trails.len(), 0);
    }
}
