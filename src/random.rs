use rand::Rng;

/// Source of uniform samples in `[0, 1)` shared by every stochastic step of
/// the field. Tests swap in a scripted sequence to pin trajectories.
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;

    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (self.next_unit() * (max - min))
    }

    /// Uniform in `[-half, half)`.
    fn centered(&mut self, half: f32) -> f32 {
        (self.next_unit() - 0.5) * 2.0 * half
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.next_unit() < probability
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_unit() * len as f32) as usize).min(len - 1)
    }
}

/// Adapts any `rand` generator.
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Replays a fixed cycle of samples.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value.clamp(0.0, 0.999_999)
    }
}
