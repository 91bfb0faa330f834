use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Forces a ratio into `[0, 1]`. Non-finite input becomes `0`.
pub fn clamp01(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    let t = if span.abs() <= f32::EPSILON {
        if x >= edge1 { 1.0 } else { 0.0 }
    } else {
        clamp01((x - edge0) / span)
    };
    t * t * (3.0 - (2.0 * t))
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + ((to - from) * t)
}

/// Two stable values in `[0, 1)` derived from an ordered index pair.
pub fn stable_pair(from: usize, to: usize) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    (from, to).hash(&mut hasher);
    let hash = hasher.finish();

    let a = ((hash & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0)) as f32;
    let b = (((hash >> 32) & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0)) as f32;
    (a.min(0.999_999), b.min(0.999_999))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn clamp01_flattens_non_finite_values() {
        assert_eq!(clamp01(f32::NAN), 0.0);
        assert_eq!(clamp01(f32::INFINITY), 0.0);
        assert_eq!(clamp01(-3.0), 0.0);
        assert_eq!(clamp01(7.5), 1.0);
        assert_abs_diff_eq!(clamp01(0.42), 0.42);
    }

    #[test]
    fn smoothstep_hits_edges_and_midpoint() {
        assert_eq!(smoothstep(0.2, 0.75, 0.0), 0.0);
        assert_eq!(smoothstep(0.2, 0.75, 1.0), 1.0);
        assert_abs_diff_eq!(smoothstep(0.0, 1.0, 0.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn smoothstep_with_collapsed_edges_is_a_step() {
        assert_eq!(smoothstep(0.5, 0.5, 0.4), 0.0);
        assert_eq!(smoothstep(0.5, 0.5, 0.5), 1.0);
    }

    #[test]
    fn stable_pair_is_deterministic_and_ordered() {
        assert_eq!(stable_pair(3, 9), stable_pair(3, 9));
        let (a, b) = stable_pair(12, 40);
        assert!((0.0..1.0).contains(&a));
        assert!((0.0..1.0).contains(&b));
    }
}
