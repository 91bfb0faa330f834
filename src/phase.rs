use crate::util::{clamp01, smoothstep};

/// Independent intensities of the three visual regimes. They overlap during
/// transitions and do not sum to one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseWeights {
    pub chaos: f32,
    pub cohere: f32,
    pub order: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Chaos,
    Cohere,
    Order,
}

impl PhaseWeights {
    /// Combined cohere/order weight driving edge reach and degree.
    pub fn connectivity_blend(self) -> f32 {
        (0.5 * self.cohere) + (0.5 * self.order)
    }

    pub fn dominant(self) -> Phase {
        if self.order >= self.cohere && self.order >= self.chaos {
            Phase::Order
        } else if self.cohere >= self.chaos {
            Phase::Cohere
        } else {
            Phase::Chaos
        }
    }
}

pub fn weights(progress: f32) -> PhaseWeights {
    let progress = clamp01(progress);
    PhaseWeights {
        chaos: 1.0 - smoothstep(0.0, 0.25, progress),
        cohere: smoothstep(0.20, 0.75, progress),
        order: smoothstep(0.70, 1.00, progress),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn endpoints_are_pure_regimes() {
        let start = weights(0.0);
        assert_eq!(start, PhaseWeights { chaos: 1.0, cohere: 0.0, order: 0.0 });
        assert_eq!(start.dominant(), Phase::Chaos);

        let end = weights(1.0);
        assert_eq!(end, PhaseWeights { chaos: 0.0, cohere: 1.0, order: 1.0 });
        assert_eq!(end.dominant(), Phase::Order);
        assert_abs_diff_eq!(end.connectivity_blend(), 1.0);
    }

    #[test]
    fn transition_windows_overlap() {
        let w = weights(0.22);
        assert!(w.chaos > 0.0 && w.cohere > 0.0);

        let w = weights(0.72);
        assert!(w.cohere > 0.0 && w.order > 0.0);
        assert_eq!(weights(0.5).dominant(), Phase::Cohere);
    }

    #[test]
    fn degenerate_progress_is_clamped() {
        assert_eq!(weights(f32::NAN), weights(0.0));
        assert_eq!(weights(-4.0), weights(0.0));
        assert_eq!(weights(12.0), weights(1.0));
    }

    #[test]
    fn pure_chaos_has_no_connectivity() {
        assert_eq!(weights(0.1).connectivity_blend(), 0.0);
    }

    proptest! {
        #[test]
        fn weights_stay_in_unit_range(p in 0.0f32..=1.0) {
            let w = weights(p);
            for value in [w.chaos, w.cohere, w.order] {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }

        #[test]
        fn chaos_falls_and_order_rises(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(weights(low).chaos >= weights(high).chaos);
            prop_assert!(weights(low).order <= weights(high).order);
        }
    }
}
