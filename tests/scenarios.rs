use approx::assert_abs_diff_eq;
use eframe::egui::Pos2;
use phase_lattice::config::{EdgeConfig, MotionConfig, PopulationConfig};
use phase_lattice::field::{DEPTH_MAX, DEPTH_MIN, Motion, NodeField};
use phase_lattice::graph::EdgeGraph;
use phase_lattice::phase::weights;
use phase_lattice::{
    FieldConfig, FieldEngine, FrameHost, PointerState, RngSource, SchedulerState, Signals, Surface,
    TickOutcome, Viewport,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Default)]
struct TestHost {
    hidden: bool,
    requests: usize,
}

impl FrameHost for TestHost {
    fn request_tick(&mut self) {
        self.requests += 1;
    }

    fn cancel(&mut self) {}

    fn is_visible(&self) -> bool {
        !self.hidden
    }

    fn prefers_reduced_motion(&self) -> bool {
        false
    }
}

fn seeded(seed: u64) -> RngSource<SmallRng> {
    RngSource(SmallRng::seed_from_u64(seed))
}

fn engine(width: f32, height: f32, seed: u64) -> FieldEngine<RngSource<SmallRng>> {
    let viewport = Viewport::new(width, height, 1.0);
    FieldEngine::initialize(FieldConfig::default(), viewport, seeded(seed)).unwrap()
}

fn signals(progress: f32, width: f32, height: f32) -> Signals {
    Signals {
        progress,
        pointer: PointerState::default(),
        viewport: Viewport::new(width, height, 1.0),
        origin: Pos2::ZERO,
    }
}

#[test]
fn top_of_page_is_pure_chaos_without_edges() {
    let mut engine = engine(1920.0, 1080.0, 1);
    let mut host = TestHost::default();
    let mut surface = Surface::default();

    let outcome = engine.tick(&signals(0.0, 1920.0, 1080.0), &mut host, &mut surface);

    assert_eq!(outcome, TickOutcome::Static);
    let w = engine.weights();
    assert_eq!((w.chaos, w.cohere, w.order), (1.0, 0.0, 0.0));
    assert!(engine.edges().is_empty());
    assert_eq!(engine.nodes().len(), 1200);
}

#[test]
fn bottom_of_page_is_a_full_lattice() {
    let mut engine = engine(1920.0, 1080.0, 2);
    let mut host = TestHost::default();
    let mut surface = Surface::default();

    let outcome = engine.tick(&signals(1.0, 1920.0, 1080.0), &mut host, &mut surface);

    assert_eq!(outcome, TickOutcome::Dynamic);
    let w = engine.weights();
    assert_eq!((w.chaos, w.cohere, w.order), (0.0, 1.0, 1.0));
    assert_eq!(engine.edge_cap(), EdgeConfig::default().max_k);
    assert_abs_diff_eq!(engine.max_distance(), 1.5 * engine.base_distance(), epsilon = 1e-4);

    let mut degrees = vec![0usize; engine.nodes().len()];
    for edge in engine.edges() {
        degrees[edge.from] += 1;
        assert!(edge.distance < engine.max_distance());
        assert!((0.0..1.0).contains(&edge.pulse_t));
    }
    assert!(degrees.iter().all(|&degree| degree <= EdgeConfig::default().max_k));
}

#[test]
fn shrinking_the_window_reseeds_a_quarter_of_the_nodes() {
    let mut engine = engine(1920.0, 1080.0, 3);
    let mut host = TestHost::default();
    let mut surface = Surface::default();
    let base = engine.base_distance();

    engine.tick(&signals(0.6, 960.0, 540.0), &mut host, &mut surface);

    assert_eq!(engine.nodes().len(), 300);
    assert_abs_diff_eq!(engine.base_distance(), base * 0.5, epsilon = 1e-4);
    for node in engine.nodes() {
        assert!(node.x <= 960.0 && node.y <= 540.0);
    }
}

#[test]
fn scrolling_through_the_page_keeps_every_node_inside() {
    let mut engine = engine(800.0, 600.0, 4);
    let mut host = TestHost::default();
    let mut surface = Surface::default();

    for tick in 0..240 {
        let progress = tick as f32 / 240.0;
        let mut frame = signals(progress, 800.0, 600.0);
        frame.pointer = PointerState {
            position: eframe::egui::vec2(400.0, 300.0),
            active: tick % 2 == 0,
        };
        engine.tick(&frame, &mut host, &mut surface);
    }

    for node in engine.nodes() {
        assert!(node.x >= 20.0 && node.x <= 780.0);
        assert!(node.y >= 20.0 && node.y <= 580.0);
        assert!((DEPTH_MIN..=DEPTH_MAX).contains(&node.z));
    }
    assert_eq!(host.requests, 240);
}

#[test]
fn minimizing_pauses_until_visible() {
    let mut engine = engine(800.0, 600.0, 5);
    let mut host = TestHost {
        hidden: true,
        ..TestHost::default()
    };
    let mut surface = Surface::default();

    assert_eq!(
        engine.tick(&signals(0.5, 800.0, 600.0), &mut host, &mut surface),
        TickOutcome::Skipped
    );
    assert_eq!(engine.state(), SchedulerState::Paused);

    host.hidden = false;
    assert_eq!(
        engine.tick(&signals(0.5, 800.0, 600.0), &mut host, &mut surface),
        TickOutcome::Dynamic
    );
    assert_eq!(engine.state(), SchedulerState::Running);
}

#[test]
fn rebuild_depends_only_on_positions() {
    let mut field = NodeField::new(PopulationConfig::default(), MotionConfig::default());
    field.initialize(1280.0, 720.0, 1.0, &mut seeded(6));
    let mut graph = EdgeGraph::new(EdgeConfig::default());
    graph.resize(Viewport::new(1280.0, 720.0, 1.0));

    let first = graph.rebuild(field.nodes(), weights(0.7)).to_vec();
    let second = graph.rebuild(field.nodes(), weights(0.7)).to_vec();
    assert_eq!(first, second);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn nodes_never_escape(
        seed in any::<u64>(),
        width in 60.0f32..1600.0,
        height in 60.0f32..1000.0,
        ticks in 1usize..120,
        progress in 0.0f32..=1.0,
    ) {
        let mut field = NodeField::new(PopulationConfig::default(), MotionConfig::default());
        let mut rng = seeded(seed);
        field.initialize(width, height, 1.0, &mut rng);

        for tick in 0..ticks {
            let step = Motion {
                weights: weights(progress),
                pointer: PointerState {
                    position: eframe::egui::vec2(width * 0.5, height * 0.5),
                    active: tick % 4 == 0,
                },
                progress,
                active: true,
                elapsed: tick as f32 / 60.0,
            };
            field.update(&step, &mut rng);
        }

        let (min, max) = field.bounds();
        for node in field.nodes() {
            prop_assert!(node.x >= min.x && node.x <= max.x);
            prop_assert!(node.y >= min.y && node.y <= max.y);
            prop_assert!((DEPTH_MIN..=DEPTH_MAX).contains(&node.z));
        }
    }
}
