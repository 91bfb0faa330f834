//! A field of drifting nodes whose links and colors morph from disorder to a
//! lattice as an external progress value moves from 0 to 1.

pub mod config;
pub mod engine;
pub mod field;
pub mod graph;
pub mod phase;
pub mod random;
pub mod render;
pub mod scheduler;
pub mod util;

pub use config::{FieldConfig, PaletteRamp, ReducedMotion};
pub use engine::{FieldEngine, SetupError, Signals, TickOutcome};
pub use field::{PointerState, Viewport};
pub use phase::{Phase, PhaseWeights};
pub use random::{RandomSource, RngSource, SequenceSource};
pub use render::Surface;
pub use scheduler::{FrameHost, SchedulerState};
