pub mod analyzer;
pub mod backend;
pub mod biquad;
pub mod constants;
pub mod delay;
pub mod engine;
pub mod graph;
pub mod panner;

pub use backend::{NodeId, SignalBackend, SourceHandle, StageKind, StageParam, StageSpec};
pub use engine::{ChainRenderer, DspBackend};
pub use graph::{GraphHandle, GraphState, ProcessingGraph};
