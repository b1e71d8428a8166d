//! The seam between the processing graph and whatever actually renders audio.
//!
//! A backend hands out opaque node ids, wires them together and accepts
//! parameter changes. [`crate::audio::engine::DspBackend`] is the built-in
//! implementation; hosts with their own audio stack implement the trait
//! themselves.

use crate::error::Result;

/// Opaque handle to a node created by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Opaque handle to the media engine's audio output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceHandle(pub u64);

/// What kind of processing a stage performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    LowShelf,
    Peaking,
    HighShelf,
    StereoPanner,
    Delay,
    Gain,
    Analyzer,
}

/// Construction settings for a stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSpec {
    pub kind: StageKind,
    /// Corner or centre frequency (filters only)
    pub frequency_hz: f32,
    /// Quality factor (filters only)
    pub q: f32,
    /// Longest delay the node must support (delay only)
    pub max_delay_seconds: f32,
}

impl StageSpec {
    fn of(kind: StageKind) -> Self {
        Self {
            kind,
            frequency_hz: 0.0,
            q: 1.0,
            max_delay_seconds: 0.0,
        }
    }

    pub fn low_shelf(frequency_hz: f32) -> Self {
        Self {
            frequency_hz,
            ..Self::of(StageKind::LowShelf)
        }
    }

    pub fn peaking(frequency_hz: f32, q: f32) -> Self {
        Self {
            frequency_hz,
            q,
            ..Self::of(StageKind::Peaking)
        }
    }

    pub fn high_shelf(frequency_hz: f32) -> Self {
        Self {
            frequency_hz,
            ..Self::of(StageKind::HighShelf)
        }
    }

    pub fn panner() -> Self {
        Self::of(StageKind::StereoPanner)
    }

    pub fn delay(max_delay_seconds: f32) -> Self {
        Self {
            max_delay_seconds,
            ..Self::of(StageKind::Delay)
        }
    }

    pub fn gain() -> Self {
        Self::of(StageKind::Gain)
    }

    pub fn analyzer() -> Self {
        Self::of(StageKind::Analyzer)
    }
}

/// Settable properties of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageParam {
    /// Linear level for gain stages, dB for filter stages
    Gain,
    Frequency,
    Q,
    Pan,
    /// Seconds
    DelayTime,
}

/// Graph-building and analysis operations a rendering backend provides
pub trait SignalBackend {
    /// Wrap the media engine's output as the head of the chain
    ///
    /// Fails with `UnsupportedEnvironment` when the host cannot route audio.
    fn create_source(&mut self, source: SourceHandle) -> Result<NodeId>;

    fn create_stage(&mut self, spec: StageSpec) -> Result<NodeId>;

    /// The output device node
    fn destination(&self) -> NodeId;

    /// Route `from`'s output into `to`
    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<()>;

    fn set_param(&mut self, node: NodeId, param: StageParam, value: f32) -> Result<()>;

    /// Current value of a node parameter
    fn param(&self, node: NodeId, param: StageParam) -> Result<f32>;

    /// Analyzer window length N (time-domain snapshots hold N bytes)
    fn window_size(&self, analyzer: NodeId) -> Result<usize>;

    /// Fill `out` with the newest time-domain window, 128 = silence
    fn read_time_domain(&mut self, analyzer: NodeId, out: &mut [u8]) -> Result<()>;

    /// Fill `out` with N/2 frequency magnitudes scaled to bytes
    fn read_frequency(&mut self, analyzer: NodeId, out: &mut [u8]) -> Result<()>;

    /// Disconnect and drop every node; later calls report `UnknownNode`
    fn release(&mut self);
}
