//! The fixed signal chain between the media source and the output.

use crate::audio::backend::{NodeId, SignalBackend, SourceHandle, StageParam, StageSpec};
use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};
use crate::params::ParameterState;

/// Node ids of a built chain, in signal order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphHandle {
    pub source: NodeId,
    pub bass: NodeId,
    pub mid: NodeId,
    pub treble: NodeId,
    pub pan: NodeId,
    pub delay: NodeId,
    pub gain: NodeId,
    pub analyzer: NodeId,
}

impl GraphHandle {
    /// Stages in connection order, source first, without the destination
    pub fn chain(&self) -> [NodeId; 8] {
        [
            self.source,
            self.bass,
            self.mid,
            self.treble,
            self.pan,
            self.delay,
            self.gain,
            self.analyzer,
        ]
    }
}

/// Lifecycle of the processing graph
#[derive(Debug, Clone, PartialEq)]
pub enum GraphState {
    Uninitialized,
    Initialized(GraphHandle),
    /// The backend refused to build; never retried
    Unsupported(String),
    TornDown,
}

/// Owns the backend and the one signal chain built on it
pub struct ProcessingGraph<B: SignalBackend> {
    backend: B,
    config: PlayerConfig,
    state: GraphState,
}

impl<B: SignalBackend> ProcessingGraph<B> {
    pub fn new(backend: B, config: PlayerConfig) -> Self {
        Self {
            backend,
            config,
            state: GraphState::Uninitialized,
        }
    }

    pub fn state(&self) -> &GraphState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, GraphState::Initialized(_))
    }

    pub fn handle(&self) -> Option<&GraphHandle> {
        match &self.state {
            GraphState::Initialized(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Build the chain and apply the current parameter snapshot
    ///
    /// Idempotent: once initialized, later calls return the existing
    /// handle without touching the backend.
    pub fn initialize(&mut self, source: SourceHandle, params: &ParameterState) -> Result<&GraphHandle> {
        if self.is_initialized() {
            tracing::trace!("graph already initialized");
            return self.handle().ok_or(PlayerError::GraphNotInitialized);
        }
        match &self.state {
            GraphState::Unsupported(reason) => {
                return Err(PlayerError::UnsupportedEnvironment(reason.clone()));
            }
            GraphState::TornDown => return Err(PlayerError::SessionEnded),
            GraphState::Uninitialized | GraphState::Initialized(_) => {}
        }

        match self.build(source) {
            Ok(handle) => {
                self.state = GraphState::Initialized(handle);
                self.apply_snapshot(params)?;
                tracing::info!("processing graph built: {:?}", handle);
                self.handle().ok_or(PlayerError::GraphNotInitialized)
            }
            Err(err) => {
                let reason = match &err {
                    PlayerError::UnsupportedEnvironment(reason) => reason.clone(),
                    other => other.to_string(),
                };
                tracing::warn!("audio graph unavailable, playing unshaped: {}", reason);
                // Drop whatever got built before the failure
                self.backend.release();
                self.state = GraphState::Unsupported(reason.clone());
                Err(PlayerError::UnsupportedEnvironment(reason))
            }
        }
    }

    fn build(&mut self, source: SourceHandle) -> Result<GraphHandle> {
        let config = &self.config;
        let backend = &mut self.backend;

        let source = backend.create_source(source)?;
        let bass = backend.create_stage(StageSpec::low_shelf(config.bass_frequency_hz))?;
        let mid = backend.create_stage(StageSpec::peaking(config.mid_frequency_hz, config.mid_q))?;
        let treble = backend.create_stage(StageSpec::high_shelf(config.treble_frequency_hz))?;
        let pan = backend.create_stage(StageSpec::panner())?;
        let delay = backend.create_stage(StageSpec::delay(config.max_delay_seconds))?;
        let gain = backend.create_stage(StageSpec::gain())?;
        let analyzer = backend.create_stage(StageSpec::analyzer())?;

        let handle = GraphHandle {
            source,
            bass,
            mid,
            treble,
            pan,
            delay,
            gain,
            analyzer,
        };

        let chain = handle.chain();
        for pair in chain.windows(2) {
            backend.connect(pair[0], pair[1])?;
        }
        let destination = backend.destination();
        backend.connect(analyzer, destination)?;

        Ok(handle)
    }

    /// Push every graph-bound value of `params` into its stage
    fn apply_snapshot(&mut self, params: &ParameterState) -> Result<()> {
        self.set_bass(params.bass())?;
        self.set_mid(params.mid())?;
        self.set_treble(params.treble())?;
        self.set_pan(params.pan())?;
        self.set_delay(params.delay())?;
        self.set_gain(params.volume())
    }

    fn set(&mut self, select: fn(&GraphHandle) -> NodeId, param: StageParam, value: f64) -> Result<()> {
        let node = match &self.state {
            GraphState::Initialized(handle) => select(handle),
            GraphState::TornDown => return Err(PlayerError::SessionEnded),
            GraphState::Uninitialized | GraphState::Unsupported(_) => {
                return Err(PlayerError::GraphNotInitialized)
            }
        };
        self.backend.set_param(node, param, value as f32)
    }

    /// Output level, linear 0..1
    pub fn set_gain(&mut self, level: f64) -> Result<()> {
        self.set(|h| h.gain, StageParam::Gain, level)
    }

    /// Low-shelf gain in dB
    pub fn set_bass(&mut self, db: f64) -> Result<()> {
        self.set(|h| h.bass, StageParam::Gain, db)
    }

    pub fn set_mid(&mut self, db: f64) -> Result<()> {
        self.set(|h| h.mid, StageParam::Gain, db)
    }

    pub fn set_treble(&mut self, db: f64) -> Result<()> {
        self.set(|h| h.treble, StageParam::Gain, db)
    }

    /// Stereo position, -1 left to 1 right
    pub fn set_pan(&mut self, position: f64) -> Result<()> {
        self.set(|h| h.pan, StageParam::Pan, position)
    }

    /// Delay time in seconds
    pub fn set_delay(&mut self, seconds: f64) -> Result<()> {
        self.set(|h| h.delay, StageParam::DelayTime, seconds)
    }

    /// Analyzer window length, once the chain exists
    pub fn window_size(&self) -> Option<usize> {
        let handle = self.handle()?;
        self.backend.window_size(handle.analyzer).ok()
    }

    /// Copy the analyzer's time-domain bytes into `out`
    pub fn read_waveform(&mut self, out: &mut [u8]) -> Result<()> {
        let analyzer = self.analyzer_node()?;
        self.backend.read_time_domain(analyzer, out)
    }

    /// Copy the analyzer's frequency bytes into `out`
    pub fn read_spectrum(&mut self, out: &mut [u8]) -> Result<()> {
        let analyzer = self.analyzer_node()?;
        self.backend.read_frequency(analyzer, out)
    }

    fn analyzer_node(&self) -> Result<NodeId> {
        match &self.state {
            GraphState::Initialized(handle) => Ok(handle.analyzer),
            GraphState::TornDown => Err(PlayerError::SessionEnded),
            _ => Err(PlayerError::GraphNotInitialized),
        }
    }

    /// Disconnect and release every node; terminal
    pub fn teardown(&mut self) {
        if self.state == GraphState::TornDown {
            return;
        }
        if self.is_initialized() {
            self.backend.release();
        }
        self.state = GraphState::TornDown;
        tracing::debug!("processing graph torn down");
    }
}
