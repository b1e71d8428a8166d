//! Built-in pure-Rust rendering backend.
//!
//! [`DspBackend`] is the control half: it owns node bookkeeping and the
//! analyzer readers, and publishes parameter changes through atomics.
//! [`ChainRenderer`] is the audio half: it is taken once the chain is
//! wired and moved to whatever thread pulls audio.

use crate::audio::analyzer::{create_analyzer_channels, AnalyzerReader, AnalyzerTap};
use crate::audio::backend::{NodeId, SignalBackend, SourceHandle, StageKind, StageParam, StageSpec};
use crate::audio::biquad::{BiquadFilter, FilterShape};
use crate::audio::delay::DelayLine;
use crate::audio::panner::pan_frame;
use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};
use atomic_float::AtomicF32;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Parameter cells shared between the control side and the renderer
/// Control side writes, audio thread reads once per block
#[derive(Debug)]
struct StageControls {
    gain: AtomicF32,
    frequency: AtomicF32,
    q: AtomicF32,
    pan: AtomicF32,
    delay_time: AtomicF32,
}

impl StageControls {
    fn for_spec(spec: &StageSpec) -> Self {
        // Gain stages start at unity, filter gain is in dB and starts flat
        let gain = if spec.kind == StageKind::Gain { 1.0 } else { 0.0 };
        Self {
            gain: AtomicF32::new(gain),
            frequency: AtomicF32::new(spec.frequency_hz),
            q: AtomicF32::new(spec.q),
            pan: AtomicF32::new(0.0),
            delay_time: AtomicF32::new(0.0),
        }
    }

    fn cell(&self, param: StageParam) -> &AtomicF32 {
        match param {
            StageParam::Gain => &self.gain,
            StageParam::Frequency => &self.frequency,
            StageParam::Q => &self.q,
            StageParam::Pan => &self.pan,
            StageParam::DelayTime => &self.delay_time,
        }
    }
}

enum NodeKind {
    Destination,
    Source,
    Stage(StageSpec),
}

struct Node {
    kind: NodeKind,
    controls: Arc<StageControls>,
    /// Audio-side half, present until the renderer takes it
    tap: Option<AnalyzerTap>,
    /// Control-side half of an analyzer node
    reader: Option<AnalyzerReader>,
}

/// Pure-Rust [`SignalBackend`] rendering stereo `f32` frames
pub struct DspBackend {
    config: PlayerConfig,
    nodes: Vec<Option<Node>>,
    /// Outgoing connection per node, index = source node id
    outputs: Vec<Option<NodeId>>,
    source: Option<NodeId>,
    destination: NodeId,
    /// Cleared on release, renderers go silent from the next block
    active: Arc<AtomicBool>,
    released: bool,
}

impl DspBackend {
    pub fn new(config: &PlayerConfig) -> Self {
        let destination = Node {
            kind: NodeKind::Destination,
            controls: Arc::new(StageControls::for_spec(&StageSpec::gain())),
            tap: None,
            reader: None,
        };
        Self {
            config: config.clone(),
            nodes: vec![Some(destination)],
            outputs: vec![None],
            source: None,
            destination: NodeId(0),
            active: Arc::new(AtomicBool::new(true)),
            released: false,
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(PlayerError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(PlayerError::UnknownNode(id))
    }

    fn reader(&mut self, id: NodeId) -> Result<&mut AnalyzerReader> {
        self.node_mut(id)?
            .reader
            .as_mut()
            .ok_or(PlayerError::UnknownNode(id))
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        self.outputs.push(None);
        id
    }

    /// Build the audio-thread half by walking the chain from the source
    ///
    /// Fails until a source exists and its chain reaches the destination.
    /// Analyzer taps move into the renderer, so this succeeds once.
    pub fn take_renderer(&mut self) -> Result<ChainRenderer> {
        if self.released {
            return Err(PlayerError::SessionEnded);
        }
        let source = self.source.ok_or(PlayerError::GraphNotInitialized)?;

        // Validate the whole walk before moving any taps out
        let mut path = Vec::new();
        let mut current = source;
        while current != self.destination {
            if path.len() > self.nodes.len() {
                return Err(PlayerError::UnsupportedEnvironment(
                    "signal chain contains a cycle".to_string(),
                ));
            }
            let next = self.outputs[current.0].ok_or_else(|| {
                PlayerError::UnsupportedEnvironment(format!(
                    "{:?} is not connected towards the destination",
                    current
                ))
            })?;
            if next != self.destination {
                path.push(next);
            }
            current = next;
        }

        let sample_rate = self.config.sample_rate_hz;
        let mut stages = Vec::with_capacity(path.len());
        for id in path {
            let node = self.node_mut(id)?;
            let NodeKind::Stage(spec) = node.kind else {
                continue;
            };
            let controls = Arc::clone(&node.controls);
            let stage = match spec.kind {
                StageKind::LowShelf | StageKind::Peaking | StageKind::HighShelf => {
                    let shape = match spec.kind {
                        StageKind::LowShelf => FilterShape::LowShelf,
                        StageKind::HighShelf => FilterShape::HighShelf,
                        _ => FilterShape::Peaking,
                    };
                    StageProcessor::Filter {
                        filter: BiquadFilter::new(shape, spec.frequency_hz, spec.q, sample_rate),
                        controls,
                    }
                }
                StageKind::StereoPanner => StageProcessor::Panner { controls },
                StageKind::Delay => StageProcessor::Delay {
                    line: DelayLine::new(sample_rate, spec.max_delay_seconds),
                    controls,
                },
                StageKind::Gain => StageProcessor::Gain { controls },
                StageKind::Analyzer => {
                    let tap = node.tap.take().ok_or_else(|| {
                        PlayerError::UnsupportedEnvironment(
                            "renderer was already taken".to_string(),
                        )
                    })?;
                    StageProcessor::Analyzer { tap }
                }
            };
            stages.push(stage);
        }

        tracing::debug!("renderer built with {} stages", stages.len());
        Ok(ChainRenderer {
            stages,
            active: Arc::clone(&self.active),
        })
    }
}

impl SignalBackend for DspBackend {
    fn create_source(&mut self, source: SourceHandle) -> Result<NodeId> {
        if self.released {
            return Err(PlayerError::SessionEnded);
        }
        // A media output can only be wrapped once
        if self.source.is_some() {
            return Err(PlayerError::UnsupportedEnvironment(
                "media output is already routed into a graph".to_string(),
            ));
        }
        let id = self.push_node(Node {
            kind: NodeKind::Source,
            controls: Arc::new(StageControls::for_spec(&StageSpec::gain())),
            tap: None,
            reader: None,
        });
        self.source = Some(id);
        tracing::debug!("source {:?} wrapped as {:?}", source, id);
        Ok(id)
    }

    fn create_stage(&mut self, spec: StageSpec) -> Result<NodeId> {
        if self.released {
            return Err(PlayerError::SessionEnded);
        }
        let (tap, reader) = if spec.kind == StageKind::Analyzer {
            let (tap, reader) = create_analyzer_channels(
                self.config.analyzer_smoothing,
                self.config.analyzer_min_db,
                self.config.analyzer_max_db,
            );
            (Some(tap), Some(reader))
        } else {
            (None, None)
        };

        Ok(self.push_node(Node {
            kind: NodeKind::Stage(spec),
            controls: Arc::new(StageControls::for_spec(&spec)),
            tap,
            reader,
        }))
    }

    fn destination(&self) -> NodeId {
        self.destination
    }

    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        if matches!(self.node(from)?.kind, NodeKind::Destination) {
            return Err(PlayerError::UnknownNode(from));
        }
        if matches!(self.node(to)?.kind, NodeKind::Source) {
            return Err(PlayerError::UnknownNode(to));
        }
        self.outputs[from.0] = Some(to);
        Ok(())
    }

    fn set_param(&mut self, node: NodeId, param: StageParam, value: f32) -> Result<()> {
        self.node(node)?
            .controls
            .cell(param)
            .store(value, Ordering::Relaxed);
        Ok(())
    }

    fn param(&self, node: NodeId, param: StageParam) -> Result<f32> {
        Ok(self.node(node)?.controls.cell(param).load(Ordering::Relaxed))
    }

    fn window_size(&self, analyzer: NodeId) -> Result<usize> {
        self.node(analyzer)?
            .reader
            .as_ref()
            .map(AnalyzerReader::window_size)
            .ok_or(PlayerError::UnknownNode(analyzer))
    }

    fn read_time_domain(&mut self, analyzer: NodeId, out: &mut [u8]) -> Result<()> {
        self.reader(analyzer)?.read_time_domain(out);
        Ok(())
    }

    fn read_frequency(&mut self, analyzer: NodeId, out: &mut [u8]) -> Result<()> {
        self.reader(analyzer)?.read_frequency(out);
        Ok(())
    }

    fn release(&mut self) {
        self.active.store(false, Ordering::Release);
        self.nodes.clear();
        self.outputs.clear();
        self.source = None;
        self.released = true;
        tracing::debug!("backend released");
    }
}

/// One processing stage as seen by the audio thread
enum StageProcessor {
    Filter {
        filter: BiquadFilter,
        controls: Arc<StageControls>,
    },
    Panner {
        controls: Arc<StageControls>,
    },
    Delay {
        line: DelayLine,
        controls: Arc<StageControls>,
    },
    Gain {
        controls: Arc<StageControls>,
    },
    Analyzer {
        tap: AnalyzerTap,
    },
}

impl StageProcessor {
    fn process_block(&mut self, frames: &mut [[f32; 2]]) {
        match self {
            Self::Filter { filter, controls } => {
                filter.configure(
                    controls.frequency.load(Ordering::Relaxed),
                    controls.q.load(Ordering::Relaxed),
                    controls.gain.load(Ordering::Relaxed),
                );
                for frame in frames.iter_mut() {
                    *frame = filter.process(*frame);
                }
            }
            Self::Panner { controls } => {
                let pan = controls.pan.load(Ordering::Relaxed);
                for frame in frames.iter_mut() {
                    *frame = pan_frame(pan, *frame);
                }
            }
            Self::Delay { line, controls } => {
                let delay = line.delay_samples(controls.delay_time.load(Ordering::Relaxed));
                for frame in frames.iter_mut() {
                    *frame = line.process(*frame, delay);
                }
            }
            Self::Gain { controls } => {
                let gain = controls.gain.load(Ordering::Relaxed);
                for frame in frames.iter_mut() {
                    frame[0] *= gain;
                    frame[1] *= gain;
                }
            }
            Self::Analyzer { tap } => {
                for frame in frames.iter() {
                    tap.observe(*frame);
                }
                tap.publish();
            }
        }
    }
}

/// Audio-thread half of [`DspBackend`]
///
/// Parameter values are read once at the start of every stage's block, so
/// a change lands on the next block boundary. Real-time safe: no locks and
/// no allocations in [`ChainRenderer::process`].
pub struct ChainRenderer {
    stages: Vec<StageProcessor>,
    active: Arc<AtomicBool>,
}

impl ChainRenderer {
    /// Process one block of media output in place
    pub fn process(&mut self, frames: &mut [[f32; 2]]) {
        if !self.active.load(Ordering::Acquire) {
            frames.fill([0.0; 2]);
            return;
        }
        for stage in self.stages.iter_mut() {
            stage.process_block(frames);
        }
    }

    /// False once the backend has been released
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}
