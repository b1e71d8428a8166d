//! Recording doubles shared by the unit tests.

use crate::audio::backend::{NodeId, SignalBackend, SourceHandle, StageParam, StageSpec};
use crate::audio::constants::{ANALYZER_WINDOW_SIZE, WAVEFORM_MIDPOINT};
use crate::error::{PlayerError, Result};
use crate::playback::media::MediaEngine;
use crate::ui::surface::{DisplaySurface, FrameScheduler, Point, Stroke};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateSource(SourceHandle),
    CreateStage(StageSpec),
    Connect(NodeId, NodeId),
    SetParam(NodeId, StageParam, f32),
    Release,
}

/// Backend that records every call and serves canned analyzer bytes
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    unsupported: bool,
    released: bool,
    node_count: usize,
    params: HashMap<(NodeId, StageParam), f32>,
    time_domain: Vec<u8>,
    fail_next_read: bool,
}

impl RecordingBackend {
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    pub fn with_time_domain(bytes: Vec<u8>) -> Self {
        Self {
            time_domain: bytes,
            ..Self::default()
        }
    }

    /// Make the next analyzer read fail once
    pub fn fail_next_read(&mut self) {
        self.fail_next_read = true;
    }

    /// Spec each node was created from, by node id
    pub fn stage_specs(&self) -> HashMap<NodeId, StageSpec> {
        let mut specs = HashMap::new();
        let mut next = 0;
        for call in &self.calls {
            match call {
                Call::CreateSource(_) if !self.unsupported => next += 1,
                Call::CreateStage(spec) => {
                    next += 1;
                    specs.insert(NodeId(next), *spec);
                }
                _ => {}
            }
        }
        specs
    }

    pub fn connections(&self) -> Vec<(NodeId, NodeId)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Connect(from, to) => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    fn check(&self, node: NodeId) -> Result<()> {
        if self.released || node.0 > self.node_count {
            return Err(PlayerError::UnknownNode(node));
        }
        Ok(())
    }

    fn next_node(&mut self) -> NodeId {
        self.node_count += 1;
        NodeId(self.node_count)
    }
}

impl SignalBackend for RecordingBackend {
    fn create_source(&mut self, source: SourceHandle) -> Result<NodeId> {
        self.calls.push(Call::CreateSource(source));
        if self.unsupported {
            return Err(PlayerError::UnsupportedEnvironment(
                "no audio graph in this host".to_string(),
            ));
        }
        Ok(self.next_node())
    }

    fn create_stage(&mut self, spec: StageSpec) -> Result<NodeId> {
        self.calls.push(Call::CreateStage(spec));
        Ok(self.next_node())
    }

    fn destination(&self) -> NodeId {
        NodeId(0)
    }

    fn connect(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        self.calls.push(Call::Connect(from, to));
        Ok(())
    }

    fn set_param(&mut self, node: NodeId, param: StageParam, value: f32) -> Result<()> {
        self.check(node)?;
        self.calls.push(Call::SetParam(node, param, value));
        self.params.insert((node, param), value);
        Ok(())
    }

    fn param(&self, node: NodeId, param: StageParam) -> Result<f32> {
        self.check(node)?;
        Ok(self.params.get(&(node, param)).copied().unwrap_or(0.0))
    }

    fn window_size(&self, analyzer: NodeId) -> Result<usize> {
        self.check(analyzer)?;
        Ok(ANALYZER_WINDOW_SIZE)
    }

    fn read_time_domain(&mut self, analyzer: NodeId, out: &mut [u8]) -> Result<()> {
        self.check(analyzer)?;
        if std::mem::take(&mut self.fail_next_read) {
            return Err(PlayerError::UnknownNode(analyzer));
        }
        out.fill(WAVEFORM_MIDPOINT);
        let n = out.len().min(self.time_domain.len());
        out[..n].copy_from_slice(&self.time_domain[..n]);
        Ok(())
    }

    fn read_frequency(&mut self, analyzer: NodeId, out: &mut [u8]) -> Result<()> {
        self.check(analyzer)?;
        out.fill(0);
        Ok(())
    }

    fn release(&mut self) {
        self.calls.push(Call::Release);
        self.params.clear();
        self.released = true;
    }
}

/// Media engine that counts transport calls
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub plays: usize,
    pub pauses: usize,
    pub position: f64,
    pub duration: Option<f64>,
    pub speed: f64,
    pub refuse_play: bool,
}

impl MediaEngine for FakeEngine {
    fn play(&mut self) -> Result<()> {
        if self.refuse_play {
            return Err(PlayerError::Media("playback blocked".to_string()));
        }
        self.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn set_playback_speed(&mut self, rate: f64) {
        self.speed = rate;
    }

    fn source(&self) -> SourceHandle {
        SourceHandle(1)
    }
}

/// Surface that keeps every stroked polyline
#[derive(Debug)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub clears: usize,
    pub strokes: Vec<(Vec<Point>, Stroke)>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            clears: 0,
            strokes: Vec::new(),
        }
    }

    pub fn last_stroke(&self) -> Option<&(Vec<Point>, Stroke)> {
        self.strokes.last()
    }
}

impl DisplaySurface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        self.strokes.push((points.to_vec(), *stroke));
    }
}

#[derive(Debug, Default)]
pub struct CountingScheduler {
    pub requests: usize,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requests += 1;
    }
}
