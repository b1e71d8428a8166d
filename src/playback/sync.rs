//! Routing of parameter changes to the stage (or engine) that realises them.

use crate::audio::backend::SignalBackend;
use crate::audio::graph::{GraphState, ProcessingGraph};
use crate::error::{PlayerError, Result};
use crate::params::{Parameter, ParameterState};
use crate::playback::media::MediaEngine;

/// Where a parameter's value ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    GainLevel,
    PlaybackSpeed,
    BassGain,
    MidGain,
    TrebleGain,
    PanPosition,
    DelayTime,
}

/// Dispatch table, one row per parameter
const ROUTES: [(Parameter, SyncTarget); 7] = [
    (Parameter::Volume, SyncTarget::GainLevel),
    (Parameter::PlaybackRate, SyncTarget::PlaybackSpeed),
    (Parameter::Bass, SyncTarget::BassGain),
    (Parameter::Mid, SyncTarget::MidGain),
    (Parameter::Treble, SyncTarget::TrebleGain),
    (Parameter::Pan, SyncTarget::PanPosition),
    (Parameter::Delay, SyncTarget::DelayTime),
];

/// Outcome of pushing one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The target received the value
    Pushed,
    /// No target yet; the value waits in [`ParameterState`] for the init snapshot
    Held,
}

/// Pushes parameter values to their targets through [`ROUTES`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncBinder;

impl SyncBinder {
    pub fn target(parameter: Parameter) -> SyncTarget {
        // Rows follow the declaration order of `Parameter`
        ROUTES[parameter as usize].1
    }

    /// Push an already clamped value to wherever `parameter` is realised
    pub fn apply_parameter<B: SignalBackend, M: MediaEngine>(
        &self,
        graph: &mut ProcessingGraph<B>,
        engine: &mut M,
        parameter: Parameter,
        value: f64,
    ) -> Result<Applied> {
        let target = Self::target(parameter);
        if target != SyncTarget::PlaybackSpeed {
            match graph.state() {
                GraphState::Initialized(_) => {}
                GraphState::TornDown => return Err(PlayerError::SessionEnded),
                GraphState::Uninitialized | GraphState::Unsupported(_) => {
                    tracing::trace!("{} = {} held until the graph exists", parameter, value);
                    return Ok(Applied::Held);
                }
            }
        }

        match target {
            SyncTarget::PlaybackSpeed => engine.set_playback_speed(value),
            SyncTarget::GainLevel => graph.set_gain(value)?,
            SyncTarget::BassGain => graph.set_bass(value)?,
            SyncTarget::MidGain => graph.set_mid(value)?,
            SyncTarget::TrebleGain => graph.set_treble(value)?,
            SyncTarget::PanPosition => graph.set_pan(value)?,
            SyncTarget::DelayTime => graph.set_delay(value)?,
        }
        Ok(Applied::Pushed)
    }

    /// Re-push every parameter, making `params` authoritative again
    pub fn apply_all<B: SignalBackend, M: MediaEngine>(
        &self,
        graph: &mut ProcessingGraph<B>,
        engine: &mut M,
        params: &ParameterState,
    ) -> Result<()> {
        for (parameter, value) in params.values() {
            self.apply_parameter(graph, engine, parameter, value)?;
        }
        Ok(())
    }
}
