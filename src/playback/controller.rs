use crate::audio::backend::SignalBackend;
use crate::audio::graph::ProcessingGraph;
use crate::error::{PlayerError, Result};
use crate::params::ParameterState;
use crate::playback::media::MediaEngine;

/// Maps transport intent onto the media engine
///
/// The first [`PlaybackController::toggle`] of a session is the activation
/// point that builds the processing graph.
pub struct PlaybackController<M: MediaEngine> {
    engine: M,
    activated: bool,
}

impl<M: MediaEngine> PlaybackController<M> {
    pub fn new(engine: M) -> Self {
        Self {
            engine,
            activated: false,
        }
    }

    pub fn engine(&self) -> &M {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut M {
        &mut self.engine
    }

    /// Whether the first toggle has happened
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Flip between playing and paused, returning the new `is_playing`
    ///
    /// An unsupported audio graph does not stop playback; the track then
    /// plays unshaped. A refused `play` leaves the state untouched.
    pub fn toggle<B: SignalBackend>(
        &mut self,
        graph: &mut ProcessingGraph<B>,
        params: &mut ParameterState,
    ) -> Result<bool> {
        if !self.activated {
            self.activated = true;
            match graph.initialize(self.engine.source(), params) {
                Ok(_) | Err(PlayerError::UnsupportedEnvironment(_)) => {}
                Err(err) => return Err(err),
            }
        }

        let transport = &mut params.transport;
        if transport.is_playing {
            self.engine.pause();
            transport.is_playing = false;
        } else {
            self.engine.play()?;
            transport.is_playing = true;
        }
        tracing::debug!("playing: {}", transport.is_playing);
        Ok(transport.is_playing)
    }

    /// Move to `seconds`, clamped into the track; returns the applied position
    pub fn seek(&mut self, params: &mut ParameterState, seconds: f64) -> Result<f64> {
        let position = params.transport.clamp_position(seconds)?;
        if position != seconds {
            tracing::debug!("seek to {} clamped to {}", seconds, position);
        }
        self.engine.set_position(position);
        params.transport.current_time = position;
        Ok(position)
    }

    /// Engine reported the track's duration
    pub fn on_metadata_loaded(&mut self, params: &mut ParameterState, duration: f64) {
        params.transport.set_duration(duration);
        tracing::debug!("duration {}", params.transport.duration_label());
    }

    /// Engine reported playback progress
    pub fn on_time_advanced(&mut self, params: &mut ParameterState, seconds: f64) {
        if seconds.is_nan() {
            tracing::trace!("ignoring NaN time update");
            return;
        }
        let transport = &mut params.transport;
        let seconds = seconds.max(0.0);
        // Before metadata the duration is unknown and cannot bound the position
        transport.current_time = if transport.duration > 0.0 {
            seconds.min(transport.duration)
        } else {
            seconds
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::test_support::{FakeEngine, RecordingBackend};

    fn setup() -> (
        PlaybackController<FakeEngine>,
        ProcessingGraph<RecordingBackend>,
        ParameterState,
    ) {
        (
            PlaybackController::new(FakeEngine::default()),
            ProcessingGraph::new(RecordingBackend::default(), PlayerConfig::default()),
            ParameterState::default(),
        )
    }

    #[test]
    fn double_toggle_restores_state_and_builds_once() {
        let (mut controller, mut graph, mut params) = setup();
        assert_eq!(controller.toggle(&mut graph, &mut params), Ok(true));
        let calls = graph.backend().calls.len();
        assert_eq!(controller.toggle(&mut graph, &mut params), Ok(false));

        assert!(!params.transport.is_playing);
        assert_eq!(controller.engine().plays, 1);
        assert_eq!(controller.engine().pauses, 1);
        assert_eq!(graph.backend().calls.len(), calls);
        assert!(graph.is_initialized());
    }

    #[test]
    fn refused_play_keeps_paused() {
        let (mut controller, mut graph, mut params) = setup();
        controller.engine_mut().refuse_play = true;
        assert!(matches!(
            controller.toggle(&mut graph, &mut params),
            Err(PlayerError::Media(_))
        ));
        assert!(!params.transport.is_playing);
    }

    #[test]
    fn unsupported_graph_still_plays() {
        let mut controller = PlaybackController::new(FakeEngine::default());
        let mut graph = ProcessingGraph::new(RecordingBackend::unsupported(), PlayerConfig::default());
        let mut params = ParameterState::default();

        assert_eq!(controller.toggle(&mut graph, &mut params), Ok(true));
        assert_eq!(controller.engine().plays, 1);
        assert!(!graph.is_initialized());
    }

    #[test]
    fn seek_clamps_into_track() {
        let (mut controller, _graph, mut params) = setup();
        controller.on_metadata_loaded(&mut params, 120.0);

        assert_eq!(controller.seek(&mut params, -5.0), Ok(0.0));
        assert_eq!(controller.seek(&mut params, 500.0), Ok(120.0));
        assert_eq!(controller.engine().position, 120.0);
        assert_eq!(params.transport.current_time, 120.0);
        assert!(controller.seek(&mut params, f64::NAN).is_err());
        assert_eq!(params.transport.current_time, 120.0);
    }

    #[test]
    fn time_updates_never_pass_duration() {
        let (mut controller, mut graph, mut params) = setup();
        controller.on_time_advanced(&mut params, 3.0);
        assert_eq!(params.transport.current_time, 3.0);

        controller.on_metadata_loaded(&mut params, 2.5);
        assert_eq!(params.transport.current_time, 2.5);
        controller.on_time_advanced(&mut params, 9.0);
        assert_eq!(params.transport.current_time, 2.5);

        // Notifications never build the graph
        assert!(graph.backend().calls.is_empty());
        assert_eq!(graph.set_gain(1.0), Err(PlayerError::GraphNotInitialized));
    }
}
