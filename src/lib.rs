//! Single-track player core: a fixed tone/pan/delay/gain chain, transport
//! control and a per-frame waveform view.
//!
//! A host supplies the media engine, the display surface and the frame
//! clock, then drives everything through one [`Session`].

pub mod audio;
pub mod config;
pub mod error;
pub mod params;
pub mod playback;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use audio::{DspBackend, ProcessingGraph, SignalBackend};
pub use config::PlayerConfig;
pub use error::{PlayerError, Result};
pub use params::{Parameter, ParameterState, TransportState};
pub use playback::{MediaEngine, PlaybackController, SyncBinder};
pub use ui::{DisplaySurface, FrameScheduler, VisualMode, VisualizationLoop};

/// One playback instance, from creation to teardown
///
/// Owns the parameter state, the processing graph, the transport
/// controller and the draw loop. Dropping the session tears it down.
pub struct Session<M, B, D, F>
where
    M: MediaEngine,
    B: SignalBackend,
    D: DisplaySurface,
    F: FrameScheduler,
{
    params: ParameterState,
    graph: ProcessingGraph<B>,
    controller: PlaybackController<M>,
    binder: SyncBinder,
    visuals: VisualizationLoop,
    surface: D,
    scheduler: F,
    ended: bool,
}

impl<M, B, D, F> Session<M, B, D, F>
where
    M: MediaEngine,
    B: SignalBackend,
    D: DisplaySurface,
    F: FrameScheduler,
{
    pub fn new(engine: M, backend: B, surface: D, scheduler: F, config: PlayerConfig) -> Result<Self> {
        config.validate()?;

        let params = ParameterState::default();
        let mut controller = PlaybackController::new(engine);
        controller
            .engine_mut()
            .set_playback_speed(params.playback_rate());

        tracing::info!("session created");
        Ok(Self {
            params,
            graph: ProcessingGraph::new(backend, config),
            controller,
            binder: SyncBinder,
            visuals: VisualizationLoop::new(),
            surface,
            scheduler,
            ended: false,
        })
    }

    fn ensure_live(&self) -> Result<()> {
        if self.ended {
            return Err(PlayerError::SessionEnded);
        }
        Ok(())
    }

    pub fn params(&self) -> &ParameterState {
        &self.params
    }

    pub fn graph(&self) -> &ProcessingGraph<B> {
        &self.graph
    }

    /// Backend access, e.g. to take the built-in renderer after the first toggle
    pub fn backend_mut(&mut self) -> &mut B {
        self.graph.backend_mut()
    }

    pub fn engine(&self) -> &M {
        self.controller.engine()
    }

    pub fn engine_mut(&mut self) -> &mut M {
        self.controller.engine_mut()
    }

    pub fn visualization(&self) -> &VisualizationLoop {
        &self.visuals
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Play/pause; the first call builds the graph and starts the view
    pub fn toggle(&mut self) -> Result<bool> {
        self.ensure_live()?;
        let playing = self.controller.toggle(&mut self.graph, &mut self.params);

        if let Some(window) = self.graph.window_size() {
            self.visuals.start(window, &mut self.scheduler);
        }
        playing
    }

    pub fn seek(&mut self, seconds: f64) -> Result<f64> {
        self.ensure_live()?;
        self.controller.seek(&mut self.params, seconds)
    }

    /// Store a clamped value and push it to its target; returns the stored value
    pub fn set_parameter(&mut self, parameter: Parameter, value: f64) -> Result<f64> {
        self.ensure_live()?;
        let stored = self.params.set(parameter, value)?;
        self.binder.apply_parameter(
            &mut self.graph,
            self.controller.engine_mut(),
            parameter,
            stored,
        )?;
        Ok(stored)
    }

    /// Re-push every stored value to its target
    pub fn resync(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.binder
            .apply_all(&mut self.graph, self.controller.engine_mut(), &self.params)
    }

    pub fn set_visual_mode(&mut self, mode: VisualMode) {
        self.visuals.set_mode(mode);
    }

    pub fn on_metadata_loaded(&mut self, duration: f64) {
        if !self.ended {
            self.controller.on_metadata_loaded(&mut self.params, duration);
        }
    }

    pub fn on_time_advanced(&mut self, seconds: f64) {
        if !self.ended {
            self.controller.on_time_advanced(&mut self.params, seconds);
        }
    }

    /// Host display refresh; runs one visualization cycle
    pub fn on_frame(&mut self) -> Result<bool> {
        if self.ended {
            return Ok(false);
        }
        self.visuals
            .run_cycle(&mut self.graph, &mut self.surface, &mut self.scheduler)
    }

    /// Stop the view and release the graph; terminal and idempotent
    pub fn teardown(&mut self) {
        if self.ended {
            return;
        }
        self.visuals.stop();
        self.graph.teardown();
        self.ended = true;
        tracing::info!("session torn down");
    }
}

impl<M, B, D, F> Drop for Session<M, B, D, F>
where
    M: MediaEngine,
    B: SignalBackend,
    D: DisplaySurface,
    F: FrameScheduler,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
