//! Per-frame sampling and drawing of the analyzer output.

use crate::audio::backend::SignalBackend;
use crate::audio::graph::ProcessingGraph;
use crate::error::{PlayerError, Result};
use crate::ui::style::UITheme;
use crate::ui::surface::{DisplaySurface, FrameScheduler, Point};
use crate::ui::waveform::{spectrum_points, waveform_points};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Lifecycle of the draw loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    /// Terminal, entered on teardown
    Stopped,
}

/// What a cycle draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualMode {
    #[default]
    Waveform,
    Spectrum,
}

/// Re-scheduled sampling/draw cycle
///
/// The host's frame callback drives it: every [`VisualizationLoop::run_cycle`]
/// draws one frame and asks the scheduler for the next one. The cancellation
/// token is checked first, so a stopped loop neither draws nor reschedules.
pub struct VisualizationLoop {
    state: LoopState,
    mode: VisualMode,
    cancel: Arc<AtomicBool>,
    /// Analyzer bytes, sized to the window once at start
    samples: Vec<u8>,
    /// Polyline scratch, `window + 1` points
    points: Vec<Point>,
}

impl Default for VisualizationLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualizationLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            mode: VisualMode::default(),
            cancel: Arc::new(AtomicBool::new(false)),
            samples: Vec::new(),
            points: Vec::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn mode(&self) -> VisualMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: VisualMode) {
        self.mode = mode;
    }

    /// Shared flag; setting it stops the loop at its next cycle
    pub fn cancellation_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Bytes read by the most recent cycle
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// `Idle -> Running`: size the buffers and request the first frame
    pub fn start<F: FrameScheduler>(&mut self, window_size: usize, scheduler: &mut F) {
        if self.state != LoopState::Idle || self.is_cancelled() {
            return;
        }
        self.samples = vec![0; window_size];
        self.points = Vec::with_capacity(window_size + 1);
        self.state = LoopState::Running;
        tracing::debug!("visualization started, window {}", window_size);
        scheduler.request_frame();
    }

    /// Run one cycle; returns whether a frame was drawn
    ///
    /// A failed analyzer read skips the draw but still requests the next
    /// frame, so the loop stays alive. Only `SessionEnded` stops it.
    pub fn run_cycle<B, D, F>(
        &mut self,
        graph: &mut ProcessingGraph<B>,
        surface: &mut D,
        scheduler: &mut F,
    ) -> Result<bool>
    where
        B: SignalBackend,
        D: DisplaySurface,
        F: FrameScheduler,
    {
        if self.is_cancelled() {
            self.state = LoopState::Stopped;
            return Ok(false);
        }
        if self.state != LoopState::Running {
            return Ok(false);
        }

        let width = surface.width();
        let height = surface.height();
        let read = match self.mode {
            VisualMode::Waveform => graph.read_waveform(&mut self.samples),
            VisualMode::Spectrum => {
                let bins = self.samples.len() / 2;
                graph.read_spectrum(&mut self.samples[..bins])
            }
        };
        match read {
            Ok(()) => {}
            Err(PlayerError::SessionEnded) => {
                self.stop();
                return Err(PlayerError::SessionEnded);
            }
            Err(err) => {
                // Keep the previous frame on screen and try again next frame
                tracing::warn!("analyzer read failed, frame skipped: {}", err);
                scheduler.request_frame();
                return Err(err);
            }
        }

        let stroke = match self.mode {
            VisualMode::Waveform => {
                waveform_points(&self.samples, width, height, &mut self.points);
                UITheme::waveform_stroke()
            }
            VisualMode::Spectrum => {
                let bins = self.samples.len() / 2;
                spectrum_points(&self.samples[..bins], width, height, &mut self.points);
                UITheme::spectrum_stroke()
            }
        };

        surface.clear();
        surface.stroke_polyline(&self.points, &stroke);
        scheduler.request_frame();
        Ok(true)
    }

    /// Cancel and enter the terminal state
    pub fn stop(&mut self) {
        self.cancel.store(true, Ordering::Release);
        if self.state != LoopState::Stopped {
            self.state = LoopState::Stopped;
            tracing::debug!("visualization stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::SourceHandle;
    use crate::config::PlayerConfig;
    use crate::params::ParameterState;
    use crate::test_support::{CountingScheduler, RecordingBackend, RecordingSurface};

    fn running(samples: Vec<u8>) -> (VisualizationLoop, ProcessingGraph<RecordingBackend>, CountingScheduler) {
        let backend = RecordingBackend::with_time_domain(samples);
        let mut graph = ProcessingGraph::new(backend, PlayerConfig::default());
        graph
            .initialize(SourceHandle(1), &ParameterState::default())
            .unwrap();
        let mut scheduler = CountingScheduler::default();
        let mut visuals = VisualizationLoop::new();
        visuals.start(graph.window_size().unwrap(), &mut scheduler);
        (visuals, graph, scheduler)
    }

    #[test]
    fn idle_loop_does_nothing() {
        let mut graph = ProcessingGraph::new(RecordingBackend::default(), PlayerConfig::default());
        let mut surface = RecordingSurface::new(600.0, 100.0);
        let mut scheduler = CountingScheduler::default();
        let mut visuals = VisualizationLoop::new();

        assert_eq!(visuals.run_cycle(&mut graph, &mut surface, &mut scheduler), Ok(false));
        assert_eq!(surface.clears, 0);
        assert_eq!(scheduler.requests, 0);
    }

    #[test]
    fn cycle_clears_strokes_and_reschedules() {
        let (mut visuals, mut graph, mut scheduler) = running(vec![128; 2048]);
        let mut surface = RecordingSurface::new(600.0, 100.0);
        assert_eq!(scheduler.requests, 1);

        assert_eq!(visuals.run_cycle(&mut graph, &mut surface, &mut scheduler), Ok(true));
        assert_eq!(surface.clears, 1);
        assert_eq!(scheduler.requests, 2);

        let (points, stroke) = surface.last_stroke().unwrap();
        assert_eq!(points.len(), 2049);
        assert!(points.iter().all(|p| p.y == 50.0));
        assert_eq!(points[2048].x, 600.0);
        assert_eq!(*stroke, UITheme::waveform_stroke());
    }

    #[test]
    fn alternating_extremes_span_the_surface() {
        let samples: Vec<u8> = (0..2048).map(|i| if i % 2 == 0 { 0 } else { 255 }).collect();
        let (mut visuals, mut graph, mut scheduler) = running(samples);
        let mut surface = RecordingSurface::new(600.0, 100.0);
        visuals.run_cycle(&mut graph, &mut surface, &mut scheduler).unwrap();

        let (points, _) = surface.last_stroke().unwrap();
        let min = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min, 0.0);
        // 255 is one byte step short of 256 = full height
        assert!((max - 100.0).abs() <= 100.0 / 256.0 + 1e-4, "max {max}");
    }

    #[test]
    fn cancelled_loop_neither_draws_nor_reschedules() {
        let (mut visuals, mut graph, mut scheduler) = running(vec![128; 2048]);
        let mut surface = RecordingSurface::new(600.0, 100.0);

        visuals.cancellation_token().store(true, Ordering::Release);
        assert_eq!(visuals.run_cycle(&mut graph, &mut surface, &mut scheduler), Ok(false));
        assert_eq!(visuals.state(), LoopState::Stopped);
        assert_eq!(surface.clears, 0);
        assert_eq!(scheduler.requests, 1);
    }

    #[test]
    fn failed_read_skips_one_frame_and_keeps_running() {
        let (mut visuals, mut graph, mut scheduler) = running(vec![128; 2048]);
        let mut surface = RecordingSurface::new(600.0, 100.0);
        visuals.run_cycle(&mut graph, &mut surface, &mut scheduler).unwrap();
        assert_eq!(scheduler.requests, 2);

        graph.backend_mut().fail_next_read();
        assert!(matches!(
            visuals.run_cycle(&mut graph, &mut surface, &mut scheduler),
            Err(PlayerError::UnknownNode(_))
        ));
        assert_eq!(visuals.state(), LoopState::Running);
        assert_eq!(scheduler.requests, 3);
        assert_eq!(surface.clears, 1);

        assert_eq!(visuals.run_cycle(&mut graph, &mut surface, &mut scheduler), Ok(true));
        assert_eq!(scheduler.requests, 4);
        assert_eq!(surface.clears, 2);
    }

    #[test]
    fn ended_session_stops_the_loop() {
        let (mut visuals, mut graph, mut scheduler) = running(vec![128; 2048]);
        let mut surface = RecordingSurface::new(600.0, 100.0);
        graph.teardown();

        assert_eq!(
            visuals.run_cycle(&mut graph, &mut surface, &mut scheduler),
            Err(PlayerError::SessionEnded)
        );
        assert_eq!(visuals.state(), LoopState::Stopped);
        assert_eq!(scheduler.requests, 1);
    }

    #[test]
    fn spectrum_mode_draws_half_window() {
        let (mut visuals, mut graph, mut scheduler) = running(vec![128; 2048]);
        let mut surface = RecordingSurface::new(600.0, 100.0);
        visuals.set_mode(VisualMode::Spectrum);
        visuals.run_cycle(&mut graph, &mut surface, &mut scheduler).unwrap();

        let (points, stroke) = surface.last_stroke().unwrap();
        assert_eq!(points.len(), 1024);
        assert_eq!(*stroke, UITheme::spectrum_stroke());
    }
}
