//! Minimal host doubles for driving a session end to end

#![allow(dead_code)]

use timbre_player::audio::SourceHandle;
use timbre_player::ui::{Point, Stroke};
use timbre_player::{DisplaySurface, FrameScheduler, MediaEngine, Result};

#[derive(Debug, Default)]
pub struct HostEngine {
    pub playing: bool,
    pub position: f64,
    pub speed: f64,
    pub plays: usize,
    pub pauses: usize,
}

impl MediaEngine for HostEngine {
    fn play(&mut self) -> Result<()> {
        self.playing = true;
        self.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
        self.pauses += 1;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn duration(&self) -> Option<f64> {
        None
    }

    fn set_playback_speed(&mut self, rate: f64) {
        self.speed = rate;
    }

    fn source(&self) -> SourceHandle {
        SourceHandle(42)
    }
}

/// Keeps the last polyline drawn
#[derive(Debug)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
    pub frames: usize,
    pub last: Vec<Point>,
    pub stroke: Option<Stroke>,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            frames: 0,
            last: Vec::new(),
            stroke: None,
        }
    }
}

impl DisplaySurface for Canvas {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.last.clear();
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        self.frames += 1;
        self.last.extend_from_slice(points);
        self.stroke = Some(*stroke);
    }
}

#[derive(Debug, Default)]
pub struct FrameClock {
    pub pending: usize,
}

impl FrameScheduler for FrameClock {
    fn request_frame(&mut self) {
        self.pending += 1;
    }
}

/// Stereo sine block, amplitude 0.5
pub fn sine_block(freq: f32, sample_rate: f32, frames: usize) -> Vec<[f32; 2]> {
    (0..frames)
        .map(|i| {
            let x = 0.5 * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin();
            [x, x]
        })
        .collect()
}

pub fn peak(block: &[[f32; 2]]) -> f32 {
    block
        .iter()
        .flat_map(|frame| frame.iter())
        .fold(0.0_f32, |acc, s| acc.max(s.abs()))
}
