//! Host-provided drawing target and frame clock.

/// A point in surface pixels, origin top-left, y pointing down
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Straight RGBA color, components in 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0.0, 0.0, 0.0);

    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

/// 2D target the visualization draws into
pub trait DisplaySurface {
    fn width(&self) -> f32;

    fn height(&self) -> f32;

    fn clear(&mut self);

    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke);
}

/// Host display-refresh hook
///
/// Each request is answered by one call to [`crate::Session::on_frame`]
/// on the next display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}
