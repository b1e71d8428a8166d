pub mod style;
pub mod surface;
pub mod visualizer;
pub mod waveform;

pub use style::UITheme;
pub use surface::{Color, DisplaySurface, FrameScheduler, Point, Stroke};
pub use visualizer::{LoopState, VisualMode, VisualizationLoop};
