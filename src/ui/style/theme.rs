use crate::ui::surface::{Color, Stroke};

/// Colors and drawing dimensions only
/// Audio-related constants are in audio::constants
pub struct UITheme;

impl UITheme {
    // === COLORS ===

    /// Waveform trace
    pub const WAVEFORM_LINE: Color = Color::BLACK;

    /// Spectrum trace
    pub const SPECTRUM_LINE: Color = Color::from_rgb(0.3, 1.0, 0.8);

    // === DIMENSIONS ===

    pub const LINE_WIDTH: f32 = 2.0;

    // === VISUAL HELPER FUNCTIONS ===
    pub const fn waveform_stroke() -> Stroke {
        Stroke {
            width: Self::LINE_WIDTH,
            color: Self::WAVEFORM_LINE,
        }
    }

    pub const fn spectrum_stroke() -> Stroke {
        Stroke {
            width: Self::LINE_WIDTH,
            color: Self::SPECTRUM_LINE,
        }
    }
}
