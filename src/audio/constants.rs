/// Audio processing constants and helper functions
/// Separated from visual theme for better organization

/// Volume (gain stage level) range
pub const VOLUME_MIN: f64 = 0.0;
pub const VOLUME_MAX: f64 = 1.0;
pub const VOLUME_DEFAULT: f64 = 1.0;

/// Playback speed multiplier range
pub const PLAYBACK_RATE_MIN: f64 = 0.5;
pub const PLAYBACK_RATE_MAX: f64 = 2.0;
pub const PLAYBACK_RATE_DEFAULT: f64 = 1.0;

/// Tone gain range shared by the bass, mid and treble stages
pub const EQ_GAIN_MIN_DB: f64 = -30.0;
pub const EQ_GAIN_MAX_DB: f64 = 30.0;

/// Stereo position, -1 = hard left, 1 = hard right
pub const PAN_MIN: f64 = -1.0;
pub const PAN_MAX: f64 = 1.0;

/// Delay time in seconds
pub const DELAY_MIN_SECONDS: f64 = 0.0;
pub const DELAY_MAX_SECONDS: f64 = 1.0;
pub const DELAY_DEFAULT_SECONDS: f64 = 0.5;

/// Longest delay buffer a session may allocate
pub const DELAY_LINE_LIMIT_SECONDS: f32 = 10.0;

/// Corner/centre frequencies of the tone stages
pub const BASS_FREQUENCY_HZ: f32 = 200.0;
pub const MID_FREQUENCY_HZ: f32 = 1000.0;
pub const TREBLE_FREQUENCY_HZ: f32 = 3000.0;

/// Default biquad quality factor (peaking band width, shelf slope stays at 1)
pub const DEFAULT_Q: f32 = 1.0;

/// Analyzer window size, must stay a power of two
pub const ANALYZER_WINDOW_SIZE: usize = 2048;

/// Number of frequency bins the analyzer reports (N/2, Nyquist bin dropped)
pub const ANALYZER_FREQUENCY_BINS: usize = ANALYZER_WINDOW_SIZE / 2;

/// Byte value the analyzer uses for zero amplitude
pub const WAVEFORM_MIDPOINT: u8 = 128;

/// dB range mapped onto 0..255 for frequency snapshots
pub const ANALYZER_MIN_DB: f32 = -100.0;
pub const ANALYZER_MAX_DB: f32 = -30.0;

/// Temporal smoothing applied between frequency snapshots (0 = none)
pub const ANALYZER_SMOOTHING: f32 = 0.8;

/// Default render rate for the built-in backend
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

// === HELPER FUNCTIONS ===

/// Convert gain dB to linear amplitude
pub fn db_to_gain(db: f32) -> f32 {
    libm::powf(10.0, db / 20.0)
}

/// Convert linear amplitude to dB (with floor to avoid log(0))
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * libm::log10f(gain.max(1e-10))
}

/// Convert a dB magnitude to the analyzer's byte scale
pub fn db_to_byte(db: f32, min_db: f32, max_db: f32) -> u8 {
    let scaled = 255.0 * (db - min_db) / (max_db - min_db);
    scaled.clamp(0.0, 255.0) as u8
}
