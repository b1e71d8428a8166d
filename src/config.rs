//! Static configuration for a player session.

use crate::audio::constants::*;
use crate::error::{PlayerError, Result};

/// Per-session configuration with documented units
///
/// Everything here is fixed for the lifetime of a session. User-adjustable
/// values live in [`crate::params::ParameterState`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Render rate of the built-in backend (Hz)
    pub sample_rate_hz: f32,

    /// Low-shelf corner frequency of the bass stage (Hz)
    pub bass_frequency_hz: f32,

    /// Peaking centre frequency of the mid stage (Hz)
    pub mid_frequency_hz: f32,

    /// High-shelf corner frequency of the treble stage (Hz)
    pub treble_frequency_hz: f32,

    /// Quality factor of the mid stage
    pub mid_q: f32,

    /// Longest delay the delay stage can hold (seconds)
    pub max_delay_seconds: f32,

    /// Smoothing between analyzer frequency snapshots (0.0 - 1.0)
    pub analyzer_smoothing: f32,

    /// dB range mapped onto 0..255 for frequency snapshots
    pub analyzer_min_db: f32,
    pub analyzer_max_db: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE,
            bass_frequency_hz: BASS_FREQUENCY_HZ,
            mid_frequency_hz: MID_FREQUENCY_HZ,
            treble_frequency_hz: TREBLE_FREQUENCY_HZ,
            mid_q: DEFAULT_Q,
            max_delay_seconds: DELAY_MAX_SECONDS as f32,
            analyzer_smoothing: ANALYZER_SMOOTHING,
            analyzer_min_db: ANALYZER_MIN_DB,
            analyzer_max_db: ANALYZER_MAX_DB,
        }
    }
}

impl PlayerConfig {
    /// Validate configuration (frequencies below Nyquist, sane ranges, etc.)
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(PlayerError::InvalidConfig(format!(
                "sample rate must be positive, got {}",
                self.sample_rate_hz
            )));
        }

        let nyquist = self.sample_rate_hz / 2.0;
        for (name, freq) in [
            ("bass", self.bass_frequency_hz),
            ("mid", self.mid_frequency_hz),
            ("treble", self.treble_frequency_hz),
        ] {
            if !(freq > 0.0 && freq < nyquist) {
                return Err(PlayerError::InvalidConfig(format!(
                    "{} frequency {} Hz outside (0, {}) Hz",
                    name, freq, nyquist
                )));
            }
        }

        if !(self.mid_q > 0.0) {
            return Err(PlayerError::InvalidConfig(format!(
                "mid Q must be positive, got {}",
                self.mid_q
            )));
        }

        // The delay control reaches 1 s, the line must be able to hold it
        if !(self.max_delay_seconds >= DELAY_MAX_SECONDS as f32) {
            return Err(PlayerError::InvalidConfig(format!(
                "max delay {} s is shorter than the delay control range",
                self.max_delay_seconds
            )));
        }
        if self.max_delay_seconds > DELAY_LINE_LIMIT_SECONDS {
            return Err(PlayerError::InvalidConfig(format!(
                "max delay {} s exceeds the {} s delay line limit",
                self.max_delay_seconds, DELAY_LINE_LIMIT_SECONDS
            )));
        }

        if !(0.0..=1.0).contains(&self.analyzer_smoothing) {
            return Err(PlayerError::InvalidConfig(format!(
                "analyzer smoothing {} outside 0..=1",
                self.analyzer_smoothing
            )));
        }

        if !(self.analyzer_min_db < self.analyzer_max_db) {
            return Err(PlayerError::InvalidConfig(format!(
                "analyzer dB range {}..{} is empty",
                self.analyzer_min_db, self.analyzer_max_db
            )));
        }

        Ok(())
    }
}
