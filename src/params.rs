//! Player parameters and transport state.
//!
//! [`ParameterState`] is the single source of truth for every user-facing
//! control. Audio stages only ever hold values derived from it.

use crate::audio::constants::*;
use crate::error::{PlayerError, Result};
use std::fmt;

/// One user-adjustable control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Volume,
    PlaybackRate,
    Bass,
    Mid,
    Treble,
    Pan,
    Delay,
}

/// Static description of a control: display label, domain and slider step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    /// Slider granularity for hosts that build controls; never applied by the core
    pub step: f64,
    pub default: f64,
}

impl Parameter {
    /// Every adjustable parameter, in control-panel order
    pub const ALL: [Parameter; 7] = [
        Parameter::Volume,
        Parameter::PlaybackRate,
        Parameter::Bass,
        Parameter::Mid,
        Parameter::Treble,
        Parameter::Pan,
        Parameter::Delay,
    ];

    pub const fn spec(self) -> ParameterSpec {
        match self {
            Self::Volume => ParameterSpec {
                label: "Volume",
                min: VOLUME_MIN,
                max: VOLUME_MAX,
                step: 0.01,
                default: VOLUME_DEFAULT,
            },
            Self::PlaybackRate => ParameterSpec {
                label: "Playback Rate",
                min: PLAYBACK_RATE_MIN,
                max: PLAYBACK_RATE_MAX,
                step: 0.1,
                default: PLAYBACK_RATE_DEFAULT,
            },
            Self::Bass => ParameterSpec {
                label: "Bass",
                min: EQ_GAIN_MIN_DB,
                max: EQ_GAIN_MAX_DB,
                step: 1.0,
                default: 0.0,
            },
            Self::Mid => ParameterSpec {
                label: "Mid",
                min: EQ_GAIN_MIN_DB,
                max: EQ_GAIN_MAX_DB,
                step: 1.0,
                default: 0.0,
            },
            Self::Treble => ParameterSpec {
                label: "Treble",
                min: EQ_GAIN_MIN_DB,
                max: EQ_GAIN_MAX_DB,
                step: 1.0,
                default: 0.0,
            },
            Self::Pan => ParameterSpec {
                label: "Pan",
                min: PAN_MIN,
                max: PAN_MAX,
                step: 0.1,
                default: 0.0,
            },
            Self::Delay => ParameterSpec {
                label: "Delay",
                min: DELAY_MIN_SECONDS,
                max: DELAY_MAX_SECONDS,
                step: 0.1,
                default: DELAY_DEFAULT_SECONDS,
            },
        }
    }

    /// Clamp a value into this parameter's domain
    ///
    /// Values outside the range, infinities included, land on the nearest
    /// boundary. NaN has no nearest boundary and is rejected.
    pub fn clamp(self, value: f64) -> Result<f64> {
        if value.is_nan() {
            return Err(PlayerError::InvalidParameterValue {
                parameter: self,
                value,
            });
        }
        let spec = self.spec();
        Ok(value.clamp(spec.min, spec.max))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().label)
    }
}

/// Transport state reported by (and pushed to) the media engine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransportState {
    pub is_playing: bool,
    /// Seconds, `0 <= current_time <= duration` once the duration is known
    pub current_time: f64,
    /// Seconds, 0 until metadata has loaded
    pub duration: f64,
}

impl TransportState {
    /// Clamp a position into `[0, duration]`
    pub fn clamp_position(&self, seconds: f64) -> Result<f64> {
        if seconds.is_nan() {
            return Err(PlayerError::SeekOutOfRange(seconds));
        }
        Ok(seconds.clamp(0.0, self.duration.max(0.0)))
    }

    /// Record a newly loaded duration, pulling the position back inside it
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.current_time = self.current_time.min(self.duration);
    }

    /// Position as `m:ss`, the way the transport readout shows it
    pub fn elapsed_label(&self) -> String {
        format_timestamp(self.current_time)
    }

    /// Duration as `m:ss`
    pub fn duration_label(&self) -> String {
        format_timestamp(self.duration)
    }
}

/// Format seconds as `m:ss` (whole seconds, minutes unpadded)
pub fn format_timestamp(seconds: f64) -> String {
    let whole = if seconds.is_finite() { seconds.max(0.0) as u64 } else { 0 };
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Current values of all adjustable controls plus transport state
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterState {
    pub transport: TransportState,
    volume: f64,
    playback_rate: f64,
    bass: f64,
    mid: f64,
    treble: f64,
    pan: f64,
    delay: f64,
}

impl Default for ParameterState {
    fn default() -> Self {
        Self {
            transport: TransportState::default(),
            volume: Parameter::Volume.spec().default,
            playback_rate: Parameter::PlaybackRate.spec().default,
            bass: Parameter::Bass.spec().default,
            mid: Parameter::Mid.spec().default,
            treble: Parameter::Treble.spec().default,
            pan: Parameter::Pan.spec().default,
            delay: Parameter::Delay.spec().default,
        }
    }
}

impl ParameterState {
    /// Read the stored (already clamped) value of a parameter
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Volume => self.volume,
            Parameter::PlaybackRate => self.playback_rate,
            Parameter::Bass => self.bass,
            Parameter::Mid => self.mid,
            Parameter::Treble => self.treble,
            Parameter::Pan => self.pan,
            Parameter::Delay => self.delay,
        }
    }

    /// Clamp and store a value, returning what was stored
    pub fn set(&mut self, parameter: Parameter, value: f64) -> Result<f64> {
        let clamped = parameter.clamp(value)?;
        if clamped != value {
            tracing::debug!("{} clamped from {} to {}", parameter, value, clamped);
        }
        let slot = match parameter {
            Parameter::Volume => &mut self.volume,
            Parameter::PlaybackRate => &mut self.playback_rate,
            Parameter::Bass => &mut self.bass,
            Parameter::Mid => &mut self.mid,
            Parameter::Treble => &mut self.treble,
            Parameter::Pan => &mut self.pan,
            Parameter::Delay => &mut self.delay,
        };
        *slot = clamped;
        Ok(clamped)
    }

    /// Snapshot of every parameter with its current value
    pub fn values(&self) -> [(Parameter, f64); 7] {
        Parameter::ALL.map(|parameter| (parameter, self.get(parameter)))
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn bass(&self) -> f64 {
        self.bass
    }

    pub fn mid(&self) -> f64 {
        self.mid
    }

    pub fn treble(&self) -> f64 {
        self.treble
    }

    pub fn pan(&self) -> f64 {
        self.pan
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }
}
