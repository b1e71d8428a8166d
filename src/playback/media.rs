use crate::audio::backend::SourceHandle;
use crate::error::Result;

/// The host component that decodes and schedules the track
///
/// Positions and durations are in seconds. The host forwards its own
/// metadata-loaded and time-advanced notifications to
/// [`crate::Session::on_metadata_loaded`] and
/// [`crate::Session::on_time_advanced`].
pub trait MediaEngine {
    /// Start or resume output; may be refused (autoplay policy, decode error)
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn position(&self) -> f64;

    fn set_position(&mut self, seconds: f64);

    /// Track length once metadata has loaded
    fn duration(&self) -> Option<f64>;

    /// Speed multiplier, 1.0 = normal
    fn set_playback_speed(&mut self, rate: f64);

    /// Handle the processing graph wraps as its source
    fn source(&self) -> SourceHandle;
}
