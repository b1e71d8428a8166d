//! Delay stage: a pure (100% wet, no feedback) stereo delay line.

use crate::audio::constants::DELAY_LINE_LIMIT_SECONDS;

/// A stereo delay line with a fixed maximum length
///
/// The buffer is sized once from `max_delay_seconds` at the given sample
/// rate, never longer than [`DELAY_LINE_LIMIT_SECONDS`]. The delay time may change every block; it is rounded to whole
/// samples and capped at the buffer length.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<[f32; 2]>,
    write_pos: usize,
    sample_rate: f32,
}

impl DelayLine {
    pub fn new(sample_rate: f32, max_delay_seconds: f32) -> Self {
        let seconds = max_delay_seconds.clamp(0.0, DELAY_LINE_LIMIT_SECONDS);
        let buffer_size = (sample_rate * seconds).ceil() as usize + 1;
        Self {
            buffer: vec![[0.0; 2]; buffer_size],
            write_pos: 0,
            sample_rate,
        }
    }

    /// Delay in whole samples for a time in seconds
    pub fn delay_samples(&self, delay_seconds: f32) -> usize {
        let samples = libm::roundf(delay_seconds.max(0.0) * self.sample_rate) as usize;
        samples.min(self.buffer.len() - 1)
    }

    /// Push one frame and return the frame written `delay_samples` ago
    #[inline]
    pub fn process(&mut self, input: [f32; 2], delay_samples: usize) -> [f32; 2] {
        let len = self.buffer.len();
        self.buffer[self.write_pos] = input;
        let read_pos = (self.write_pos + len - delay_samples.min(len - 1)) % len;
        let output = self.buffer[read_pos];
        self.write_pos = (self.write_pos + 1) % len;
        output
    }
}
