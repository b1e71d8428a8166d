use crate::audio::constants::{db_to_byte, gain_to_db, ANALYZER_FREQUENCY_BINS, ANALYZER_WINDOW_SIZE};
use apodize::blackman_iter;
use dasp::Sample;
use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};
use std::sync::Arc;
use triple_buffer::TripleBuffer;

/// The analyzer's latest time-domain window, oldest sample first
pub type WaveformWindow = [f32; ANALYZER_WINDOW_SIZE];

/// Non-destructive tap in the audio path (audio thread writes to this)
///
/// Frames pass through untouched. A mono mix of every frame goes into a
/// ring buffer, and the latest full window is published to
/// [`AnalyzerReader`] once per processed block.
pub struct AnalyzerTap {
    /// Ring buffer holding the most recent window of mono samples
    ring_buffer: Vec<f32>,
    /// Write position in ring buffer
    ring_buffer_pos: usize,
    /// Chronologically ordered copy of the ring, reused every publish
    snapshot: WaveformWindow,
    /// Triple buffer producer for lock-free communication to the control side
    producer: triple_buffer::Input<WaveformWindow>,
}

impl AnalyzerTap {
    /// Observe one frame; returns it unchanged
    #[inline]
    pub fn observe(&mut self, frame: [f32; 2]) -> [f32; 2] {
        self.ring_buffer[self.ring_buffer_pos] = (frame[0] + frame[1]) * 0.5;
        self.ring_buffer_pos = (self.ring_buffer_pos + 1) % ANALYZER_WINDOW_SIZE;
        frame
    }

    /// Publish the most recent window (called once per block, no allocations)
    pub fn publish(&mut self) {
        let (newest, oldest) = self.ring_buffer.split_at(self.ring_buffer_pos);
        self.snapshot[..oldest.len()].copy_from_slice(oldest);
        self.snapshot[oldest.len()..].copy_from_slice(newest);
        self.producer.write(self.snapshot);
    }
}

/// Control-side view of the analyzer: byte snapshots for drawing
pub struct AnalyzerReader {
    consumer: triple_buffer::Output<WaveformWindow>,

    /// FFT processing engine
    fft_processor: Arc<dyn RealToComplex<f32>>,
    /// Pre-computed Blackman window for spectral leakage reduction
    window_function: Vec<f32>,
    /// Input buffer for windowed samples (time domain)
    time_domain_buffer: Vec<f32>,
    /// Output buffer for FFT results (frequency domain)
    frequency_domain_buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
    /// Smoothed linear magnitudes carried between snapshots
    smoothed_magnitudes: Vec<f32>,

    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl AnalyzerReader {
    pub fn window_size(&self) -> usize {
        ANALYZER_WINDOW_SIZE
    }

    pub fn frequency_bin_count(&self) -> usize {
        ANALYZER_FREQUENCY_BINS
    }

    /// Copy the latest window as bytes, 128 being zero amplitude
    ///
    /// Samples are clamped to [-1, 1] first, so full scale maps to 0 and 255.
    pub fn read_time_domain(&mut self, out: &mut [u8]) {
        let window = self.consumer.read();
        for (byte, &sample) in out.iter_mut().zip(window.iter()) {
            *byte = sample_to_byte(sample);
        }
    }

    /// Copy the latest smoothed magnitude spectrum as bytes over the dB range
    pub fn read_frequency(&mut self, out: &mut [u8]) {
        let window = self.consumer.read();

        // Apply window function to input
        for ((dst, &sample), &coeff) in self
            .time_domain_buffer
            .iter_mut()
            .zip(window.iter())
            .zip(self.window_function.iter())
        {
            *dst = sample * coeff;
        }

        // Run FFT (time domain -> frequency domain)
        if self
            .fft_processor
            .process_with_scratch(
                &mut self.time_domain_buffer,
                &mut self.frequency_domain_buffer,
                &mut self.scratch,
            )
            .is_err()
        {
            // Buffer sizes are fixed at construction, keep the previous spectrum
            tracing::warn!("analyzer FFT rejected its buffers");
        } else {
            let norm = 1.0 / ANALYZER_WINDOW_SIZE as f32;
            let smoothing = self.smoothing;
            for (smoothed, bin) in self
                .smoothed_magnitudes
                .iter_mut()
                .zip(self.frequency_domain_buffer.iter())
            {
                let magnitude = bin.norm() * norm;
                *smoothed = smoothing * *smoothed + (1.0 - smoothing) * magnitude;
            }
        }

        for (byte, &magnitude) in out.iter_mut().zip(self.smoothed_magnitudes.iter()) {
            *byte = db_to_byte(gain_to_db(magnitude), self.min_db, self.max_db);
        }
    }
}

/// Convert a float sample to the analyzer byte scale
#[inline]
pub fn sample_to_byte(sample: f32) -> u8 {
    let sample = if sample.is_nan() { 0.0 } else { sample.clamp(-1.0, 1.0) };
    sample.to_sample::<u8>()
}

/// Factory function to create the analyzer pair
/// Returns (tap for audio thread, reader for control thread)
pub fn create_analyzer_channels(smoothing: f32, min_db: f32, max_db: f32) -> (AnalyzerTap, AnalyzerReader) {
    let (producer, consumer) = TripleBuffer::new(&[0.0; ANALYZER_WINDOW_SIZE]).split();

    let mut fft_planner = RealFftPlanner::<f32>::new();
    let fft_processor = fft_planner.plan_fft_forward(ANALYZER_WINDOW_SIZE);
    let frequency_domain_buffer = fft_processor.make_output_vec();
    let scratch = fft_processor.make_scratch_vec();

    let window_function: Vec<f32> = blackman_iter(ANALYZER_WINDOW_SIZE)
        .map(|w| w as f32)
        .collect();

    let tap = AnalyzerTap {
        ring_buffer: vec![0.0; ANALYZER_WINDOW_SIZE],
        ring_buffer_pos: 0,
        snapshot: [0.0; ANALYZER_WINDOW_SIZE],
        producer,
    };

    let reader = AnalyzerReader {
        consumer,
        fft_processor,
        window_function,
        time_domain_buffer: vec![0.0; ANALYZER_WINDOW_SIZE],
        frequency_domain_buffer,
        scratch,
        smoothed_magnitudes: vec![0.0; ANALYZER_FREQUENCY_BINS],
        smoothing: smoothing.clamp(0.0, 1.0),
        min_db,
        max_db,
    };

    (tap, reader)
}
