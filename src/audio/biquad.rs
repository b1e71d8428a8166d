//! Stereo biquad filter for the tone stages.
//!
//! Coefficient formulas follow the Audio EQ Cookbook (Robert Bristow-Johnson),
//! with the shelf slope fixed at 1 the way browser biquad nodes define it.

use core::f32::consts::PI;
use dasp::Frame;

/// Filter response used by the tone stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    LowShelf,
    Peaking,
    HighShelf,
}

/// Normalized biquad coefficients (a0 divided out)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Coefficients {
    const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    fn design(shape: FilterShape, frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Self {
        let nyquist = sample_rate / 2.0;
        if !(frequency > 0.0 && frequency < nyquist) {
            return Self::IDENTITY;
        }

        let a = libm::powf(10.0, gain_db / 40.0);
        let w0 = 2.0 * PI * frequency / sample_rate;
        let cos_w0 = libm::cosf(w0);
        let sin_w0 = libm::sinf(w0);

        let (b0, b1, b2, a0, a1, a2) = match shape {
            FilterShape::Peaking => {
                let alpha = sin_w0 / (2.0 * q.max(1e-4));
                (
                    1.0 + alpha * a,
                    -2.0 * cos_w0,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos_w0,
                    1.0 - alpha / a,
                )
            }
            FilterShape::LowShelf => {
                // Shelf slope S = 1 reduces the cookbook alpha to sin(w0)/2 * sqrt(2)
                let two_sqrt_a_alpha = 2.0 * libm::sqrtf(a) * sin_w0 / 2.0 * core::f32::consts::SQRT_2;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    (a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                    (a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                )
            }
            FilterShape::HighShelf => {
                let two_sqrt_a_alpha = 2.0 * libm::sqrtf(a) * sin_w0 / 2.0 * core::f32::consts::SQRT_2;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                    (a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                )
            }
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// A second-order IIR filter running on stereo frames
///
/// Direct Form II Transposed, one state pair per channel. Coefficients are
/// only recomputed when a setting actually changes, so pushing the same
/// value every block costs a comparison.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    shape: FilterShape,
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,

    coefficients: Coefficients,

    // State (Direct Form II Transposed)
    z1: [f32; 2],
    z2: [f32; 2],
}

impl BiquadFilter {
    pub fn new(shape: FilterShape, frequency: f32, q: f32, sample_rate: f32) -> Self {
        Self {
            shape,
            frequency,
            q,
            gain_db: 0.0,
            sample_rate,
            coefficients: Coefficients::design(shape, frequency, q, 0.0, sample_rate),
            z1: [0.0; 2],
            z2: [0.0; 2],
        }
    }

    /// Update settings, recomputing coefficients only on change
    pub fn configure(&mut self, frequency: f32, q: f32, gain_db: f32) {
        if frequency == self.frequency && q == self.q && gain_db == self.gain_db {
            return;
        }
        self.frequency = frequency;
        self.q = q;
        self.gain_db = gain_db;
        self.coefficients =
            Coefficients::design(self.shape, frequency, q, gain_db, self.sample_rate);
    }

    /// Process one stereo frame
    #[inline]
    pub fn process(&mut self, input: [f32; 2]) -> [f32; 2] {
        let c = self.coefficients;
        let mut output = <[f32; 2] as Frame>::EQUILIBRIUM;
        for ch in 0..2 {
            let x = input[ch];
            let y = c.b0 * x + self.z1[ch];
            self.z1[ch] = c.b1 * x - c.a1 * y + self.z2[ch];
            self.z2[ch] = c.b2 * x - c.a2 * y;
            output[ch] = y;
        }
        output
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.z1 = [0.0; 2];
        self.z2 = [0.0; 2];
    }
}
