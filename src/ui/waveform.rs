//! Polyline geometry for analyzer snapshots.
//!
//! Both builders write into a caller-owned buffer so the draw loop can
//! reuse one allocation for the whole session.

use crate::ui::surface::Point;

/// Build the waveform trace for time-domain bytes
///
/// Point `i` sits at `x = i * (width / n)`, `y = (v / 128) * (height / 2)`,
/// so silence (128) lies on the vertical midline. The trace is closed at
/// the midline of the right edge, giving `n + 1` points.
pub fn waveform_points(samples: &[u8], width: f32, height: f32, points: &mut Vec<Point>) {
    points.clear();
    if samples.is_empty() {
        return;
    }

    let slice_width = width / samples.len() as f32;
    let half_height = height / 2.0;
    points.extend(samples.iter().enumerate().map(|(i, &v)| {
        let x = i as f32 * slice_width;
        let y = (v as f32 / 128.0) * half_height;
        Point::new(x, y)
    }));
    points.push(Point::new(width, half_height));
}

/// Build the spectrum trace for frequency bytes
///
/// Louder bins rise towards the top: `y = height - (v / 255) * height`.
pub fn spectrum_points(bins: &[u8], width: f32, height: f32, points: &mut Vec<Point>) {
    points.clear();
    if bins.is_empty() {
        return;
    }

    let slice_width = width / bins.len() as f32;
    points.extend(bins.iter().enumerate().map(|(i, &v)| {
        let normalized = v as f32 / 255.0;
        Point::new(i as f32 * slice_width, height - normalized * height)
    }));
}
