use core::f32::consts::FRAC_PI_2;

/// Equal-power stereo panner for a stereo input
///
/// At `pan <= 0` the right channel is folded into the left, at `pan > 0`
/// the left is folded into the right. `pan == 0` leaves both channels
/// untouched.
#[inline]
pub fn pan_frame(pan: f32, [left, right]: [f32; 2]) -> [f32; 2] {
    let pan = pan.clamp(-1.0, 1.0);
    if pan <= 0.0 {
        let x = (pan + 1.0) * FRAC_PI_2;
        let gain_l = libm::cosf(x);
        let gain_r = libm::sinf(x);
        [left + right * gain_l, right * gain_r]
    } else {
        let x = pan * FRAC_PI_2;
        let gain_l = libm::cosf(x);
        let gain_r = libm::sinf(x);
        [left * gain_l, right + left * gain_r]
    }
}
