//! Distortion / Waveshaping
//!
//! A waveshaper reads each input sample as a position on a transfer curve:
//!
//!   index = (n - 1) / 2 · (x + 1)
//!
//! so x = -1 reads the first entry and x = +1 the last. Positions between
//! entries are linearly interpolated, and inputs beyond ±1 read the end
//! values. The curve itself comes from `dsp::curves::build_distortion_curve`.

/// Shape one sample through `curve`.
#[inline]
pub fn shape(sample: f32, curve: &[f32]) -> f32 {
    match curve.len() {
        0 => sample,
        1 => curve[0],
        n => {
            let x = sample.clamp(-1.0, 1.0);
            let position = (n - 1) as f32 * 0.5 * (x + 1.0);
            let index = position.floor() as usize;
            if index >= n - 1 {
                return curve[n - 1];
            }
            let frac = position - index as f32;
            curve[index] + (curve[index + 1] - curve[index]) * frac
        }
    }
}

/// Apply `curve` to an entire buffer in place.
pub fn shape_buffer(buffer: &mut [f32], curve: &[f32]) {
    for sample in buffer.iter_mut() {
        *sample = shape(*sample, curve);
    }
}
