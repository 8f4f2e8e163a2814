//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! Everything here is plain signal math: no note events, no scheduling, no
//! knowledge of the voice topology. Buffers are sized at construction so the
//! render path never allocates.

/// Breakpoint timelines (set-value and linear-ramp events).
pub mod automation;
/// Uniformly partitioned FFT convolution.
pub mod convolver;
/// Impulse-response and waveshaper curve generators.
pub mod curves;
/// Circular delay line.
pub mod delay;
/// Curve-lookup waveshaping.
pub mod distortion;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Phase-accumulating waveform generator.
pub mod oscillator;

pub use automation::{Breakpoint, Timeline};
pub use curves::ImpulseResponse;
