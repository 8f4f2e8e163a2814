//! Real-world scenario benchmarks.
//!
//! A full voice (oscillator, filter, distortion, gain, reverb and delay
//! sends) rendered through the engine, and the cost of building one.

mod voice;

pub use voice::bench_voice;
