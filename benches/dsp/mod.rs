//! Benchmarks for low-level DSP primitives.

mod automation;
mod convolver;
mod curves;
mod filter;
mod oscillator;

pub use automation::bench_automation;
pub use convolver::bench_convolver;
pub use curves::bench_curves;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
