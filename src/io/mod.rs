//! External interfaces: the audio device.

pub mod output;

pub use output::{AudioDevice, OutputStream};
