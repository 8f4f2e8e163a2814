//! Render nodes that make up a voice.
//!
//! Graph nodes wrap the low-level DSP primitives with what a voice needs:
//! block rendering against a render context, scheduled gain, and stereo
//! sends. `topology` describes which of them a given voice wires up.

/// Feedback delay send.
pub mod delay;
/// Curve waveshaper node.
pub mod distortion;
/// Topology-preserving filter node with multiple responses.
pub mod filter;
/// Timeline-driven gain stage.
pub mod gain;
/// Core traits shared by all graph nodes.
pub mod node;
/// Detunable audio oscillator.
pub mod oscillator;
/// Convolution reverb send.
pub mod reverb;
/// Declarative edge list for one voice.
pub mod topology;

pub use node::{GraphNode, RenderCtx, SendNode};
pub use topology::{Edge, Stage, Topology};
