//! Building blocks for a voice's signal chain.
//!
//! A voice is `OscNode::sine().amplify(GainNode::from_config(..))`: the
//! oscillator feeds a gain stage, and the gain stage decides when the voice
//! has gone quiet.

/// Multiply a signal by a control signal.
pub mod amplify;
/// Fluent combinators (`.amplify()`).
pub mod extensions;
/// Envelope-driven gain stage.
pub mod gain;
/// Core traits shared by all graph nodes.
pub mod node;
/// Pitched sine source.
pub mod oscillator;

pub use node::{GraphNode, RenderCtx};
