//! The xgfx effect engine: parameter state, protocol entry points,
//! and the 16-channel routing/mixing pipeline.

mod engine;
mod error;

pub use engine::EffectEngine;
pub use error::EngineError;
pub use xgfx_params::{EffectSnapshot, NUM_CHANNELS};
