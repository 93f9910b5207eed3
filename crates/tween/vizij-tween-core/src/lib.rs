//! Vizij Tween Core (engine-agnostic)
//!
//! Pooled tweening engine: single-property tweens driven through accessors,
//! sequences that nest them on a timeline, and batch control operations
//! filtered by id, string id, target object or handle. The host calls
//! `Engine::tick` once per frame; tweens write their values directly and the
//! returned `Outputs` carries lifecycle events.

pub mod accessor;
pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod ids;
pub mod ops;
pub mod outputs;
pub mod plugin;
pub mod pool;
pub mod sequence;
pub mod tween;
pub mod tweener;

// Re-exports for consumers (drivers/adapters)
pub use accessor::{accessor, Accessor, FieldAccessor, FnAccessor, IndexAccessor, WeakAccessor};
pub use config::{AutoPlay, Config, LogBehaviour};
pub use easing::{Ease, DEFAULT_OVERSHOOT};
pub use engine::Engine;
pub use error::{PoolKind, TweenError};
pub use ids::{Identity, ObjectId, TweenId};
pub use ops::{Filter, Operation};
pub use outputs::{KillReason, Outputs, TweenEvent};
pub use plugin::{
    Color, ColorOptions, ColorPlugin, EvalContext, FloatOptions, FloatPlugin, IntPlugin,
    PluginCache, SpiralMode, SpiralOptions, SpiralPlugin, TweenPlugin, TweenerData, Tweenable,
    VectorOptions, VectorPlugin,
};
pub use pool::{PoolKindStats, PoolStats};
pub use tween::{LoopType, PlaybackState, Tween, TweenParams, UpdateType};
