//! Engine configuration: pool sizing, defaults applied to new tweens and
//! logging behaviour.

use serde::{Deserialize, Serialize};

use crate::easing::Ease;
use crate::error::TweenError;
use crate::tween::LoopType;

/// Which newly created units start playing on their own.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoPlay {
    /// Nothing plays until `play` is called.
    None,
    /// Only single-property tweens autoplay.
    AutoPlayTweeners,
    /// Only sequences autoplay.
    AutoPlaySequences,
    All,
}

impl AutoPlay {
    pub fn tweeners(self) -> bool {
        matches!(self, Self::All | Self::AutoPlayTweeners)
    }

    pub fn sequences(self) -> bool {
        matches!(self, Self::All | Self::AutoPlaySequences)
    }
}

/// How chatty the engine is through the `log` facade.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogBehaviour {
    /// Info, warnings and errors.
    Verbose,
    /// Warnings and errors.
    Default,
    ErrorsOnly,
}

impl LogBehaviour {
    #[inline]
    pub fn allows(self, level: log::Level) -> bool {
        match self {
            Self::Verbose => level <= log::Level::Info,
            Self::Default => level <= log::Level::Warn,
            Self::ErrorsOnly => level <= log::Level::Error,
        }
    }
}

/// Configuration for engine sizing and tween defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity of the tweener pool.
    pub tweeners_capacity: usize,
    /// Initial capacity of the sequence pool. Never above `tweeners_capacity`.
    pub sequences_capacity: usize,
    /// Hard ceiling for either pool. Creation fails past it.
    pub max_capacity: usize,

    pub default_ease: Ease,
    pub default_loop_type: LoopType,
    pub default_auto_play: AutoPlay,
    pub default_auto_kill: bool,

    /// Check target liveness before every evaluation.
    pub safe_mode: bool,
    /// Global multiplier applied by `Engine::frame`.
    pub time_scale: f32,
    pub log_behaviour: LogBehaviour,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tweeners_capacity: 200,
            sequences_capacity: 50,
            max_capacity: 32_768,
            default_ease: Ease::InOutQuad,
            default_loop_type: LoopType::Restart,
            default_auto_play: AutoPlay::All,
            default_auto_kill: true,
            safe_mode: false,
            time_scale: 1.0,
            log_behaviour: LogBehaviour::Default,
        }
    }
}

impl Config {
    /// Parse a config from JSON. Missing fields fall back to defaults, and the
    /// capacity invariant is enforced on the result.
    pub fn from_json_str(json: &str) -> Result<Self, TweenError> {
        let mut cfg: Config = serde_json::from_str(json)?;
        cfg.normalize();
        Ok(cfg)
    }

    /// Enforce `sequences_capacity <= tweeners_capacity <= max_capacity`.
    pub(crate) fn normalize(&mut self) {
        self.max_capacity = self.max_capacity.max(1);
        self.tweeners_capacity = self.tweeners_capacity.min(self.max_capacity);
        self.sequences_capacity = self.sequences_capacity.min(self.max_capacity);
        if self.sequences_capacity > self.tweeners_capacity {
            self.tweeners_capacity = self.sequences_capacity;
        }
    }
}
