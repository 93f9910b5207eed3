//! Error types for the tween engine

/// Which pool an operation touched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PoolKind {
    Tweener,
    Sequence,
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tweener => f.write_str("tweener"),
            Self::Sequence => f.write_str("sequence"),
        }
    }
}

/// Configuration and lifecycle errors. Runtime target failures never surface
/// here: they kill the affected tween and are reported as events instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TweenError {
    /// Duration (or speed) must be finite and positive
    #[error("Invalid duration: {duration}")]
    InvalidDuration { duration: f32 },

    /// Loops must be -1 (infinite) or at least 1
    #[error("Invalid loop count: {loops}")]
    InvalidLoops { loops: i32 },

    /// Pool hit its hard ceiling
    #[error("Max {kind} capacity reached ({max})")]
    CapacityExceeded { kind: PoolKind, max: usize },

    /// Capacities can only change while nothing is spawned
    #[error("Cannot change capacities while {spawned} tweens are alive")]
    TweensActive { spawned: usize },

    /// Handle refers to a despawned or recycled slot
    #[error("Stale tween handle")]
    StaleHandle,

    #[error("Tween is not a sequence")]
    NotASequence,

    /// Sequences are sealed once they have started
    #[error("Sequence has already started")]
    SequenceStarted,

    /// Child was already nested or already started playing
    #[error("Tween is already nested or started and can't be inserted")]
    AlreadyNested,

    #[error("Tweens with infinite loops can't be nested")]
    InfiniteLoopsInSequence,

    #[error("Speed-based tweens can't be nested")]
    SpeedBasedInSequence,

    #[error("A sequence can't contain itself")]
    SelfInsertion,

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
}

impl TweenError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } | Self::InvalidLoops { .. } => "validation",
            Self::CapacityExceeded { .. } | Self::TweensActive { .. } => "capacity",
            Self::StaleHandle => "handle",
            Self::NotASequence
            | Self::SequenceStarted
            | Self::AlreadyNested
            | Self::InfiniteLoopsInSequence
            | Self::SpeedBasedInSequence
            | Self::SelfInsertion => "sequence",
            Self::InvalidConfig { .. } => "config",
        }
    }
}

impl From<serde_json::Error> for TweenError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}
