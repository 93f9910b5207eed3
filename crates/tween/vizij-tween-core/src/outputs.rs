//! Per-tick outputs.
//!
//! Tweens write their values straight through their accessors, so outputs
//! only carry the lifecycle events produced since the previous tick.

use serde::{Deserialize, Serialize};

use crate::ids::TweenId;

/// Why a unit was despawned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillReason {
    /// Completed with auto-kill enabled.
    AutoKill,
    /// Target went away or rejected a write.
    TargetLost,
    /// The getter failed, or the sequence was empty, on first evaluation.
    StartupFailed,
    /// Killed by an operation.
    Manual,
}

/// Discrete lifecycle signals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TweenEvent {
    /// First evaluation after the delay.
    Started { id: TweenId },
    LoopCompleted { id: TweenId, completed_loops: i32 },
    Completed { id: TweenId },
    Killed { id: TweenId, reason: KillReason },
}

impl TweenEvent {
    pub fn id(&self) -> TweenId {
        match self {
            Self::Started { id }
            | Self::LoopCompleted { id, .. }
            | Self::Completed { id }
            | Self::Killed { id, .. } => *id,
        }
    }
}

/// Events since the previous `tick`, oldest first. Includes events raised
/// by operations issued between ticks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    pub events: Vec<TweenEvent>,
}

impl Outputs {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events concerning one unit.
    pub fn for_tween(&self, id: TweenId) -> impl Iterator<Item = &TweenEvent> {
        self.events.iter().filter(move |e| e.id() == id)
    }
}
