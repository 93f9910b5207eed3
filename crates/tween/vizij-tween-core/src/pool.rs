//! Recycling pools for tween units.
//!
//! Each pool tracks how many units of its kind are spawned and keeps reset
//! units around for reuse. When the spawned count reaches the capacity the
//! capacity grows by exactly the missing slot, up to the hard ceiling.

use serde::{Deserialize, Serialize};

use crate::config::LogBehaviour;
use crate::error::{PoolKind, TweenError};
use crate::tween::Tween;

#[derive(Debug)]
pub(crate) struct Pool {
    kind: PoolKind,
    capacity: usize,
    spawned: usize,
    idle: Vec<Tween>,
    growths: usize,
}

impl Pool {
    pub(crate) fn new(kind: PoolKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            spawned: 0,
            idle: Vec::new(),
            growths: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn spawned(&self) -> usize {
        self.spawned
    }

    /// Take a reset unit, growing the capacity if every slot is in use.
    pub(crate) fn acquire(&mut self, max_capacity: usize, log: LogBehaviour) -> Result<Tween, TweenError> {
        if self.spawned >= self.capacity {
            if self.capacity >= max_capacity {
                if log.allows(log::Level::Error) {
                    log::error!("max {} capacity reached ({max_capacity})", self.kind);
                }
                return Err(TweenError::CapacityExceeded {
                    kind: self.kind,
                    max: max_capacity,
                });
            }
            let grown = self.spawned + 1;
            if log.allows(log::Level::Warn) {
                log::warn!(
                    "{} capacity exhausted, increasing from {} to {grown}",
                    self.kind,
                    self.capacity
                );
            }
            self.capacity = grown;
            self.growths += 1;
        }
        self.spawned += 1;
        Ok(match self.idle.pop() {
            Some(tween) => tween,
            None => match self.kind {
                PoolKind::Tweener => Tween::new_tweener(),
                PoolKind::Sequence => Tween::new_sequence(),
            },
        })
    }

    /// Raise the capacity to `capacity` without spawning anything.
    pub(crate) fn grow_to(&mut self, capacity: usize, log: LogBehaviour) {
        if capacity <= self.capacity {
            return;
        }
        if log.allows(log::Level::Warn) {
            log::warn!(
                "{} capacity raised from {} to {capacity} to match sequences",
                self.kind,
                self.capacity
            );
        }
        self.capacity = capacity;
        self.growths += 1;
    }

    /// Reset a despawned unit and keep it if there is room.
    pub(crate) fn release(&mut self, mut tween: Tween) {
        tween.reset();
        self.spawned = self.spawned.saturating_sub(1);
        if self.idle.len() < self.capacity {
            self.idle.push(tween);
        }
    }

    pub(crate) fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.idle.truncate(capacity);
    }

    /// Drop every pooled unit and forget growth. Only valid with nothing spawned.
    pub(crate) fn purge(&mut self, capacity: usize) {
        self.idle = Vec::new();
        self.capacity = capacity;
        self.spawned = 0;
        self.growths = 0;
    }

    fn stats(&self) -> PoolKindStats {
        PoolKindStats {
            capacity: self.capacity,
            spawned: self.spawned,
            idle: self.idle.len(),
            growths: self.growths,
        }
    }
}

/// Counters for one pool.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolKindStats {
    pub capacity: usize,
    pub spawned: usize,
    pub idle: usize,
    /// Times the capacity was raised on demand since the last purge.
    pub growths: usize,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub tweeners: PoolKindStats,
    pub sequences: PoolKindStats,
}

impl PoolStats {
    pub(crate) fn of(tweeners: &Pool, sequences: &Pool) -> Self {
        Self {
            tweeners: tweeners.stats(),
            sequences: sequences.stats(),
        }
    }
}
