//! Filtered operations: one control action applied to every live top-level
//! unit matching a filter.
//!
//! Each per-unit operation reports whether it observably changed the unit
//! (that is what the engine counts) and whether the unit must be despawned.
//! Despawns are queued by the engine and run after the walk.

use crate::ids::{ObjectId, TweenId};
use crate::outputs::KillReason;
use crate::tween::{self, GotoMode, Sink, Slots, Tween};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Operation {
    /// Jump to the end. Infinite units end their current loop.
    Complete,
    /// Reverse the playing direction.
    Flip,
    /// Jump to `to` seconds (over all loops, excluding delay).
    Goto { to: f32, and_play: bool },
    Kill,
    Pause,
    Play,
    PlayBackwards,
    PlayForward,
    /// Rewind and play forward.
    Restart { include_delay: bool },
    /// Back to the start, paused.
    Rewind { include_delay: bool },
    TogglePause,
}

/// Which units an operation targets.
#[derive(Copy, Clone, Debug)]
pub enum Filter<'a> {
    All,
    Id(i32),
    StringId(&'a str),
    Object(&'a ObjectId),
    /// One unit by handle.
    Handle(TweenId),
}

impl Filter<'_> {
    pub(crate) fn matches(&self, id: TweenId, t: &Tween) -> bool {
        match self {
            Self::All => true,
            Self::Id(wanted) => t.identity.id == Some(*wanted),
            Self::StringId(wanted) => t.identity.string_id.as_deref() == Some(*wanted),
            Self::Object(wanted) => t.identity.target.as_ref() == Some(*wanted),
            Self::Handle(handle) => *handle == id,
        }
    }
}

/// Outcome of one operation on one unit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Applied {
    pub counted: bool,
    pub kill: Option<KillReason>,
}

impl Applied {
    fn counted(counted: bool) -> Self {
        Self {
            counted,
            kill: None,
        }
    }
}

pub(crate) fn run(op: Operation, slots: &mut Slots, id: TweenId, sink: &mut Sink<'_>) -> Applied {
    match op {
        Operation::Complete => complete(slots, id, sink),
        Operation::Flip => Applied::counted(with_unit(slots, id, |t| {
            t.is_backwards = !t.is_backwards;
            true
        })),
        Operation::Goto { to, and_play } => goto(slots, id, to, and_play, sink),
        Operation::Kill => Applied {
            counted: true,
            kill: Some(KillReason::Manual),
        },
        Operation::Pause => Applied::counted(with_unit(slots, id, pause)),
        Operation::Play => Applied::counted(with_unit(slots, id, play)),
        Operation::PlayBackwards => Applied::counted(with_unit(slots, id, |t| {
            let changed = !t.is_backwards;
            t.is_backwards = true;
            play(t) || changed
        })),
        Operation::PlayForward => Applied::counted(with_unit(slots, id, |t| {
            let changed = t.is_backwards;
            t.is_backwards = false;
            play(t) || changed
        })),
        Operation::Restart { include_delay } => {
            if let Some(t) = slots.get_mut(id) {
                t.is_backwards = false;
            }
            let rewound = rewind(slots, id, include_delay, sink);
            if let Some(t) = slots.get_mut(id) {
                t.is_playing = true;
            }
            Applied {
                counted: true,
                kill: rewound.kill,
            }
        }
        Operation::Rewind { include_delay } => rewind(slots, id, include_delay, sink),
        Operation::TogglePause => Applied::counted(with_unit(slots, id, |t| {
            if t.is_playing {
                pause(t)
            } else {
                play(t)
            }
        })),
    }
}

fn with_unit(slots: &mut Slots, id: TweenId, f: impl FnOnce(&mut Tween) -> bool) -> bool {
    slots.get_mut(id).is_some_and(f)
}

fn pause(t: &mut Tween) -> bool {
    if t.is_playing {
        t.is_playing = false;
        true
    } else {
        false
    }
}

/// Starts only if there is room to move in the current direction.
fn play(t: &mut Tween) -> bool {
    let can_move = if t.is_backwards {
        t.completed_loops > 0 || t.position > 0.0
    } else {
        !t.is_complete
    };
    if !t.is_playing && can_move {
        t.is_playing = true;
        true
    } else {
        false
    }
}

fn complete(slots: &mut Slots, id: TweenId, sink: &mut Sink<'_>) -> Applied {
    let Some(t) = slots.get(id) else {
        return Applied::default();
    };
    if t.is_complete {
        return Applied::default();
    }
    let (cl, force) = if t.loops >= 0 {
        (t.loops, false)
    } else {
        (t.cycle_index() + 1, true)
    };
    let duration = t.duration;
    let kill = tween::do_goto(slots, id, duration, cl, GotoMode::Jump, force, sink);
    if let Some(t) = slots.get_mut(id) {
        t.is_playing = false;
    }
    Applied {
        counted: true,
        kill,
    }
}

fn goto(slots: &mut Slots, id: TweenId, to: f32, and_play: bool, sink: &mut Sink<'_>) -> Applied {
    let snapshot = |t: &Tween| {
        (
            t.position,
            t.completed_loops,
            t.is_playing,
            t.is_complete,
            t.startup_done,
        )
    };
    let Some(t) = slots.get_mut(id) else {
        return Applied::default();
    };
    let before = snapshot(t);
    if !t.resolve_duration() {
        return Applied {
            counted: true,
            kill: Some(KillReason::StartupFailed),
        };
    }
    t.is_playing = and_play;
    t.delay_complete = true;
    t.elapsed_delay = t.delay;
    let (pos, cl) = t.full_to_goto(to);
    let kill = tween::do_goto(slots, id, pos, cl, GotoMode::Jump, false, sink);
    let after = slots.get(id).map(snapshot);
    Applied {
        counted: kill.is_some() || after != Some(before),
        kill,
    }
}

fn rewind(slots: &mut Slots, id: TweenId, include_delay: bool, sink: &mut Sink<'_>) -> Applied {
    let Some(t) = slots.get_mut(id) else {
        return Applied::default();
    };
    let mut changed = t.is_playing;
    t.is_playing = false;
    if include_delay {
        changed |= t.delay > 0.0 && t.elapsed_delay > 0.0;
        t.elapsed_delay = 0.0;
        t.delay_complete = t.delay <= 0.0;
    } else {
        changed |= t.elapsed_delay < t.delay;
        t.elapsed_delay = t.delay;
        t.delay_complete = true;
    }
    let mut kill = None;
    if t.position > 0.0 || t.completed_loops > 0 || !t.startup_done {
        changed = true;
        kill = tween::do_goto(slots, id, 0.0, 0, GotoMode::Jump, false, sink);
    }
    Applied {
        counted: changed,
        kill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::tween::{LoopType, TweenParams};

    fn unit() -> Tween {
        let mut t = Tween::new_tweener();
        t.configure(TweenParams::new().loops(2, LoopType::Restart), &Config::default(), 1.0);
        t
    }

    #[test]
    fn play_needs_room_to_move() {
        let mut t = unit();
        t.is_backwards = true;
        assert!(!play(&mut t));
        t.is_backwards = false;
        assert!(play(&mut t));
        assert!(!play(&mut t));
        assert!(pause(&mut t));
        assert!(!pause(&mut t));
        t.is_complete = true;
        assert!(!play(&mut t));
    }

    #[test]
    fn filters_match_identity() {
        let obj = std::rc::Rc::new(0_u8);
        let tag = ObjectId::of(&obj);
        let mut t = unit();
        t.identity.id = Some(4);
        t.identity.string_id = Some("menu".into());
        t.identity.target = Some(tag.clone());
        let mut slots = Slots::with_key();
        let id = slots.insert(unit());
        assert!(Filter::All.matches(id, &t));
        assert!(Filter::Id(4).matches(id, &t));
        assert!(!Filter::Id(5).matches(id, &t));
        assert!(Filter::StringId("menu").matches(id, &t));
        assert!(!Filter::StringId("").matches(id, &t));
        assert!(Filter::Object(&tag).matches(id, &t));
        assert!(Filter::Handle(id).matches(id, &t));
    }
}
