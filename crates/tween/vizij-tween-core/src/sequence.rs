//! Composite timelines.
//!
//! A sequence owns an ordered list of child units placed at offsets on its
//! own timeline. Moving the sequence from one update position to another is
//! broken into straight segments (split at loop boundaries) and each segment
//! drives the children it overlaps through a goto at their local time.

use std::mem;

use smallvec::SmallVec;

use crate::error::TweenError;
use crate::ids::TweenId;
use crate::outputs::KillReason;
use crate::tween::{self, GotoMode, LoopType, Sink, Slots, TweenKind};

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct SequenceEntry {
    pub child: TweenId,
    /// Where the child's own timeline starts (its delay folded in).
    pub offset: f32,
    /// `offset + child.full_duration`.
    pub end: f32,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct SequenceData {
    pub entries: Vec<SequenceEntry>,
    /// Insertion time of the last child, used by `join`.
    pub last_insert: f32,
}

impl SequenceData {
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.last_insert = 0.0;
    }
}

/// Movement of a sequence over one goto, in update positions.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Step {
    pub from: f32,
    pub from_cycle: i32,
    pub to: f32,
    pub to_cycle: i32,
    pub duration: f32,
    pub loop_type: LoopType,
}

impl Step {
    /// Straight runs between loop boundaries.
    fn segments(&self) -> SmallVec<[(f32, f32); 4]> {
        let d = self.duration;
        let mut out = SmallVec::new();
        let crossed = self.to_cycle - self.from_cycle;
        if crossed == 0 {
            out.push((self.from, self.to));
            return out;
        }
        let forward = crossed > 0;
        if self.loop_type != LoopType::Yoyo {
            let (end, start) = if forward { (d, 0.0) } else { (0.0, d) };
            out.push((self.from, end));
            out.push((end, start));
            out.push((start, self.to));
            return out;
        }
        // Yoyo: even cycles run 0 -> d, odd cycles d -> 0.
        let even = |cycle: i32| cycle % 2 == 0;
        let first = if forward == even(self.from_cycle) { d } else { 0.0 };
        out.push((self.from, first));
        let mut cur = first;
        if crossed.abs() >= 2 {
            let other = d - first;
            out.push((cur, other));
            cur = other;
        }
        let entry = if forward == even(self.to_cycle) { 0.0 } else { d };
        if cur != entry {
            out.push((cur, entry));
        }
        out.push((entry, self.to));
        out
    }
}

/// Drive the children of `seq` for one step. Returns the kill reason of the
/// first child that failed; the whole sequence goes with it.
pub(crate) fn apply(
    slots: &mut Slots,
    seq: TweenId,
    step: Step,
    mode: GotoMode,
    sink: &mut Sink<'_>,
) -> Option<KillReason> {
    for (from, to) in step.segments() {
        if let Some(reason) = apply_range(slots, seq, from, to, mode, sink) {
            return Some(reason);
        }
    }
    None
}

fn apply_range(
    slots: &mut Slots,
    seq: TweenId,
    from: f32,
    to: f32,
    mode: GotoMode,
    sink: &mut Sink<'_>,
) -> Option<KillReason> {
    let entries = match slots.get_mut(seq).map(|t| &mut t.kind) {
        Some(TweenKind::Sequence(data)) => mem::take(&mut data.entries),
        _ => return None,
    };

    let mut outcome = None;
    if to >= from {
        for entry in &entries {
            let hit = if to == from {
                entry.offset <= to && entry.end >= to
            } else {
                entry.offset <= to && entry.end > from
            };
            if hit {
                outcome = goto_child(slots, entry, to, mode, sink);
                if outcome.is_some() {
                    break;
                }
            }
        }
    } else {
        for entry in entries.iter().rev() {
            if entry.offset < from && entry.end >= to {
                outcome = goto_child(slots, entry, to, mode, sink);
                if outcome.is_some() {
                    break;
                }
            }
        }
    }

    if let Some(TweenKind::Sequence(data)) = slots.get_mut(seq).map(|t| &mut t.kind) {
        data.entries = entries;
    }
    outcome
}

fn goto_child(
    slots: &mut Slots,
    entry: &SequenceEntry,
    to: f32,
    mode: GotoMode,
    sink: &mut Sink<'_>,
) -> Option<KillReason> {
    let local = (to - entry.offset).clamp(0.0, entry.end - entry.offset);
    let (pos, cl) = slots.get(entry.child)?.full_to_goto(local);
    tween::do_goto(slots, entry.child, pos, cl, mode, false, sink)
}

/// Nest `child` into `seq` at `at`. The child must be a top-level, unstarted,
/// finite, duration-based unit; `seq` must be a top-level unstarted sequence.
pub(crate) fn insert(
    slots: &mut Slots,
    seq: TweenId,
    at: f32,
    child: TweenId,
) -> Result<(), TweenError> {
    if seq == child {
        return Err(TweenError::SelfInsertion);
    }
    let parent = slots.get(seq).ok_or(TweenError::StaleHandle)?;
    if !parent.is_sequence() {
        return Err(TweenError::NotASequence);
    }
    if parent.startup_done || parent.played_once {
        return Err(TweenError::SequenceStarted);
    }
    if parent.parent.is_some() {
        return Err(TweenError::AlreadyNested);
    }

    let c = slots.get_mut(child).ok_or(TweenError::StaleHandle)?;
    if c.parent.is_some() || c.startup_done || c.played_once {
        return Err(TweenError::AlreadyNested);
    }
    if c.loops < 0 {
        return Err(TweenError::InfiniteLoopsInSequence);
    }
    if c.is_speed_based {
        return Err(TweenError::SpeedBasedInSequence);
    }

    let at = at.max(0.0);
    let offset = at + c.delay;
    let end = offset + c.full_duration;
    c.parent = Some(seq);
    c.is_playing = false;
    c.delay = 0.0;
    c.elapsed_delay = 0.0;
    c.delay_complete = true;

    let Some(parent) = slots.get_mut(seq) else {
        return Err(TweenError::StaleHandle);
    };
    if end > parent.duration {
        parent.duration = end;
        parent.refresh_full_duration();
    }
    if let TweenKind::Sequence(data) = &mut parent.kind {
        data.entries.push(SequenceEntry { child, offset, end });
        data.last_insert = at;
    }
    Ok(())
}

fn sealed_sequence(slots: &mut Slots, seq: TweenId) -> Result<&mut tween::Tween, TweenError> {
    let s = slots.get_mut(seq).ok_or(TweenError::StaleHandle)?;
    if !s.is_sequence() {
        return Err(TweenError::NotASequence);
    }
    if s.startup_done || s.played_once {
        return Err(TweenError::SequenceStarted);
    }
    Ok(s)
}

/// Current end of the timeline (where `append` inserts).
pub(crate) fn duration_of(slots: &Slots, seq: TweenId) -> Result<f32, TweenError> {
    let s = slots.get(seq).ok_or(TweenError::StaleHandle)?;
    if !s.is_sequence() {
        return Err(TweenError::NotASequence);
    }
    Ok(s.duration)
}

/// Insertion time of the last child (where `join` inserts).
pub(crate) fn last_insert_of(slots: &Slots, seq: TweenId) -> Result<f32, TweenError> {
    match slots.get(seq).map(|t| &t.kind) {
        Some(TweenKind::Sequence(data)) => Ok(data.last_insert),
        Some(_) => Err(TweenError::NotASequence),
        None => Err(TweenError::StaleHandle),
    }
}

pub(crate) fn append_interval(slots: &mut Slots, seq: TweenId, interval: f32) -> Result<(), TweenError> {
    let s = sealed_sequence(slots, seq)?;
    s.duration += interval.max(0.0);
    s.refresh_full_duration();
    Ok(())
}

/// Push every child back by `interval`.
pub(crate) fn prepend_interval(slots: &mut Slots, seq: TweenId, interval: f32) -> Result<(), TweenError> {
    let interval = interval.max(0.0);
    let s = sealed_sequence(slots, seq)?;
    s.duration += interval;
    s.refresh_full_duration();
    if let TweenKind::Sequence(data) = &mut s.kind {
        for entry in &mut data.entries {
            entry.offset += interval;
            entry.end += interval;
        }
        data.last_insert = 0.0;
    }
    Ok(())
}

/// Children of `seq`, in insertion order.
pub(crate) fn children(slots: &Slots, seq: TweenId) -> SmallVec<[TweenId; 8]> {
    match slots.get(seq).map(|t| &t.kind) {
        Some(TweenKind::Sequence(data)) => data.entries.iter().map(|e| e.child).collect(),
        _ => SmallVec::new(),
    }
}
