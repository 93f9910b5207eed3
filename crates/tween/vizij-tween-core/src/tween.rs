//! The animation unit shared by tweeners and sequences.
//!
//! Time is kept as `(position, completed_loops)`. `position` is seconds into
//! the current loop and never leaves `[0, duration]`. When a loop has just
//! finished, the unit rests at `position == duration` of the finished loop
//! rather than at `0` of the next one, so the final value of a loop is what
//! gets written.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::config::{Config, LogBehaviour};
use crate::easing::{Ease, DEFAULT_OVERSHOOT};
use crate::ids::{Identity, ObjectId, TweenId};
use crate::outputs::{KillReason, TweenEvent};
use crate::plugin::EvalContext;
use crate::sequence::{self, SequenceData};
use crate::tweener::Animate;

/// Floor for durations computed from a speed.
pub const MIN_SPEED_BASED_DURATION: f32 = 1e-4;

pub(crate) type Slots = SlotMap<TweenId, Tween>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopType {
    /// Each loop starts again from the start value.
    #[default]
    Restart,
    /// Alternate loops run backwards.
    Yoyo,
    /// Each loop continues from where the previous one ended.
    Incremental,
}

/// Which delta a unit consumes from `Engine::tick`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateType {
    #[default]
    Normal,
    TimeScaleIndependent,
}

/// Coarse lifecycle state, derived from the unit's flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Sitting in a pool.
    Idle,
    /// Spawned but never started.
    Configured,
    Playing,
    Paused,
    Complete,
}

pub(crate) enum TweenKind {
    Tweener(Option<Box<dyn Animate>>),
    Sequence(SequenceData),
}

/// Caller-side configuration for a new tween or sequence. Unset options fall
/// back to the engine's [`Config`] defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct TweenParams {
    pub id: Option<i32>,
    pub string_id: Option<String>,
    pub target: Option<ObjectId>,
    pub ease: Option<Ease>,
    pub ease_overshoot_or_amplitude: f32,
    pub ease_period: f32,
    /// `-1` for infinite, otherwise at least 1.
    pub loops: i32,
    pub loop_type: Option<LoopType>,
    pub delay: f32,
    pub auto_kill: Option<bool>,
    pub auto_play: Option<bool>,
    /// End value is an offset from the start value.
    pub relative: bool,
    /// The duration argument is a speed in units per second.
    pub speed_based: bool,
    pub update_type: UpdateType,
    pub time_scale: f32,
}

impl Default for TweenParams {
    fn default() -> Self {
        Self {
            id: None,
            string_id: None,
            target: None,
            ease: None,
            ease_overshoot_or_amplitude: DEFAULT_OVERSHOOT,
            ease_period: 0.0,
            loops: 1,
            loop_type: None,
            delay: 0.0,
            auto_kill: None,
            auto_play: None,
            relative: false,
            speed_based: false,
            update_type: UpdateType::Normal,
            time_scale: 1.0,
        }
    }
}

impl TweenParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn string_id(mut self, id: impl Into<String>) -> Self {
        self.string_id = Some(id.into());
        self
    }

    pub fn target(mut self, target: ObjectId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Overshoot for back eases, amplitude and period for elastic ones.
    pub fn ease_params(mut self, overshoot_or_amplitude: f32, period: f32) -> Self {
        self.ease_overshoot_or_amplitude = overshoot_or_amplitude;
        self.ease_period = period;
        self
    }

    pub fn loops(mut self, loops: i32, loop_type: LoopType) -> Self {
        self.loops = loops;
        self.loop_type = Some(loop_type);
        self
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn auto_kill(mut self, auto_kill: bool) -> Self {
        self.auto_kill = Some(auto_kill);
        self
    }

    pub fn auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = Some(auto_play);
        self
    }

    pub fn relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    pub fn speed_based(mut self, speed_based: bool) -> Self {
        self.speed_based = speed_based;
        self
    }

    pub fn update_type(mut self, update_type: UpdateType) -> Self {
        self.update_type = update_type;
        self
    }

    pub fn time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}

/// A tweener or sequence. Read-only outside the engine; obtain one with
/// `Engine::get`.
pub struct Tween {
    pub(crate) kind: TweenKind,
    pub(crate) parent: Option<TweenId>,
    pub(crate) identity: Identity,
    pub(crate) update_type: UpdateType,
    pub(crate) time_scale: f32,
    pub(crate) is_backwards: bool,
    pub(crate) is_relative: bool,
    pub(crate) is_speed_based: bool,
    pub(crate) auto_kill: bool,

    pub(crate) ease: Ease,
    pub(crate) ease_overshoot_or_amplitude: f32,
    pub(crate) ease_period: f32,

    pub(crate) loops: i32,
    pub(crate) loop_type: LoopType,
    pub(crate) delay: f32,
    pub(crate) elapsed_delay: f32,
    pub(crate) delay_complete: bool,

    pub(crate) duration: f32,
    pub(crate) full_duration: f32,
    pub(crate) position: f32,
    pub(crate) completed_loops: i32,

    pub(crate) is_playing: bool,
    pub(crate) is_complete: bool,
    pub(crate) startup_done: bool,
    pub(crate) played_once: bool,
    /// Spawned (not in a pool).
    pub(crate) active: bool,
}

impl Tween {
    pub(crate) fn new_tweener() -> Self {
        Self::blank(TweenKind::Tweener(None))
    }

    pub(crate) fn new_sequence() -> Self {
        Self::blank(TweenKind::Sequence(SequenceData::default()))
    }

    fn blank(kind: TweenKind) -> Self {
        Self {
            kind,
            parent: None,
            identity: Identity::default(),
            update_type: UpdateType::Normal,
            time_scale: 1.0,
            is_backwards: false,
            is_relative: false,
            is_speed_based: false,
            auto_kill: true,
            ease: Ease::default(),
            ease_overshoot_or_amplitude: DEFAULT_OVERSHOOT,
            ease_period: 0.0,
            loops: 1,
            loop_type: LoopType::Restart,
            delay: 0.0,
            elapsed_delay: 0.0,
            delay_complete: true,
            duration: 0.0,
            full_duration: 0.0,
            position: 0.0,
            completed_loops: 0,
            is_playing: false,
            is_complete: false,
            startup_done: false,
            played_once: false,
            active: false,
        }
    }

    /// Return every field to its pooled state. Drops the accessor and clears
    /// sequence entries (keeping their allocation).
    pub(crate) fn reset(&mut self) {
        let kind = match std::mem::replace(&mut self.kind, TweenKind::Tweener(None)) {
            TweenKind::Tweener(_) => TweenKind::Tweener(None),
            TweenKind::Sequence(mut data) => {
                data.clear();
                TweenKind::Sequence(data)
            }
        };
        *self = Self::blank(kind);
    }

    /// Apply caller params and engine defaults to a freshly acquired unit.
    pub(crate) fn configure(&mut self, params: TweenParams, cfg: &Config, duration: f32) {
        self.identity = Identity {
            id: params.id,
            string_id: params.string_id,
            target: params.target,
        };
        self.update_type = params.update_type;
        self.time_scale = params.time_scale;
        self.is_relative = params.relative;
        self.is_speed_based = params.speed_based;
        self.auto_kill = params.auto_kill.unwrap_or(cfg.default_auto_kill);
        self.ease = params.ease.unwrap_or(cfg.default_ease);
        self.ease_overshoot_or_amplitude = params.ease_overshoot_or_amplitude;
        self.ease_period = params.ease_period;
        self.loops = params.loops;
        self.loop_type = params.loop_type.unwrap_or(cfg.default_loop_type);
        self.delay = params.delay.max(0.0);
        self.elapsed_delay = 0.0;
        self.delay_complete = self.delay <= 0.0;
        self.duration = duration;
        self.refresh_full_duration();
        self.active = true;
    }

    pub(crate) fn refresh_full_duration(&mut self) {
        self.full_duration = if self.loops < 0 {
            f32::INFINITY
        } else {
            self.duration * self.loops as f32
        };
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, TweenKind::Sequence(_))
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Owning sequence, if nested.
    pub fn parent(&self) -> Option<TweenId> {
        self.parent
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn completed_loops(&self) -> i32 {
        self.completed_loops
    }

    /// Duration of one loop.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Duration of all loops, infinite for infinite loops.
    pub fn full_duration(&self) -> f32 {
        self.full_duration
    }

    /// Seconds elapsed over all loops, excluding delay.
    pub fn elapsed(&self) -> f32 {
        self.completed_loops as f32 * self.duration + self.position
            - if self.at_loop_end() { self.duration } else { 0.0 }
    }

    pub fn loops(&self) -> i32 {
        self.loops
    }

    pub fn loop_type(&self) -> LoopType {
        self.loop_type
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn elapsed_delay(&self) -> f32 {
        self.elapsed_delay
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn ease(&self) -> Ease {
        self.ease
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_backwards(&self) -> bool {
        self.is_backwards
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn auto_kill(&self) -> bool {
        self.auto_kill
    }

    pub fn state(&self) -> PlaybackState {
        if !self.active {
            PlaybackState::Idle
        } else if self.is_complete {
            PlaybackState::Complete
        } else if self.is_playing {
            PlaybackState::Playing
        } else if !self.startup_done && !self.played_once {
            PlaybackState::Configured
        } else {
            PlaybackState::Paused
        }
    }

    /// Sitting at the end of a loop that has just been counted.
    #[inline]
    pub(crate) fn at_loop_end(&self) -> bool {
        self.position >= self.duration && self.completed_loops > 0
    }

    /// Index of the loop the current position belongs to.
    #[inline]
    pub(crate) fn cycle_index(&self) -> i32 {
        if self.at_loop_end() {
            self.completed_loops - 1
        } else {
            self.completed_loops
        }
    }

    /// Position handed to evaluators: mirrored on the backward legs of Yoyo.
    pub(crate) fn update_position(&self) -> f32 {
        let inverse = self.loop_type == LoopType::Yoyo
            && if self.position < self.duration {
                self.completed_loops % 2 != 0
            } else {
                self.completed_loops % 2 == 0
            };
        if inverse {
            self.duration - self.position
        } else {
            self.position
        }
    }

    pub(crate) fn eval_context(&self) -> EvalContext {
        EvalContext {
            loop_type: self.loop_type,
            completed_loops: self.completed_loops,
            at_loop_end: self.at_loop_end(),
            ease: self.ease,
            ease_overshoot_or_amplitude: self.ease_overshoot_or_amplitude,
            ease_period: self.ease_period,
        }
    }

    /// Consume delay. Returns the part of `elapsed` left over once the delay
    /// is complete, or `0` while still waiting.
    pub(crate) fn update_delay(&mut self, elapsed: f32) -> f32 {
        if elapsed >= self.delay {
            self.elapsed_delay = self.delay;
            self.delay_complete = true;
            elapsed - self.delay
        } else {
            self.elapsed_delay = elapsed;
            0.0
        }
    }

    /// Where a tick of `delta` seconds moves this unit, wrapping loops.
    pub(crate) fn tick_target(&self, delta: f32) -> (f32, i32) {
        let d = self.duration;
        let mut pos = self.position;
        let mut cl = self.completed_loops;
        if self.at_loop_end() {
            // Same instant as the start of loop `cl`.
            pos = 0.0;
        }
        if !self.is_backwards {
            pos += delta;
            if pos >= d {
                let mut wraps = (pos / d).floor() as i32;
                if self.loops >= 0 {
                    wraps = wraps.min((self.loops - cl).max(0));
                }
                pos -= wraps as f32 * d;
                cl += wraps;
            }
        } else {
            pos -= delta;
            if pos < 0.0 {
                let unwraps = ((-pos / d).ceil() as i32).min(cl);
                pos += unwraps as f32 * d;
                cl -= unwraps;
            }
        }
        if self.loops >= 0 && cl >= self.loops {
            return (d, self.loops);
        }
        (pos, cl)
    }

    /// Split a time measured over all loops into `(position, completed_loops)`.
    pub(crate) fn full_to_goto(&self, to: f32) -> (f32, i32) {
        if self.duration <= 0.0 {
            return (0.0, 0);
        }
        let to = to.max(0.0);
        if self.loops >= 0 && to >= self.full_duration {
            return (self.duration, self.loops);
        }
        let cl = (to / self.duration).floor() as i32;
        (to - cl as f32 * self.duration, cl)
    }

    /// Speed-based units only know their real duration after startup, so it
    /// must run before a step is split into loops. Returns `false` if startup
    /// was needed and failed.
    pub(crate) fn resolve_duration(&mut self) -> bool {
        if self.is_speed_based && !self.startup_done {
            return self.startup();
        }
        true
    }

    /// First-evaluation setup. Returns `false` if the unit can't run.
    fn startup(&mut self) -> bool {
        self.startup_done = true;
        match &mut self.kind {
            TweenKind::Tweener(Some(core)) => {
                if !core.startup(self.is_relative) {
                    return false;
                }
                if self.is_speed_based {
                    let d = core.speed_based_duration(self.duration);
                    self.duration = if d.is_finite() && d > 0.0 {
                        d
                    } else {
                        MIN_SPEED_BASED_DURATION
                    };
                    self.refresh_full_duration();
                }
                true
            }
            TweenKind::Tweener(None) => false,
            TweenKind::Sequence(_) => self.duration > 0.0,
        }
    }
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("sequence", &self.is_sequence())
            .field("identity", &self.identity)
            .field("parent", &self.parent)
            .field("position", &self.position)
            .field("completed_loops", &self.completed_loops)
            .field("duration", &self.duration)
            .field("loops", &self.loops)
            .field("loop_type", &self.loop_type)
            .field("state", &self.state())
            .finish()
    }
}

/// How a goto was triggered. Only ticks fire start and loop events.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum GotoMode {
    Update,
    Jump,
}

/// Where a goto reports what happened.
pub(crate) struct Sink<'a> {
    pub events: &'a mut Vec<TweenEvent>,
    pub safe_mode: bool,
    pub log: LogBehaviour,
}

/// Move a unit to `(to_pos, to_cl)`, evaluate it (children first for
/// sequences) and fire events. Returns a kill reason when the unit must be
/// despawned; nested units never ask for auto-kill themselves.
pub(crate) fn do_goto(
    slots: &mut Slots,
    id: TweenId,
    to_pos: f32,
    to_cl: i32,
    mode: GotoMode,
    force_complete: bool,
    sink: &mut Sink<'_>,
) -> Option<KillReason> {
    let t = slots.get_mut(id)?;
    if !t.startup_done && !t.startup() {
        if sink.log.allows(log::Level::Warn) {
            log::warn!("tween {id:?} failed to start and will be killed");
        }
        return Some(KillReason::StartupFailed);
    }
    if !t.played_once && mode == GotoMode::Update {
        t.played_once = true;
        sink.events.push(TweenEvent::Started { id });
    }

    let prev_cl = t.completed_loops;
    let prev_update = t.update_position();
    let prev_cycle = t.cycle_index();
    let was_complete = t.is_complete;

    t.completed_loops = to_cl;
    t.is_complete = if t.loops < 0 {
        force_complete
    } else {
        to_cl >= t.loops
    };
    t.position = if to_pos > t.duration {
        t.duration
    } else if to_pos <= 0.0 {
        if to_cl > 0 || t.is_complete {
            t.duration
        } else {
            0.0
        }
    } else {
        to_pos
    };
    if t.is_playing {
        t.is_playing = if t.is_backwards {
            !(t.completed_loops == 0 && t.position <= 0.0)
        } else {
            !t.is_complete
        };
    }

    let is_complete = t.is_complete;
    let kill_on_complete = t.auto_kill && t.parent.is_none();
    let outcome = if t.is_sequence() {
        let step = sequence::Step {
            from: prev_update,
            from_cycle: prev_cycle,
            to: t.update_position(),
            to_cycle: t.cycle_index(),
            duration: t.duration,
            loop_type: t.loop_type,
        };
        sequence::apply(slots, id, step, mode, sink)
    } else {
        apply_leaf(t, id, sink)
    };
    if outcome.is_some() {
        return outcome;
    }

    if mode == GotoMode::Update && to_cl != prev_cl {
        sink.events.push(TweenEvent::LoopCompleted {
            id,
            completed_loops: to_cl,
        });
    }
    if is_complete && !was_complete {
        sink.events.push(TweenEvent::Completed { id });
        if kill_on_complete {
            return Some(KillReason::AutoKill);
        }
    }
    None
}

fn apply_leaf(t: &mut Tween, id: TweenId, sink: &mut Sink<'_>) -> Option<KillReason> {
    let ctx = t.eval_context();
    let elapsed = t.update_position();
    let (duration, is_relative) = (t.duration, t.is_relative);
    let TweenKind::Tweener(Some(core)) = &mut t.kind else {
        return None;
    };
    if sink.safe_mode {
        let tag_dead = t.identity.target.as_ref().is_some_and(|o| !o.is_alive());
        if tag_dead || !core.is_target_alive() {
            if sink.log.allows(log::Level::Info) {
                log::info!("tween {id:?} target is gone, killing it");
            }
            return Some(KillReason::TargetLost);
        }
    }
    if !core.apply(&ctx, is_relative, elapsed, duration) {
        if !sink.safe_mode && sink.log.allows(log::Level::Warn) {
            log::warn!("tween {id:?} could not write its target and was killed; enable safe mode to check targets first");
        }
        return Some(KillReason::TargetLost);
    }
    None
}
