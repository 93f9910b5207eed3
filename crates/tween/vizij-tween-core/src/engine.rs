//! Engine: owns every live unit, the pools and the plugin cache, and
//! advances the active set once per tick.
//!
//! Methods:
//! - lifecycle: new/init, set_capacities, despawn_all, purge_all, clear
//! - creation: to, to_with, sequence (+ append/join/insert/intervals)
//! - stepping: tick (driver deltas), frame (applies the global time scale)
//! - control: filtered_operation and its per-operation wrappers

use std::mem;

use crate::accessor::Accessor;
use crate::config::Config;
use crate::error::{PoolKind, TweenError};
use crate::ids::TweenId;
use crate::ops::{self, Filter, Operation};
use crate::outputs::{KillReason, Outputs, TweenEvent};
use crate::plugin::{PluginCache, TweenPlugin, Tweenable};
use crate::pool::{Pool, PoolStats};
use crate::sequence;
use crate::tween::{self, GotoMode, Sink, Slots, Tween, TweenKind, TweenParams, UpdateType};
use crate::tweener::TweenerCore;

#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    initialized: bool,

    slots: Slots,
    /// Top-level units in creation order. Nested units are driven by their
    /// sequence and are not listed.
    active: Vec<TweenId>,
    tweeners: Pool,
    sequences: Pool,
    plugins: PluginCache,

    outputs: Outputs,
    /// Events raised between ticks, delivered with the next tick.
    pending: Vec<TweenEvent>,
    kill_queue: Vec<(TweenId, KillReason)>,
}

impl Default for Engine {
    /// An engine that initialises itself with default settings on first use.
    fn default() -> Self {
        let mut engine = Self::new(Config::default());
        engine.initialized = false;
        engine
    }
}

impl Engine {
    /// Create an initialised engine with the given config.
    pub fn new(mut cfg: Config) -> Self {
        cfg.normalize();
        Self {
            tweeners: Pool::new(PoolKind::Tweener, cfg.tweeners_capacity),
            sequences: Pool::new(PoolKind::Sequence, cfg.sequences_capacity),
            cfg,
            initialized: true,
            slots: Slots::with_key(),
            active: Vec::new(),
            plugins: PluginCache::new(),
            outputs: Outputs::default(),
            pending: Vec::new(),
            kill_queue: Vec::new(),
        }
    }

    /// Apply `cfg` if the engine has not been initialised yet. Later calls
    /// are ignored. Returns whether the config was applied.
    pub fn init(&mut self, cfg: Config) -> bool {
        if self.initialized {
            return false;
        }
        // Nothing can be spawned yet: creating a unit initialises the engine.
        *self = Self::new(cfg);
        if self.cfg.log_behaviour.allows(log::Level::Info) {
            log::info!(
                "tween engine initialised (tweeners {}, sequences {}, safe mode {})",
                self.cfg.tweeners_capacity,
                self.cfg.sequences_capacity,
                self.cfg.safe_mode
            );
        }
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Runtime settings (defaults, safe mode, time scale, logging). Pool
    /// capacities only change through [`Engine::set_capacities`].
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.cfg
    }

    fn ensure_init(&mut self) {
        if !self.initialized {
            self.initialized = true;
            if self.cfg.log_behaviour.allows(log::Level::Warn) {
                log::warn!("tween engine used before init; initialising with defaults");
            }
        }
    }

    fn report(&self, err: TweenError) -> TweenError {
        if self.cfg.log_behaviour.allows(log::Level::Error) {
            log::error!("{err} [{}]", err.category());
        }
        err
    }

    fn validate(&self, duration: f32, loops: i32) -> Result<(), TweenError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(self.report(TweenError::InvalidDuration { duration }));
        }
        Self::validate_loops(loops).map_err(|e| self.report(e))
    }

    fn validate_loops(loops: i32) -> Result<(), TweenError> {
        if loops == 0 || loops < -1 {
            return Err(TweenError::InvalidLoops { loops });
        }
        Ok(())
    }

    // ---------- creation ----------

    /// Tween the property behind `accessor` to `end` over `duration` seconds
    /// (or at `duration` units per second when speed-based), using the value
    /// type's default plugin.
    pub fn to<T: Tweenable>(
        &mut self,
        accessor: impl Accessor<T>,
        end: T,
        duration: f32,
        params: TweenParams,
    ) -> Result<TweenId, TweenError> {
        self.to_with::<T::Plugin>(accessor, end, Default::default(), duration, params)
    }

    /// Like [`Engine::to`] with an explicit plugin and its options.
    pub fn to_with<P: TweenPlugin + Default>(
        &mut self,
        accessor: impl Accessor<P::Value>,
        end: P::Value,
        options: P::Options,
        duration: f32,
        params: TweenParams,
    ) -> Result<TweenId, TweenError> {
        self.ensure_init();
        self.validate(duration, params.loops)?;
        let mut tween = self
            .tweeners
            .acquire(self.cfg.max_capacity, self.cfg.log_behaviour)?;
        let plugin = self.plugins.get::<P>();
        let auto_play = params
            .auto_play
            .unwrap_or(self.cfg.default_auto_play.tweeners());
        tween.configure(params, &self.cfg, duration);
        tween.kind = TweenKind::Tweener(Some(Box::new(TweenerCore::new(
            plugin,
            Box::new(accessor),
            &end,
            options,
        ))));
        tween.is_playing = auto_play;
        Ok(self.spawn(tween))
    }

    /// Create an empty sequence. Fill it with [`Engine::append`] and friends
    /// before it first updates; an empty sequence is killed when it starts.
    pub fn sequence(&mut self, params: TweenParams) -> Result<TweenId, TweenError> {
        self.ensure_init();
        Self::validate_loops(params.loops).map_err(|e| self.report(e))?;
        let mut tween = self
            .sequences
            .acquire(self.cfg.max_capacity, self.cfg.log_behaviour)?;
        // Sequence growth drags the tweener pool along.
        let needed = self.sequences.capacity();
        if needed > self.tweeners.capacity() {
            self.tweeners.grow_to(needed, self.cfg.log_behaviour);
        }
        let auto_play = params
            .auto_play
            .unwrap_or(self.cfg.default_auto_play.sequences());
        tween.configure(params, &self.cfg, 0.0);
        tween.is_playing = auto_play;
        Ok(self.spawn(tween))
    }

    fn spawn(&mut self, tween: Tween) -> TweenId {
        let id = self.slots.insert(tween);
        self.active.push(id);
        id
    }

    /// Add `child` at the current end of `seq`.
    pub fn append(&mut self, seq: TweenId, child: TweenId) -> Result<(), TweenError> {
        let at = sequence::duration_of(&self.slots, seq).map_err(|e| self.report(e))?;
        self.insert(seq, at, child)
    }

    /// Add `child` at the same time as the previously inserted child.
    pub fn join(&mut self, seq: TweenId, child: TweenId) -> Result<(), TweenError> {
        let at = sequence::last_insert_of(&self.slots, seq).map_err(|e| self.report(e))?;
        self.insert(seq, at, child)
    }

    /// Add `child` at `at` seconds. The child leaves the active set and is
    /// driven by the sequence from now on.
    pub fn insert(&mut self, seq: TweenId, at: f32, child: TweenId) -> Result<(), TweenError> {
        sequence::insert(&mut self.slots, seq, at, child).map_err(|e| self.report(e))?;
        self.active.retain(|&id| id != child);
        Ok(())
    }

    pub fn append_interval(&mut self, seq: TweenId, interval: f32) -> Result<(), TweenError> {
        sequence::append_interval(&mut self.slots, seq, interval).map_err(|e| self.report(e))
    }

    pub fn prepend_interval(&mut self, seq: TweenId, interval: f32) -> Result<(), TweenError> {
        sequence::prepend_interval(&mut self.slots, seq, interval).map_err(|e| self.report(e))
    }

    // ---------- stepping ----------

    /// Advance every playing top-level unit. `delta` drives normal units,
    /// `independent_delta` drives `TimeScaleIndependent` ones. Returns the
    /// events raised since the previous tick.
    pub fn tick(&mut self, delta: f32, independent_delta: f32) -> &Outputs {
        self.outputs.clear();
        self.outputs.events.append(&mut self.pending);
        if self.active.is_empty() {
            return &self.outputs;
        }

        let mut sink = Sink {
            events: &mut self.outputs.events,
            safe_mode: self.cfg.safe_mode,
            log: self.cfg.log_behaviour,
        };
        for i in 0..self.active.len() {
            let id = self.active[i];
            let Some(t) = self.slots.get_mut(id) else {
                continue;
            };
            if !t.is_playing || t.parent.is_some() {
                continue;
            }
            let raw = match t.update_type {
                UpdateType::Normal => delta,
                UpdateType::TimeScaleIndependent => independent_delta,
            };
            let mut step = raw * t.time_scale;
            if !t.delay_complete {
                step = t.update_delay(t.elapsed_delay + step);
                if step <= 0.0 {
                    continue;
                }
            }
            if !t.resolve_duration() {
                self.kill_queue.push((id, KillReason::StartupFailed));
                continue;
            }
            let (pos, cl) = t.tick_target(step);
            if let Some(reason) =
                tween::do_goto(&mut self.slots, id, pos, cl, GotoMode::Update, false, &mut sink)
            {
                self.kill_queue.push((id, reason));
            }
        }

        self.flush_kills();
        self.outputs.events.append(&mut self.pending);
        &self.outputs
    }

    /// Tick with raw frame deltas, scaling both by the global
    /// `Config::time_scale`.
    pub fn frame(&mut self, raw_delta: f32, raw_independent_delta: f32) -> &Outputs {
        let scale = self.cfg.time_scale;
        self.tick(raw_delta * scale, raw_independent_delta * scale)
    }

    // ---------- control ----------

    /// Apply `op` to every top-level unit matching `filter`. Returns how many
    /// units observably changed.
    pub fn filtered_operation(&mut self, op: Operation, filter: Filter<'_>) -> usize {
        if matches!(filter, Filter::StringId(s) if s.is_empty()) {
            return 0;
        }
        if op == Operation::Kill && matches!(filter, Filter::All) {
            return self.despawn_all();
        }

        let mut count = 0;
        let mut sink = Sink {
            events: &mut self.pending,
            safe_mode: self.cfg.safe_mode,
            log: self.cfg.log_behaviour,
        };
        for i in 0..self.active.len() {
            let id = self.active[i];
            let Some(t) = self.slots.get(id) else {
                continue;
            };
            if !filter.matches(id, t) {
                continue;
            }
            let applied = ops::run(op, &mut self.slots, id, &mut sink);
            if applied.counted {
                count += 1;
            }
            if let Some(reason) = applied.kill {
                self.kill_queue.push((id, reason));
            }
        }
        self.flush_kills();
        count
    }

    pub fn complete(&mut self, filter: Filter<'_>) -> usize {
        self.filtered_operation(Operation::Complete, filter)
    }

    pub fn flip(&mut self, filter: Filter<'_>) -> usize {
        self.filtered_operation(Operation::Flip, filter)
    }

    pub fn goto(&mut self, filter: Filter<'_>, to: f32, and_play: bool) -> usize {
        self.filtered_operation(Operation::Goto { to, and_play }, filter)
    }

    pub fn kill(&mut self, filter: Filter<'_>) -> usize {
        self.filtered_operation(Operation::Kill, filter)
    }

    pub fn pause(&mut self, filter: Filter<'_>) -> usize {
        self.filtered_operation(Operation::Pause, filter)
    }

    pub fn play(&mut self, filter: Filter<'_>) -> usize {
        self.filtered_operation(Operation::Play, filter)
    }

    pub fn play_backwards(&mut self, filter: Filter<'_>) -> usize {
        self.filtered_operation(Operation::PlayBackwards, filter)
    }

    pub fn play_forward(&mut self, filter: Filter<'_>) -> usize {
        self.filtered_operation(Operation::PlayForward, filter)
    }

    pub fn restart(&mut self, filter: Filter<'_>, include_delay: bool) -> usize {
        self.filtered_operation(Operation::Restart { include_delay }, filter)
    }

    pub fn rewind(&mut self, filter: Filter<'_>, include_delay: bool) -> usize {
        self.filtered_operation(Operation::Rewind { include_delay }, filter)
    }

    pub fn toggle_pause(&mut self, filter: Filter<'_>) -> usize {
        self.filtered_operation(Operation::TogglePause, filter)
    }

    // ---------- lifecycle ----------

    fn flush_kills(&mut self) {
        if self.kill_queue.is_empty() {
            return;
        }
        let mut queue = mem::take(&mut self.kill_queue);
        for (id, reason) in queue.drain(..) {
            if self.slots.contains_key(id) {
                self.pending.push(TweenEvent::Killed { id, reason });
                self.despawn_tree(id);
            }
        }
        self.kill_queue = queue;
        let slots = &self.slots;
        self.active.retain(|id| slots.contains_key(*id));
    }

    /// Remove a unit and everything nested in it, returning them to their pools.
    fn despawn_tree(&mut self, id: TweenId) {
        let children = sequence::children(&self.slots, id);
        if let Some(tween) = self.slots.remove(id) {
            if tween.is_sequence() {
                self.sequences.release(tween);
            } else {
                self.tweeners.release(tween);
            }
        }
        for child in children {
            self.despawn_tree(child);
        }
    }

    /// Kill every unit. Returns how many top-level units were killed.
    pub fn despawn_all(&mut self) -> usize {
        let mut active = mem::take(&mut self.active);
        for &id in &active {
            if self.slots.contains_key(id) {
                self.pending.push(TweenEvent::Killed {
                    id,
                    reason: KillReason::Manual,
                });
                self.despawn_tree(id);
            }
        }
        let killed = active.len();
        active.clear();
        self.active = active;
        killed
    }

    /// Drop every unit without events and reset both pools to the configured
    /// capacities, forgetting any growth. The configured capacities are the
    /// last ones passed to [`Engine::set_capacities`] (or the initial
    /// `Config`), not the built-in defaults.
    pub fn purge_all(&mut self) {
        self.slots.clear();
        self.active.clear();
        self.pending.clear();
        self.kill_queue.clear();
        self.outputs.clear();
        self.tweeners.purge(self.cfg.tweeners_capacity);
        self.sequences.purge(self.cfg.sequences_capacity);
    }

    /// Full reset: `purge_all` plus the plugin cache. Pool capacities return
    /// to the last configured values, as in `purge_all`.
    pub fn clear(&mut self) {
        self.purge_all();
        self.plugins.purge();
    }

    /// Resize the pools. Only allowed while nothing is spawned. The
    /// sequence capacity never exceeds the tweener capacity; a larger value
    /// raises the tweener capacity to match.
    pub fn set_capacities(&mut self, tweeners: usize, sequences: usize) -> Result<(), TweenError> {
        self.ensure_init();
        let spawned = self.tweeners.spawned() + self.sequences.spawned();
        if spawned > 0 {
            return Err(self.report(TweenError::TweensActive { spawned }));
        }
        let max = self.cfg.max_capacity;
        let sequences = sequences.min(max);
        let tweeners = tweeners.max(sequences).min(max);
        self.cfg.tweeners_capacity = tweeners;
        self.cfg.sequences_capacity = sequences;
        self.tweeners.set_capacity(tweeners);
        self.sequences.set_capacity(sequences);
        Ok(())
    }

    // ---------- inspection ----------

    /// A live unit (top-level or nested).
    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.slots.get(id)
    }

    pub fn is_alive(&self, id: TweenId) -> bool {
        self.slots.contains_key(id)
    }

    /// Number of top-level units.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Number of spawned units including nested ones.
    pub fn spawned_count(&self) -> usize {
        self.slots.len()
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats::of(&self.tweeners, &self.sequences)
    }

    pub fn cached_plugins(&self) -> usize {
        self.plugins.len()
    }
}
