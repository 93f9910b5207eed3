//! Value evaluators.
//!
//! A plugin knows how to interpolate one value type. It never owns tween
//! state: the unit hands it the cached start/change values, the elapsed time
//! and an [`EvalContext`] describing the loop state, and writes back whatever
//! `evaluate` returns.

pub mod color;
pub mod float;
pub mod int;
pub mod spiral;
pub mod vector;

use std::any::{Any, TypeId};
use std::rc::Rc;

use hashbrown::HashMap;

use crate::easing::{self, Ease};
use crate::tween::LoopType;

pub use color::{Color, ColorOptions, ColorPlugin};
pub use float::{FloatOptions, FloatPlugin};
pub use int::IntPlugin;
pub use spiral::{SpiralMode, SpiralOptions, SpiralPlugin};
pub use vector::{VectorOptions, VectorPlugin};

/// Loop state of the evaluating unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EvalContext {
    pub loop_type: LoopType,
    pub completed_loops: i32,
    /// Whether the unit sits at the end of a loop it just finished.
    pub at_loop_end: bool,
    pub ease: Ease,
    pub ease_overshoot_or_amplitude: f32,
    pub ease_period: f32,
}

impl EvalContext {
    /// Number of whole `change` offsets an incremental unit has accumulated.
    /// At the end of a loop the loop just finished is not counted again.
    #[inline]
    pub fn incremental_loops(&self) -> i32 {
        if self.at_loop_end && self.completed_loops > 0 {
            self.completed_loops - 1
        } else {
            self.completed_loops
        }
    }

    /// Offset multiplier for `change` under this context's loop type.
    #[inline]
    pub fn incremental_factor(&self) -> f32 {
        if self.loop_type == LoopType::Incremental {
            self.incremental_loops() as f32
        } else {
            0.0
        }
    }

    /// Eased progress in `[0, 1]` (may overshoot for back/elastic eases).
    #[inline]
    pub fn progress(&self, elapsed: f32, duration: f32) -> f32 {
        easing::evaluate(
            self.ease,
            elapsed,
            duration,
            self.ease_overshoot_or_amplitude,
            self.ease_period,
        )
    }
}

/// Values cached by a tweener at startup.
pub struct TweenerData<P: TweenPlugin + ?Sized> {
    pub start_value: P::Interp,
    pub end_value: P::Interp,
    pub change_value: P::Interp,
    pub options: P::Options,
}

impl<P: TweenPlugin + ?Sized> Clone for TweenerData<P> {
    fn clone(&self) -> Self {
        Self {
            start_value: self.start_value.clone(),
            end_value: self.end_value.clone(),
            change_value: self.change_value.clone(),
            options: self.options.clone(),
        }
    }
}

impl<P: TweenPlugin + ?Sized> std::fmt::Debug for TweenerData<P>
where
    P::Interp: std::fmt::Debug,
    P::Options: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenerData")
            .field("start_value", &self.start_value)
            .field("end_value", &self.end_value)
            .field("change_value", &self.change_value)
            .field("options", &self.options)
            .finish()
    }
}

/// Interpolation strategy for one value type.
pub trait TweenPlugin: 'static {
    /// Type read from and written to the target.
    type Value: Clone + 'static;
    /// Type interpolated internally.
    type Interp: Clone + 'static;
    type Options: Clone + Default + 'static;

    fn convert_to_interp(&self, value: &Self::Value) -> Self::Interp;

    /// Turn a relative end value into an absolute one (`end = start + end`).
    fn set_relative_end_value(&self, data: &mut TweenerData<Self>);

    /// Cache `change_value`. Must be idempotent.
    fn set_change_value(&self, data: &mut TweenerData<Self>);

    /// Duration for a speed-based tween moving at `units_per_second`.
    fn speed_based_duration(
        &self,
        options: &Self::Options,
        units_per_second: f32,
        change: &Self::Interp,
    ) -> f32;

    /// Value at `elapsed` seconds into the current loop. Pure.
    #[allow(clippy::too_many_arguments)]
    fn evaluate(
        &self,
        options: &Self::Options,
        ctx: &EvalContext,
        is_relative: bool,
        elapsed: f32,
        start: &Self::Interp,
        change: &Self::Interp,
        duration: f32,
    ) -> Self::Value;
}

/// Value types with a default plugin, usable with `Engine::to`.
pub trait Tweenable: Clone + 'static {
    type Plugin: TweenPlugin<Value = Self> + Default;
}

impl Tweenable for f32 {
    type Plugin = FloatPlugin;
}

impl Tweenable for i32 {
    type Plugin = IntPlugin;
}

impl<const N: usize> Tweenable for [f32; N] {
    type Plugin = VectorPlugin<N>;
}

impl Tweenable for Color {
    type Plugin = ColorPlugin;
}

/// Shared plugin instances, one per plugin type.
#[derive(Default)]
pub struct PluginCache {
    plugins: HashMap<TypeId, Rc<dyn Any>>,
}

impl PluginCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached instance of `P`, created on first use.
    pub fn get<P: TweenPlugin + Default>(&mut self) -> Rc<P> {
        let entry = self
            .plugins
            .entry(TypeId::of::<P>())
            .or_insert_with(|| Rc::new(P::default()) as Rc<dyn Any>);
        match entry.clone().downcast::<P>() {
            Ok(plugin) => plugin,
            // Keys are derived from the stored type, so this can't mismatch;
            // fall back to a fresh instance rather than panic.
            Err(_) => Rc::new(P::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Drop every cached instance. Tweens keep their own `Rc`.
    pub fn purge(&mut self) {
        self.plugins.clear();
    }
}

impl std::fmt::Debug for PluginCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginCache")
            .field("len", &self.plugins.len())
            .finish()
    }
}

#[inline]
pub(crate) fn snap(v: f32, snapping: bool) -> f32 {
    if snapping {
        v.round()
    } else {
        v
    }
}

#[cfg(test)]
pub(crate) fn ctx(loop_type: LoopType, completed_loops: i32, at_loop_end: bool) -> EvalContext {
    EvalContext {
        loop_type,
        completed_loops,
        at_loop_end,
        ease: Ease::Linear,
        ease_overshoot_or_amplitude: easing::DEFAULT_OVERSHOOT,
        ease_period: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incremental_loops_skip_just_finished_loop() {
        assert_eq!(ctx(LoopType::Incremental, 2, false).incremental_loops(), 2);
        assert_eq!(ctx(LoopType::Incremental, 2, true).incremental_loops(), 1);
        assert_eq!(ctx(LoopType::Incremental, 0, true).incremental_loops(), 0);
        assert_eq!(ctx(LoopType::Restart, 3, false).incremental_factor(), 0.0);
    }

    #[test]
    fn plugin_cache_shares_instances_until_purged() {
        let mut cache = PluginCache::new();
        let a = cache.get::<FloatPlugin>();
        let b = cache.get::<FloatPlugin>();
        assert!(Rc::ptr_eq(&a, &b));
        let _ = cache.get::<SpiralPlugin>();
        assert_eq!(cache.len(), 2);
        cache.purge();
        assert!(cache.is_empty());
        let c = cache.get::<FloatPlugin>();
        assert!(!Rc::ptr_eq(&a, &c));
    }
}
