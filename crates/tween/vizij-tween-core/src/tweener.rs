//! Single-property tween payload.
//!
//! `TweenerCore<P>` binds a plugin to an accessor and the values cached at
//! startup. The unit stores it behind the object-safe [`Animate`] trait so
//! tweens of every value type share one pool.

use std::rc::Rc;

use crate::accessor::Accessor;
use crate::plugin::{EvalContext, TweenPlugin, TweenerData};

pub(crate) trait Animate {
    /// Read the start value and cache end/change values. `false` if the
    /// getter failed.
    fn startup(&mut self, is_relative: bool) -> bool;

    fn speed_based_duration(&self, units_per_second: f32) -> f32;

    /// Evaluate at `elapsed` and write the target. `false` if the write failed.
    fn apply(&mut self, ctx: &EvalContext, is_relative: bool, elapsed: f32, duration: f32) -> bool;

    fn is_target_alive(&self) -> bool;
}

pub(crate) struct TweenerCore<P: TweenPlugin> {
    plugin: Rc<P>,
    data: TweenerData<P>,
    accessor: Box<dyn Accessor<P::Value>>,
}

impl<P: TweenPlugin> TweenerCore<P> {
    pub(crate) fn new(
        plugin: Rc<P>,
        accessor: Box<dyn Accessor<P::Value>>,
        end: &P::Value,
        options: P::Options,
    ) -> Self {
        let end_value = plugin.convert_to_interp(end);
        // Placeholders until startup reads the target.
        Self {
            data: TweenerData {
                start_value: end_value.clone(),
                change_value: end_value.clone(),
                end_value,
                options,
            },
            plugin,
            accessor,
        }
    }
}

impl<P: TweenPlugin> Animate for TweenerCore<P> {
    fn startup(&mut self, is_relative: bool) -> bool {
        let Some(current) = self.accessor.get() else {
            return false;
        };
        self.data.start_value = self.plugin.convert_to_interp(&current);
        if is_relative {
            self.plugin.set_relative_end_value(&mut self.data);
        }
        self.plugin.set_change_value(&mut self.data);
        true
    }

    fn speed_based_duration(&self, units_per_second: f32) -> f32 {
        self.plugin
            .speed_based_duration(&self.data.options, units_per_second, &self.data.change_value)
    }

    fn apply(&mut self, ctx: &EvalContext, is_relative: bool, elapsed: f32, duration: f32) -> bool {
        let value = self.plugin.evaluate(
            &self.data.options,
            ctx,
            is_relative,
            elapsed,
            &self.data.start_value,
            &self.data.change_value,
            duration,
        );
        self.accessor.set(value)
    }

    fn is_target_alive(&self) -> bool {
        self.accessor.is_alive()
    }
}
