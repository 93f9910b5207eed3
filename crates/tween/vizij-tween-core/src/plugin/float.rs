//! Scalar `f32` tweening.

use super::{snap, EvalContext, TweenPlugin, TweenerData};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FloatOptions {
    /// Round every written value to the nearest integer.
    pub snapping: bool,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct FloatPlugin;

impl TweenPlugin for FloatPlugin {
    type Value = f32;
    type Interp = f32;
    type Options = FloatOptions;

    fn convert_to_interp(&self, value: &f32) -> f32 {
        *value
    }

    fn set_relative_end_value(&self, data: &mut TweenerData<Self>) {
        data.end_value += data.start_value;
    }

    fn set_change_value(&self, data: &mut TweenerData<Self>) {
        data.change_value = data.end_value - data.start_value;
    }

    fn speed_based_duration(&self, _options: &FloatOptions, units_per_second: f32, change: &f32) -> f32 {
        change.abs() / units_per_second
    }

    fn evaluate(
        &self,
        options: &FloatOptions,
        ctx: &EvalContext,
        _is_relative: bool,
        elapsed: f32,
        start: &f32,
        change: &f32,
        duration: f32,
    ) -> f32 {
        let start = start + change * ctx.incremental_factor();
        let value = start + change * ctx.progress(elapsed, duration);
        snap(value, options.snapping)
    }
}
