//! Integer tweening. Interpolates in `f32` and rounds on write.

use super::{EvalContext, TweenPlugin, TweenerData};

#[derive(Copy, Clone, Debug, Default)]
pub struct IntPlugin;

impl TweenPlugin for IntPlugin {
    type Value = i32;
    type Interp = f32;
    type Options = ();

    fn convert_to_interp(&self, value: &i32) -> f32 {
        *value as f32
    }

    fn set_relative_end_value(&self, data: &mut TweenerData<Self>) {
        data.end_value += data.start_value;
    }

    fn set_change_value(&self, data: &mut TweenerData<Self>) {
        data.change_value = data.end_value - data.start_value;
    }

    fn speed_based_duration(&self, _options: &(), units_per_second: f32, change: &f32) -> f32 {
        change.abs() / units_per_second
    }

    fn evaluate(
        &self,
        _options: &(),
        ctx: &EvalContext,
        _is_relative: bool,
        elapsed: f32,
        start: &f32,
        change: &f32,
        duration: f32,
    ) -> i32 {
        let start = start + change * ctx.incremental_factor();
        (start + change * ctx.progress(elapsed, duration)).round() as i32
    }
}
