//! RGBA color tweening, optionally limited to alpha.

use serde::{Deserialize, Serialize};

use super::float::lerp_f32;
use super::{EvalContext, TweenPlugin, TweenerData};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ColorOptions {
    /// Only the alpha channel moves; rgb stays at the start color.
    pub alpha_only: bool,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct ColorPlugin;

impl TweenPlugin for ColorPlugin {
    type Value = Color;
    type Interp = Color;
    type Options = ColorOptions;

    fn convert_to_interp(&self, value: &Color) -> Color {
        *value
    }

    fn set_relative_end_value(&self, data: &mut TweenerData<Self>) {
        let (s, e) = (data.start_value, &mut data.end_value);
        e.r += s.r;
        e.g += s.g;
        e.b += s.b;
        e.a += s.a;
    }

    fn set_change_value(&self, data: &mut TweenerData<Self>) {
        if data.options.alpha_only {
            let s = data.start_value;
            data.end_value.r = s.r;
            data.end_value.g = s.g;
            data.end_value.b = s.b;
        }
        let (s, e) = (data.start_value, data.end_value);
        data.change_value = Color::new(e.r - s.r, e.g - s.g, e.b - s.b, e.a - s.a);
    }

    fn speed_based_duration(&self, _options: &ColorOptions, units_per_second: f32, _change: &Color) -> f32 {
        1.0 / units_per_second
    }

    fn evaluate(
        &self,
        _options: &ColorOptions,
        ctx: &EvalContext,
        _is_relative: bool,
        elapsed: f32,
        start: &Color,
        change: &Color,
        duration: f32,
    ) -> Color {
        let inc = ctx.incremental_factor();
        let t = ctx.progress(elapsed, duration);
        let channel = |s: f32, c: f32| {
            let s = s + c * inc;
            lerp_f32(s, s + c, t)
        };
        Color::new(
            channel(start.r, change.r),
            channel(start.g, change.g),
            channel(start.b, change.b),
            channel(start.a, change.a),
        )
    }
}
