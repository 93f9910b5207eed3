//! Component-wise tweening of `[f32; N]` vectors.

use super::float::lerp_f32;
use super::{snap, EvalContext, TweenPlugin, TweenerData};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VectorOptions {
    pub snapping: bool,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct VectorPlugin<const N: usize>;

#[inline]
fn length<const N: usize>(v: &[f32; N]) -> f32 {
    v.iter().map(|c| c * c).sum::<f32>().sqrt()
}

impl<const N: usize> TweenPlugin for VectorPlugin<N> {
    type Value = [f32; N];
    type Interp = [f32; N];
    type Options = VectorOptions;

    fn convert_to_interp(&self, value: &[f32; N]) -> [f32; N] {
        *value
    }

    fn set_relative_end_value(&self, data: &mut TweenerData<Self>) {
        for (e, s) in data.end_value.iter_mut().zip(data.start_value.iter()) {
            *e += s;
        }
    }

    fn set_change_value(&self, data: &mut TweenerData<Self>) {
        data.change_value = std::array::from_fn(|i| data.end_value[i] - data.start_value[i]);
    }

    fn speed_based_duration(&self, _options: &VectorOptions, units_per_second: f32, change: &[f32; N]) -> f32 {
        length(change) / units_per_second
    }

    fn evaluate(
        &self,
        options: &VectorOptions,
        ctx: &EvalContext,
        _is_relative: bool,
        elapsed: f32,
        start: &[f32; N],
        change: &[f32; N],
        duration: f32,
    ) -> [f32; N] {
        let inc = ctx.incremental_factor();
        let t = ctx.progress(elapsed, duration);
        std::array::from_fn(|i| {
            let s = start[i] + change[i] * inc;
            snap(lerp_f32(s, s + change[i], t), options.snapping)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::ctx;
    use crate::tween::LoopType;

    #[test]
    fn interpolates_each_component() {
        let mut d = TweenerData::<VectorPlugin<3>> {
            start_value: [0.0, 10.0, -2.0],
            end_value: [4.0, 0.0, 2.0],
            change_value: [0.0; 3],
            options: VectorOptions::default(),
        };
        VectorPlugin::<3>.set_change_value(&mut d);
        let c = ctx(LoopType::Restart, 0, false);
        let v = VectorPlugin::<3>.evaluate(&d.options, &c, false, 0.5, &d.start_value, &d.change_value, 1.0);
        assert_eq!(v, [2.0, 5.0, 0.0]);
    }

    #[test]
    fn speed_based_duration_uses_euclidean_length() {
        let dur = VectorPlugin::<2>.speed_based_duration(&VectorOptions::default(), 5.0, &[3.0, 4.0]);
        assert!((dur - 1.0).abs() < 1e-6);
    }
}
