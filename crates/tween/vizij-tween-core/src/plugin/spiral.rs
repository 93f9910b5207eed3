//! Spiral motion around a direction axis.
//!
//! The end value is the spiral's axis, not a destination: the path starts at
//! the start value and winds outwards in the plane perpendicular to the axis,
//! drifting `depth` units along it over the tween.

use serde::{Deserialize, Serialize};

use super::{snap, EvalContext, TweenPlugin, TweenerData};

/// Axis used when the end value has no length.
pub const DEFAULT_DIRECTION: [f32; 3] = [0.0, 0.0, 1.0];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpiralMode {
    /// Expand outwards for the whole tween.
    #[default]
    Expand,
    /// Expand for the first half, then spiral back in to the start.
    ExpandThenContract,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpiralOptions {
    /// Drift along the axis over the full tween.
    pub depth: f32,
    pub frequency: f32,
    /// Radial speed; 1 is roughly one turn per second.
    pub speed: f32,
    pub mode: SpiralMode,
    pub snapping: bool,
    scaled_speed: f32,
    basis: [[f32; 3]; 3],
}

impl Default for SpiralOptions {
    fn default() -> Self {
        Self {
            depth: 0.0,
            frequency: 10.0,
            speed: 1.0,
            mode: SpiralMode::Expand,
            snapping: false,
            scaled_speed: 1.0,
            basis: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], DEFAULT_DIRECTION],
        }
    }
}

impl SpiralOptions {
    pub fn new(depth: f32, frequency: f32, speed: f32, mode: SpiralMode) -> Self {
        Self {
            depth,
            frequency,
            speed,
            mode,
            ..Self::default()
        }
    }
}

#[inline]
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn normalize_or(v: [f32; 3], fallback: [f32; 3]) -> [f32; 3] {
    let len2 = v[0] * v[0] + v[1] * v[1] + v[2] * v[2];
    if len2 > 1e-12 {
        let inv = len2.sqrt().recip();
        [v[0] * inv, v[1] * inv, v[2] * inv]
    } else {
        fallback
    }
}

/// Orthonormal `[right, up, forward]` looking along `direction` with world up.
fn look_basis(direction: [f32; 3]) -> [[f32; 3]; 3] {
    let forward = normalize_or(direction, DEFAULT_DIRECTION);
    let right = normalize_or(cross([0.0, 1.0, 0.0], forward), [1.0, 0.0, 0.0]);
    let up = cross(forward, right);
    [right, up, forward]
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SpiralPlugin;

impl TweenPlugin for SpiralPlugin {
    type Value = [f32; 3];
    type Interp = [f32; 3];
    type Options = SpiralOptions;

    fn convert_to_interp(&self, value: &[f32; 3]) -> [f32; 3] {
        *value
    }

    fn set_relative_end_value(&self, _data: &mut TweenerData<Self>) {
        // Already relative to the start value.
    }

    fn set_change_value(&self, data: &mut TweenerData<Self>) {
        let opts = &mut data.options;
        opts.scaled_speed = if opts.frequency != 0.0 {
            opts.speed * 10.0 / opts.frequency
        } else {
            opts.speed
        };
        opts.basis = look_basis(data.end_value);
        data.change_value = [0.0; 3];
    }

    fn speed_based_duration(&self, _options: &SpiralOptions, units_per_second: f32, _change: &[f32; 3]) -> f32 {
        units_per_second
    }

    fn evaluate(
        &self,
        options: &SpiralOptions,
        ctx: &EvalContext,
        _is_relative: bool,
        elapsed: f32,
        start: &[f32; 3],
        change: &[f32; 3],
        duration: f32,
    ) -> [f32; 3] {
        let inc = ctx.incremental_factor();
        let progress = ctx.progress(elapsed, duration);
        let unit = match options.mode {
            SpiralMode::ExpandThenContract if elapsed > duration * 0.5 => {
                (duration - elapsed) * options.scaled_speed
            }
            _ => elapsed * options.scaled_speed,
        };
        let local = [
            unit * (unit * options.frequency).cos(),
            unit * (unit * options.frequency).sin(),
            options.depth * progress,
        ];
        let [right, up, forward] = options.basis;
        std::array::from_fn(|i| {
            let rotated = right[i] * local[0] + up[i] * local[1] + forward[i] * local[2];
            snap(start[i] + change[i] * inc + rotated, options.snapping)
        })
    }
}
