//! Easing function table.
//!
//! Every function maps `(time, duration, overshoot_or_amplitude, period)` to a
//! normalized progress where `0` is the start value and `1` the end value.
//! Back and elastic curves may leave `[0, 1]` in between.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

/// Default overshoot for back eases (and amplitude for elastic ones).
pub const DEFAULT_OVERSHOOT: f32 = 1.70158;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    InSine,
    OutSine,
    InOutSine,
    InQuad,
    OutQuad,
    #[default]
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InElastic,
    OutElastic,
    InOutElastic,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Ease {
    /// Evaluate this ease. See [`evaluate`].
    #[inline]
    pub fn evaluate(self, time: f32, duration: f32, overshoot_or_amplitude: f32, period: f32) -> f32 {
        evaluate(self, time, duration, overshoot_or_amplitude, period)
    }
}

/// Normalized eased progress for `time` in `[0, duration]`.
pub fn evaluate(
    ease: Ease,
    time: f32,
    duration: f32,
    overshoot_or_amplitude: f32,
    period: f32,
) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    let time = time.clamp(0.0, duration);
    let d = duration;
    let s = overshoot_or_amplitude;
    match ease {
        Ease::Linear => time / d,
        Ease::InSine => 1.0 - (time / d * FRAC_PI_2).cos(),
        Ease::OutSine => (time / d * FRAC_PI_2).sin(),
        Ease::InOutSine => -0.5 * ((PI * time / d).cos() - 1.0),
        Ease::InQuad => {
            let t = time / d;
            t * t
        }
        Ease::OutQuad => {
            let t = time / d;
            -t * (t - 2.0)
        }
        Ease::InOutQuad => {
            let t = time / (d * 0.5);
            if t < 1.0 {
                0.5 * t * t
            } else {
                let t = t - 1.0;
                -0.5 * (t * (t - 2.0) - 1.0)
            }
        }
        Ease::InCubic => (time / d).powi(3),
        Ease::OutCubic => (time / d - 1.0).powi(3) + 1.0,
        Ease::InOutCubic => {
            let t = time / (d * 0.5);
            if t < 1.0 {
                0.5 * t.powi(3)
            } else {
                0.5 * ((t - 2.0).powi(3) + 2.0)
            }
        }
        Ease::InQuart => (time / d).powi(4),
        Ease::OutQuart => -((time / d - 1.0).powi(4) - 1.0),
        Ease::InOutQuart => {
            let t = time / (d * 0.5);
            if t < 1.0 {
                0.5 * t.powi(4)
            } else {
                -0.5 * ((t - 2.0).powi(4) - 2.0)
            }
        }
        Ease::InQuint => (time / d).powi(5),
        Ease::OutQuint => (time / d - 1.0).powi(5) + 1.0,
        Ease::InOutQuint => {
            let t = time / (d * 0.5);
            if t < 1.0 {
                0.5 * t.powi(5)
            } else {
                0.5 * ((t - 2.0).powi(5) + 2.0)
            }
        }
        Ease::InExpo => {
            if time == 0.0 {
                0.0
            } else {
                2f32.powf(10.0 * (time / d - 1.0))
            }
        }
        Ease::OutExpo => {
            if time == d {
                1.0
            } else {
                1.0 - 2f32.powf(-10.0 * time / d)
            }
        }
        Ease::InOutExpo => {
            if time == 0.0 {
                return 0.0;
            }
            if time == d {
                return 1.0;
            }
            let t = time / (d * 0.5);
            if t < 1.0 {
                0.5 * 2f32.powf(10.0 * (t - 1.0))
            } else {
                0.5 * (2.0 - 2f32.powf(-10.0 * (t - 1.0)))
            }
        }
        Ease::InCirc => {
            let t = time / d;
            -((1.0 - t * t).max(0.0).sqrt() - 1.0)
        }
        Ease::OutCirc => {
            let t = time / d - 1.0;
            (1.0 - t * t).max(0.0).sqrt()
        }
        Ease::InOutCirc => {
            let t = time / (d * 0.5);
            if t < 1.0 {
                -0.5 * ((1.0 - t * t).max(0.0).sqrt() - 1.0)
            } else {
                let t = t - 2.0;
                0.5 * ((1.0 - t * t).max(0.0).sqrt() + 1.0)
            }
        }
        Ease::InElastic => in_elastic(time, d, s, period),
        Ease::OutElastic => out_elastic(time, d, s, period),
        Ease::InOutElastic => in_out_elastic(time, d, s, period),
        Ease::InBack => {
            let t = time / d;
            t * t * ((s + 1.0) * t - s)
        }
        Ease::OutBack => {
            let t = time / d - 1.0;
            t * t * ((s + 1.0) * t + s) + 1.0
        }
        Ease::InOutBack => {
            let s = s * 1.525;
            let t = time / (d * 0.5);
            if t < 1.0 {
                0.5 * (t * t * ((s + 1.0) * t - s))
            } else {
                let t = t - 2.0;
                0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
            }
        }
        Ease::InBounce => 1.0 - out_bounce(d - time, d),
        Ease::OutBounce => out_bounce(time, d),
        Ease::InOutBounce => {
            if time < d * 0.5 {
                (1.0 - out_bounce(d - time * 2.0, d)) * 0.5
            } else {
                out_bounce(time * 2.0 - d, d) * 0.5 + 0.5
            }
        }
    }
}

/// Amplitude below 1 falls back to 1 with a quarter-period phase shift.
#[inline]
fn elastic_shape(amplitude: f32, period: f32) -> (f32, f32) {
    if amplitude < 1.0 {
        (1.0, period / 4.0)
    } else {
        (amplitude, period / TAU * (1.0 / amplitude).asin())
    }
}

fn in_elastic(time: f32, d: f32, amplitude: f32, period: f32) -> f32 {
    if time == 0.0 {
        return 0.0;
    }
    let t = time / d;
    if t == 1.0 {
        return 1.0;
    }
    let p = if period == 0.0 { d * 0.3 } else { period };
    let (a, s) = elastic_shape(amplitude, p);
    let t = t - 1.0;
    -(a * 2f32.powf(10.0 * t) * ((t * d - s) * TAU / p).sin())
}

fn out_elastic(time: f32, d: f32, amplitude: f32, period: f32) -> f32 {
    if time == 0.0 {
        return 0.0;
    }
    let t = time / d;
    if t == 1.0 {
        return 1.0;
    }
    let p = if period == 0.0 { d * 0.3 } else { period };
    let (a, s) = elastic_shape(amplitude, p);
    a * 2f32.powf(-10.0 * t) * ((t * d - s) * TAU / p).sin() + 1.0
}

fn in_out_elastic(time: f32, d: f32, amplitude: f32, period: f32) -> f32 {
    if time == 0.0 {
        return 0.0;
    }
    let t = time / (d * 0.5);
    if t == 2.0 {
        return 1.0;
    }
    let p = if period == 0.0 { d * (0.3 * 1.5) } else { period };
    let (a, s) = elastic_shape(amplitude, p);
    let t = t - 1.0;
    if t < 0.0 {
        -0.5 * (a * 2f32.powf(10.0 * t) * ((t * d - s) * TAU / p).sin())
    } else {
        a * 2f32.powf(-10.0 * t) * ((t * d - s) * TAU / p).sin() * 0.5 + 1.0
    }
}

fn out_bounce(time: f32, d: f32) -> f32 {
    let t = time / d;
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        7.5625 * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        7.5625 * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        7.5625 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 31] = [
        Ease::Linear,
        Ease::InSine,
        Ease::OutSine,
        Ease::InOutSine,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::InQuart,
        Ease::OutQuart,
        Ease::InOutQuart,
        Ease::InQuint,
        Ease::OutQuint,
        Ease::InOutQuint,
        Ease::InExpo,
        Ease::OutExpo,
        Ease::InOutExpo,
        Ease::InCirc,
        Ease::OutCirc,
        Ease::InOutCirc,
        Ease::InElastic,
        Ease::OutElastic,
        Ease::InOutElastic,
        Ease::InBack,
        Ease::OutBack,
        Ease::InOutBack,
        Ease::InBounce,
        Ease::OutBounce,
        Ease::InOutBounce,
    ];

    #[test]
    fn every_ease_hits_both_endpoints() {
        for ease in ALL {
            let start = evaluate(ease, 0.0, 2.0, DEFAULT_OVERSHOOT, 0.0);
            let end = evaluate(ease, 2.0, 2.0, DEFAULT_OVERSHOOT, 0.0);
            assert!(start.abs() < 1e-3, "{ease:?} start={start}");
            assert!((end - 1.0).abs() < 1e-3, "{ease:?} end={end}");
        }
    }

    #[test]
    fn linear_is_proportional() {
        assert_eq!(evaluate(Ease::Linear, 0.5, 2.0, DEFAULT_OVERSHOOT, 0.0), 0.25);
        assert_eq!(evaluate(Ease::Linear, 1.5, 2.0, DEFAULT_OVERSHOOT, 0.0), 0.75);
    }

    #[test]
    fn in_out_curves_are_symmetric_at_midpoint() {
        for ease in [
            Ease::InOutSine,
            Ease::InOutQuad,
            Ease::InOutCubic,
            Ease::InOutQuart,
            Ease::InOutQuint,
            Ease::InOutExpo,
            Ease::InOutCirc,
        ] {
            let mid = evaluate(ease, 1.0, 2.0, DEFAULT_OVERSHOOT, 0.0);
            assert!((mid - 0.5).abs() < 1e-4, "{ease:?} mid={mid}");
        }
    }

    #[test]
    fn back_overshoots() {
        let early = evaluate(Ease::InBack, 0.2, 1.0, DEFAULT_OVERSHOOT, 0.0);
        assert!(early < 0.0);
        let late = evaluate(Ease::OutBack, 0.8, 1.0, DEFAULT_OVERSHOOT, 0.0);
        assert!(late > 1.0);
        // No overshoot degenerates to a cubic.
        let flat = evaluate(Ease::InBack, 0.5, 1.0, 0.0, 0.0);
        assert!((flat - 0.125).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_time_is_clamped() {
        assert_eq!(evaluate(Ease::Linear, -1.0, 1.0, DEFAULT_OVERSHOOT, 0.0), 0.0);
        assert_eq!(evaluate(Ease::Linear, 3.0, 1.0, DEFAULT_OVERSHOOT, 0.0), 1.0);
        assert_eq!(evaluate(Ease::OutQuad, 0.0, 0.0, DEFAULT_OVERSHOOT, 0.0), 1.0);
    }
}
