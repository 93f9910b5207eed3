#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use vizij_tween_core::{Ease, Outputs, TweenEvent, TweenId, TweenParams};

pub fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

pub fn cell(v: f32) -> Rc<RefCell<f32>> {
    Rc::new(RefCell::new(v))
}

pub fn val(c: &Rc<RefCell<f32>>) -> f32 {
    *c.borrow()
}

/// Params with a linear ease so expected values are easy to compute.
pub fn linear() -> TweenParams {
    TweenParams::new().ease(Ease::Linear)
}

pub fn events_for(out: &Outputs, id: TweenId) -> Vec<TweenEvent> {
    out.for_tween(id).cloned().collect()
}
