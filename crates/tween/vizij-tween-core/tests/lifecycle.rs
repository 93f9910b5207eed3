mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{approx, cell, events_for, linear, val};
use vizij_tween_core::{
    accessor, Color, ColorOptions, ColorPlugin, Config, Engine, FieldAccessor, Filter,
    IndexAccessor, KillReason, ObjectId, PoolKind, SpiralMode, SpiralOptions, SpiralPlugin,
    TweenError, TweenEvent, TweenParams, UpdateType, WeakAccessor,
};

#[derive(Default)]
struct Sprite {
    alpha: f32,
    frame: i32,
    position: [f32; 3],
    tint: Color,
}

// ---------- pools ----------

/// it should keep sequences within tweeners when resizing
#[test]
fn set_capacities_clamps_and_requires_idle_engine() {
    let mut eng = Engine::new(Config::default());
    eng.set_capacities(10, 5).unwrap();
    let stats = eng.pool_stats();
    assert_eq!((stats.tweeners.capacity, stats.sequences.capacity), (10, 5));

    eng.set_capacities(3, 5).unwrap();
    let stats = eng.pool_stats();
    assert_eq!((stats.tweeners.capacity, stats.sequences.capacity), (5, 5));
    assert_eq!(eng.config().tweeners_capacity, 5);

    let x = cell(0.0);
    eng.to(WeakAccessor::new(&x), 1.0, 1.0, linear()).unwrap();
    assert_eq!(
        eng.set_capacities(1, 1),
        Err(TweenError::TweensActive { spawned: 1 })
    );
}

/// it should grow by the missing slot and reuse released units afterwards
#[test]
fn pool_grows_then_recycles() {
    let mut eng = Engine::new(Config::default());
    eng.set_capacities(2, 1).unwrap();
    let x = cell(0.0);
    for _ in 0..3 {
        eng.to(WeakAccessor::new(&x), 1.0, 1.0, linear()).unwrap();
    }
    let stats = eng.pool_stats().tweeners;
    assert_eq!((stats.capacity, stats.spawned, stats.growths), (3, 3, 1));

    eng.kill(Filter::All);
    assert_eq!(eng.pool_stats().tweeners.idle, 3);
    for _ in 0..3 {
        eng.to(WeakAccessor::new(&x), 1.0, 1.0, linear()).unwrap();
    }
    let stats = eng.pool_stats().tweeners;
    assert_eq!((stats.capacity, stats.growths, stats.idle), (3, 1, 0));
}

/// it should raise the tweener pool when the sequence pool grows past it
#[test]
fn sequence_growth_keeps_tweeners_ahead() {
    let mut eng = Engine::new(Config::default());
    eng.set_capacities(1, 1).unwrap();
    for _ in 0..3 {
        eng.sequence(TweenParams::new().auto_play(false)).unwrap();
        let stats = eng.pool_stats();
        assert!(stats.tweeners.capacity >= stats.sequences.capacity);
    }
    let stats = eng.pool_stats();
    assert_eq!((stats.tweeners.capacity, stats.sequences.capacity), (3, 3));
    assert_eq!(stats.tweeners.spawned, 0);

    // Growth is forgotten on purge; the configured pair still holds.
    eng.purge_all();
    let stats = eng.pool_stats();
    assert_eq!((stats.tweeners.capacity, stats.sequences.capacity), (1, 1));
}

/// it should refuse creation past the hard ceiling
#[test]
fn capacity_ceiling() {
    let cfg = Config {
        tweeners_capacity: 1,
        sequences_capacity: 1,
        max_capacity: 2,
        ..Config::default()
    };
    let mut eng = Engine::new(cfg);
    let x = cell(0.0);
    eng.to(WeakAccessor::new(&x), 1.0, 1.0, linear()).unwrap();
    eng.to(WeakAccessor::new(&x), 1.0, 1.0, linear()).unwrap();
    assert_eq!(
        eng.to(WeakAccessor::new(&x), 1.0, 1.0, linear()),
        Err(TweenError::CapacityExceeded {
            kind: PoolKind::Tweener,
            max: 2
        })
    );
    assert_eq!(eng.spawned_count(), 2);
}

/// it should forget growth and cached plugins on clear
#[test]
fn clear_resets_pools_and_plugins() {
    let mut eng = Engine::new(Config::default());
    eng.set_capacities(1, 1).unwrap();
    let (f, i) = (cell(0.0), Rc::new(RefCell::new(0_i32)));
    eng.to(WeakAccessor::new(&f), 1.0, 1.0, linear()).unwrap();
    eng.to(WeakAccessor::new(&i), 5, 1.0, linear()).unwrap();
    assert_eq!(eng.cached_plugins(), 2);
    assert_eq!(eng.pool_stats().tweeners.growths, 1);

    eng.clear();
    assert_eq!(eng.cached_plugins(), 0);
    assert_eq!(eng.spawned_count(), 0);
    assert!(!eng.has_active());
    let stats = eng.pool_stats().tweeners;
    assert_eq!((stats.capacity, stats.growths, stats.idle), (1, 0, 0));
    // Dropped silently.
    assert!(eng.tick(0.1, 0.1).is_empty());
}

/// it should invalidate a handle once its slot is reused
#[test]
fn stale_handle_after_reuse() {
    let mut eng = Engine::new(Config::default());
    let x = cell(0.0);
    let a = eng.to(WeakAccessor::new(&x), 1.0, 1.0, linear()).unwrap();
    assert_eq!(eng.kill(Filter::Handle(a)), 1);
    let b = eng.to(WeakAccessor::new(&x), 1.0, 1.0, linear()).unwrap();
    assert_ne!(a, b);
    assert!(eng.get(a).is_none());
    assert_eq!(eng.kill(Filter::Handle(a)), 0);
    assert!(eng.is_alive(b));
}

// ---------- target failures ----------

/// it should kill a tween whose target is gone in safe mode
#[test]
fn safe_mode_detects_dead_target() {
    let cfg = Config {
        safe_mode: true,
        ..Config::default()
    };
    let mut eng = Engine::new(cfg);
    let x = cell(0.0);
    let id = eng.to(WeakAccessor::new(&x), 1.0, 1.0, linear()).unwrap();
    eng.tick(0.5, 0.5);
    drop(x);
    let out = eng.tick(0.1, 0.1);
    assert_eq!(
        events_for(out, id).last(),
        Some(&TweenEvent::Killed {
            id,
            reason: KillReason::TargetLost
        })
    );
    assert!(!eng.is_alive(id));
}

/// it should treat a dropped target tag as a dead target in safe mode
#[test]
fn safe_mode_checks_target_tag() {
    let cfg = Config {
        safe_mode: true,
        ..Config::default()
    };
    let mut eng = Engine::new(cfg);
    let x = cell(0.0);
    let owner = Rc::new(());
    let id = eng
        .to(
            WeakAccessor::new(&x),
            1.0,
            1.0,
            linear().target(ObjectId::of(&owner)),
        )
        .unwrap();
    drop(owner);
    eng.tick(0.5, 0.5);
    assert!(!eng.is_alive(id));
    assert_eq!(val(&x), 0.0);
}

/// it should kill a tween whose setter fails even without safe mode
#[test]
fn failing_setter_kills_tween() {
    let mut eng = Engine::new(Config::default());
    let id = eng
        .to(accessor(|| Some(0.0_f32), |_: f32| false), 1.0, 1.0, linear())
        .unwrap();
    let out = eng.tick(0.5, 0.5);
    assert!(out.events.contains(&TweenEvent::Killed {
        id,
        reason: KillReason::TargetLost
    }));
    assert!(!eng.is_alive(id));
}

/// it should kill a tween whose getter fails at startup
#[test]
fn failing_getter_fails_startup() {
    let mut eng = Engine::new(Config::default());
    let id = eng
        .to(accessor(|| None::<f32>, |_: f32| true), 1.0, 1.0, linear())
        .unwrap();
    let out = eng.tick(0.5, 0.5);
    assert_eq!(
        events_for(out, id),
        vec![TweenEvent::Killed {
            id,
            reason: KillReason::StartupFailed
        }]
    );
}

/// it should keep advancing healthy tweens when another one fails mid-tick
#[test]
fn failing_tween_does_not_stop_the_tick() {
    let mut eng = Engine::new(Config::default());
    let (before, after) = (cell(0.0), cell(0.0));
    let healthy_a = eng
        .to(WeakAccessor::new(&before), 1.0, 1.0, linear())
        .unwrap();
    let broken = eng
        .to(accessor(|| Some(0.0_f32), |_: f32| false), 1.0, 1.0, linear())
        .unwrap();
    let healthy_b = eng
        .to(WeakAccessor::new(&after), 1.0, 1.0, linear())
        .unwrap();

    let out = eng.tick(0.5, 0.5);
    assert!(out.events.contains(&TweenEvent::Killed {
        id: broken,
        reason: KillReason::TargetLost
    }));
    assert!(approx(val(&before), 0.5, 1e-5));
    assert!(approx(val(&after), 0.5, 1e-5));
    assert!(!eng.is_alive(broken));
    assert_eq!(eng.active_count(), 2);

    eng.tick(0.25, 0.25);
    assert!(approx(val(&before), 0.75, 1e-5));
    assert!(approx(val(&after), 0.75, 1e-5));
    assert!(eng.is_alive(healthy_a) && eng.is_alive(healthy_b));
}

/// it should let the rest of the tick run after a dead target in safe mode
#[test]
fn dead_target_does_not_stop_the_tick() {
    let cfg = Config {
        safe_mode: true,
        ..Config::default()
    };
    let mut eng = Engine::new(cfg);
    let (gone, kept) = (cell(0.0), cell(0.0));
    let lost = eng.to(WeakAccessor::new(&gone), 1.0, 1.0, linear()).unwrap();
    eng.to(WeakAccessor::new(&kept), 1.0, 1.0, linear()).unwrap();
    drop(gone);

    eng.tick(0.5, 0.5);
    assert!(!eng.is_alive(lost));
    assert!(approx(val(&kept), 0.5, 1e-5));
}

// ---------- timing ----------

/// it should scale both frame deltas by the global time scale
#[test]
fn frame_applies_global_time_scale() {
    let mut eng = Engine::new(Config::default());
    eng.config_mut().time_scale = 0.5;
    let (a, b) = (cell(0.0), cell(0.0));
    eng.to(WeakAccessor::new(&a), 1.0, 1.0, linear()).unwrap();
    eng.to(
        WeakAccessor::new(&b),
        1.0,
        1.0,
        linear().update_type(UpdateType::TimeScaleIndependent),
    )
    .unwrap();
    eng.frame(0.5, 0.5);
    assert!(approx(val(&a), 0.25, 1e-5));
    assert!(approx(val(&b), 0.25, 1e-5));

    // tick bypasses the global scale.
    eng.tick(0.25, 0.5);
    assert!(approx(val(&a), 0.5, 1e-5));
    assert!(approx(val(&b), 0.75, 1e-5));
}

/// it should run faster with a per-tween time scale
#[test]
fn per_tween_time_scale() {
    let mut eng = Engine::new(Config::default());
    let x = cell(0.0);
    eng.to(WeakAccessor::new(&x), 1.0, 1.0, linear().time_scale(2.0))
        .unwrap();
    eng.tick(0.25, 0.25);
    assert!(approx(val(&x), 0.5, 1e-5));
}

/// it should derive the duration from the distance for speed-based tweens
#[test]
fn speed_based_duration() {
    let mut eng = Engine::new(Config::default());
    let x = cell(0.0);
    let id = eng
        .to(WeakAccessor::new(&x), 10.0, 5.0, linear().speed_based(true))
        .unwrap();
    eng.tick(1.0, 1.0);
    assert!(approx(eng.get(id).unwrap().duration(), 2.0, 1e-6));
    assert!(approx(val(&x), 5.0, 1e-5));
    // A long tick ends it in one go.
    eng.tick(3.0, 3.0);
    assert!(approx(val(&x), 10.0, 1e-5));
    assert!(!eng.is_alive(id));
}

/// it should add a relative end value to the start value
#[test]
fn relative_tween() {
    let mut eng = Engine::new(Config::default());
    let x = cell(3.0);
    eng.to(WeakAccessor::new(&x), 2.0, 1.0, linear().relative(true))
        .unwrap();
    eng.tick(0.5, 0.5);
    assert!(approx(val(&x), 4.0, 1e-5));
    eng.tick(0.5, 0.5);
    assert!(approx(val(&x), 5.0, 1e-5));
}

// ---------- config ----------

/// it should build an engine from a JSON config
#[test]
fn engine_from_json_config() {
    let cfg = Config::from_json_str(
        r#"{ "tweeners_capacity": 4, "sequences_capacity": 2, "default_ease": "Linear", "default_auto_kill": false }"#,
    )
    .unwrap();
    let mut eng = Engine::new(cfg);
    assert_eq!(eng.pool_stats().tweeners.capacity, 4);
    let x = cell(0.0);
    let id = eng
        .to(WeakAccessor::new(&x), 1.0, 1.0, TweenParams::default())
        .unwrap();
    eng.tick(1.0, 1.0);
    assert!(eng.get(id).unwrap().is_complete());
    assert!(eng.is_alive(id));
}

// ---------- value types ----------

/// it should tween fields of a shared struct with every built-in value type
#[test]
fn value_types_through_field_accessors() {
    let mut eng = Engine::new(Config::default());
    let sprite = Rc::new(RefCell::new(Sprite::default()));
    eng.to(
        FieldAccessor::new(&sprite, |s: &Sprite| s.alpha, |s, v| s.alpha = v),
        1.0_f32,
        1.0,
        linear(),
    )
    .unwrap();
    eng.to(
        FieldAccessor::new(&sprite, |s: &Sprite| s.frame, |s, v| s.frame = v),
        9,
        1.0,
        linear(),
    )
    .unwrap();
    eng.to(
        FieldAccessor::new(&sprite, |s: &Sprite| s.position, |s, v| s.position = v),
        [2.0, 4.0, -6.0],
        1.0,
        linear(),
    )
    .unwrap();
    eng.to_with::<ColorPlugin>(
        FieldAccessor::new(&sprite, |s: &Sprite| s.tint, |s, v| s.tint = v),
        Color::new(1.0, 1.0, 1.0, 1.0),
        ColorOptions { alpha_only: true },
        1.0,
        linear(),
    )
    .unwrap();

    eng.tick(0.5, 0.5);
    let s = sprite.borrow();
    assert!(approx(s.alpha, 0.5, 1e-5));
    assert_eq!(s.frame, 5);
    assert_eq!(s.position, [1.0, 2.0, -3.0]);
    assert_eq!(s.tint, Color::new(0.0, 0.0, 0.0, 0.5));
}

/// it should spiral around an axis and drift along it
#[test]
fn spiral_through_index_accessor() {
    let mut eng = Engine::new(Config::default());
    let points = Rc::new(RefCell::new(vec![[0.0_f32; 3], [1.0, 1.0, 1.0]]));
    let id = eng
        .to_with::<SpiralPlugin>(
            IndexAccessor::new(&points, 1),
            [0.0, 0.0, 1.0],
            SpiralOptions::new(4.0, 10.0, 1.0, SpiralMode::Expand),
            1.0,
            linear().auto_kill(false),
        )
        .unwrap();
    eng.tick(1.0, 1.0);
    let p = points.borrow()[1];
    assert!(approx(p[2], 5.0, 1e-4));
    let radius = ((p[0] - 1.0).powi(2) + (p[1] - 1.0).powi(2)).sqrt();
    assert!(approx(radius, 1.0, 1e-4));
    assert_eq!(points.borrow()[0], [0.0; 3]);
    assert!(eng.get(id).unwrap().is_complete());
}
