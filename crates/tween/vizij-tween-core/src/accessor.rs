//! Property accessors: how a tween reads and writes its target.
//!
//! The engine never owns the animated object. An accessor is a boxed,
//! non-owning get/set pair. The getter runs once when the tween starts; the
//! setter runs at most once per evaluation.
//!
//! ```rust,ignore
//! let sprite = Rc::new(RefCell::new(Sprite { alpha: 0.0, pos: [0.0; 3] }));
//! let alpha = FieldAccessor::new(&sprite, |s| s.alpha, |s, v| s.alpha = v);
//! engine.to(alpha, 1.0_f32, 0.5, TweenParams::default())?;
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Read/write access to one animated property.
pub trait Accessor<T>: 'static {
    /// Current value, or `None` if it can't be read (target gone or borrowed).
    fn get(&self) -> Option<T>;

    /// Write a value. Returns `false` if the target could not be written.
    fn set(&mut self, value: T) -> bool;

    /// Whether the target still exists. Checked before each evaluation when
    /// safe mode is enabled.
    fn is_alive(&self) -> bool {
        true
    }
}

/// Closure-backed accessor. Built with [`accessor`].
pub struct FnAccessor<G, S> {
    getter: G,
    setter: S,
}

/// Wrap a getter/setter pair. The closures decide their own failure modes.
pub fn accessor<T, G, S>(getter: G, setter: S) -> FnAccessor<G, S>
where
    G: Fn() -> Option<T> + 'static,
    S: FnMut(T) -> bool + 'static,
{
    FnAccessor { getter, setter }
}

impl<T, G, S> Accessor<T> for FnAccessor<G, S>
where
    G: Fn() -> Option<T> + 'static,
    S: FnMut(T) -> bool + 'static,
{
    fn get(&self) -> Option<T> {
        (self.getter)()
    }

    fn set(&mut self, value: T) -> bool {
        (self.setter)(value)
    }
}

/// Accessor over a whole shared cell.
pub struct WeakAccessor<T> {
    cell: Weak<RefCell<T>>,
}

impl<T> WeakAccessor<T> {
    pub fn new(cell: &Rc<RefCell<T>>) -> Self {
        Self {
            cell: Rc::downgrade(cell),
        }
    }
}

impl<T: Clone + 'static> Accessor<T> for WeakAccessor<T> {
    fn get(&self) -> Option<T> {
        let cell = self.cell.upgrade()?;
        let value = cell.try_borrow().ok()?.clone();
        Some(value)
    }

    fn set(&mut self, value: T) -> bool {
        let Some(cell) = self.cell.upgrade() else {
            return false;
        };
        let Ok(mut slot) = cell.try_borrow_mut() else {
            return false;
        };
        *slot = value;
        true
    }

    fn is_alive(&self) -> bool {
        self.cell.strong_count() > 0
    }
}

/// Accessor over one field of a shared struct.
pub struct FieldAccessor<S, T> {
    owner: Weak<RefCell<S>>,
    read: fn(&S) -> T,
    write: fn(&mut S, T),
}

impl<S, T> FieldAccessor<S, T> {
    pub fn new(owner: &Rc<RefCell<S>>, read: fn(&S) -> T, write: fn(&mut S, T)) -> Self {
        Self {
            owner: Rc::downgrade(owner),
            read,
            write,
        }
    }
}

impl<S: 'static, T: 'static> Accessor<T> for FieldAccessor<S, T> {
    fn get(&self) -> Option<T> {
        let owner = self.owner.upgrade()?;
        let guard = owner.try_borrow().ok()?;
        Some((self.read)(&guard))
    }

    fn set(&mut self, value: T) -> bool {
        let Some(owner) = self.owner.upgrade() else {
            return false;
        };
        let Ok(mut guard) = owner.try_borrow_mut() else {
            return false;
        };
        (self.write)(&mut guard, value);
        true
    }

    fn is_alive(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

/// Accessor over one slot of a shared `Vec`. A slot that disappears (the vec
/// shrank) counts as a dead target.
pub struct IndexAccessor<T> {
    items: Weak<RefCell<Vec<T>>>,
    index: usize,
}

impl<T> IndexAccessor<T> {
    pub fn new(items: &Rc<RefCell<Vec<T>>>, index: usize) -> Self {
        Self {
            items: Rc::downgrade(items),
            index,
        }
    }
}

impl<T: Clone + 'static> Accessor<T> for IndexAccessor<T> {
    fn get(&self) -> Option<T> {
        let items = self.items.upgrade()?;
        let guard = items.try_borrow().ok()?;
        guard.get(self.index).cloned()
    }

    fn set(&mut self, value: T) -> bool {
        let Some(items) = self.items.upgrade() else {
            return false;
        };
        let Ok(mut guard) = items.try_borrow_mut() else {
            return false;
        };
        match guard.get_mut(self.index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn is_alive(&self) -> bool {
        self.items
            .upgrade()
            .and_then(|items| items.try_borrow().ok().map(|g| self.index < g.len()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sprite {
        alpha: f32,
    }

    #[test]
    fn closure_accessor_round_trip() {
        let cell = Rc::new(RefCell::new(1.0_f32));
        let (r, w) = (cell.clone(), cell.clone());
        let mut acc = accessor(
            move || Some(*r.borrow()),
            move |v| {
                *w.borrow_mut() = v;
                true
            },
        );
        assert_eq!(acc.get(), Some(1.0));
        assert!(acc.set(4.0));
        assert_eq!(*cell.borrow(), 4.0);
        assert!(acc.is_alive());
    }

    #[test]
    fn field_accessor_reports_dead_owner() {
        let sprite = Rc::new(RefCell::new(Sprite::default()));
        let mut acc = FieldAccessor::new(&sprite, |s| s.alpha, |s, v| s.alpha = v);
        assert!(acc.set(0.5));
        assert_eq!(sprite.borrow().alpha, 0.5);
        drop(sprite);
        assert!(!acc.is_alive());
        assert_eq!(acc.get(), None);
        assert!(!acc.set(1.0));
    }

    #[test]
    fn borrowed_cell_fails_without_panicking() {
        let cell = Rc::new(RefCell::new(2_i32));
        let mut acc = WeakAccessor::new(&cell);
        let _guard = cell.borrow_mut();
        assert_eq!(acc.get(), None);
        assert!(!acc.set(3));
    }

    #[test]
    fn index_accessor_out_of_range_is_dead() {
        let items = Rc::new(RefCell::new(vec![1.0_f32, 2.0]));
        let mut acc = IndexAccessor::new(&items, 1);
        assert_eq!(acc.get(), Some(2.0));
        assert!(acc.set(5.0));
        items.borrow_mut().truncate(1);
        assert!(!acc.is_alive());
        assert!(!acc.set(1.0));
    }
}
