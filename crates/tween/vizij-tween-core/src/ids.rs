//! Handles and identities for tweens.
//!
//! `TweenId` is the generation-checked handle returned by the engine. The
//! identity fields (`id`, `string_id`, `target`) are caller-chosen labels used
//! only by filtered operations; several tweens may share them.

use std::any::Any;
use std::rc::{Rc, Weak};

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a spawned tween or sequence.
    pub struct TweenId;
}

/// Non-owning identity of a host object, compared by allocation.
///
/// Holds a `Weak`, so tagging a tween never extends the object's lifetime and
/// the address can't be reused while the tag exists.
#[derive(Clone)]
pub struct ObjectId(Weak<dyn Any>);

impl ObjectId {
    pub fn of<T: Any>(target: &Rc<T>) -> Self {
        let weak: Weak<dyn Any> = Rc::downgrade(target) as Weak<dyn Any>;
        Self(weak)
    }

    /// Whether the tagged object is still alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl PartialEq for ObjectId {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ObjectId {}

impl std::fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({:p})", self.0.as_ptr() as *const ())
    }
}

/// The filterable labels of one tween.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Identity {
    pub id: Option<i32>,
    pub string_id: Option<String>,
    pub target: Option<ObjectId>,
}

impl Identity {
    pub fn clear(&mut self) {
        self.id = None;
        self.string_id = None;
        self.target = None;
    }
}
