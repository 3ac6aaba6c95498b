//! Unordered object pairs used as keys for cross-frame collision state

use crate::foundation::collections::ObjectHandle;

/// Collision pair representing two objects that are (or may be) colliding
///
/// Always stores the smaller handle first, so `new(a, b) == new(b, a)` and the
/// derived `Hash`/`Ord` are symmetric in the arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    first: ObjectHandle,
    second: ObjectHandle,
}

impl CollisionPair {
    /// Create a new collision pair in canonical order
    pub fn new(a: ObjectHandle, b: ObjectHandle) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// The lower handle; notified first
    pub fn first(&self) -> ObjectHandle {
        self.first
    }

    /// The higher handle
    pub fn second(&self) -> ObjectHandle {
        self.second
    }

    /// Whether the pair references `handle`
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.first == handle || self.second == handle
    }

    /// The participant that is not `handle`, if `handle` is in the pair
    pub fn other(&self, handle: ObjectHandle) -> Option<ObjectHandle> {
        if self.first == handle {
            Some(self.second)
        } else if self.second == handle {
            Some(self.first)
        } else {
            None
        }
    }
}
