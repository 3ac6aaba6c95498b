//! Specialized collection types

pub use slotmap::{SlotMap, Key};
pub use rustc_hash::{FxHashMap, FxHashSet};

slotmap::new_key_type! {
    /// Stable, generation-checked reference to a collidable object
    ///
    /// A handle whose object has been removed from its pool never resolves
    /// again, even if the slot is reused by a newer object.
    pub struct ObjectHandle;
}

/// Caller-owned storage for collidable objects
///
/// The collision manager never owns objects; it only keeps handles into a pool
/// like this one and borrows the pool for the duration of a frame update.
pub type ObjectPool<T> = SlotMap<ObjectHandle, T>;

/// Create an empty object pool with room for `capacity` objects
pub fn object_pool_with_capacity<T>(capacity: usize) -> ObjectPool<T> {
    SlotMap::with_capacity_and_key(capacity)
}
