//! Scenario tests for the collision manager

mod broad_phase_scenarios;

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::collections::{object_pool_with_capacity, ObjectHandle, ObjectPool};
use crate::foundation::math::Vec3;
use crate::physics::{Collidable, Collider, CollisionCategory, CollisionContact, CollisionLayers};

/// One callback as seen by a [`Probe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Enter(ObjectHandle),
    Stay(ObjectHandle),
    Exit(ObjectHandle),
}

/// Test double that records every callback it receives
pub struct Probe {
    pub position: Vec3,
    pub radius: f32,
    pub enabled: bool,
    pub category: CollisionCategory,
    pub mask: CollisionLayers,
    pub log: Vec<Callback>,
    pub last_category_seen: Option<CollisionCategory>,
    /// Shared journal of `(receiver, callback)` across several probes
    pub journal: Option<Journal>,
    /// Set to know which handle this probe lives at when writing the journal
    pub handle: Option<ObjectHandle>,
}

pub type Journal = Rc<RefCell<Vec<(ObjectHandle, Callback)>>>;

impl Probe {
    pub fn at(x: f32, y: f32, z: f32, radius: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            radius,
            enabled: true,
            category: CollisionCategory::Enemy,
            mask: CollisionLayers::all(),
            log: Vec::new(),
            last_category_seen: None,
            journal: None,
            handle: None,
        }
    }

    pub fn with_category(mut self, category: CollisionCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_mask(mut self, mask: CollisionLayers) -> Self {
        self.mask = mask;
        self
    }

    fn record(&mut self, callback: Callback) {
        self.log.push(callback);
        if let (Some(journal), Some(handle)) = (&self.journal, self.handle) {
            journal.borrow_mut().push((handle, callback));
        }
    }

    pub fn enters(&self) -> usize {
        self.log.iter().filter(|c| matches!(c, Callback::Enter(_))).count()
    }

    pub fn stays(&self) -> usize {
        self.log.iter().filter(|c| matches!(c, Callback::Stay(_))).count()
    }

    pub fn exits(&self) -> usize {
        self.log.iter().filter(|c| matches!(c, Callback::Exit(_))).count()
    }
}

impl Collidable for Probe {
    fn collider(&self) -> Option<Collider> {
        self.enabled.then(|| Collider::new(self.position, self.radius))
    }

    fn category(&self) -> CollisionCategory {
        self.category
    }

    fn collision_mask(&self) -> CollisionLayers {
        self.mask
    }

    fn on_collision_enter(&mut self, other: &CollisionContact) {
        self.last_category_seen = Some(other.category);
        self.record(Callback::Enter(other.handle));
    }

    fn on_collision_stay(&mut self, other: &CollisionContact) {
        self.record(Callback::Stay(other.handle));
    }

    fn on_collision_exit(&mut self, other: &CollisionContact) {
        self.record(Callback::Exit(other.handle));
    }
}

pub fn pool() -> ObjectPool<Probe> {
    object_pool_with_capacity(16)
}

/// Insert a probe and register it
pub fn spawn(
    pool: &mut ObjectPool<Probe>,
    manager: &mut crate::physics::CollisionManager,
    probe: Probe,
) -> ObjectHandle {
    let handle = pool.insert(probe);
    pool[handle].handle = Some(handle);
    manager.register_object(handle);
    handle
}
