//! Collision categories and layer filtering
//!
//! Every collidable reports a [`CollisionCategory`]. Gameplay reacts to the
//! category of the other participant by matching on it, and the manager uses
//! the matching [`CollisionLayers`] bit to filter pairs before testing them.

use bitflags::bitflags;

bitflags! {
    /// Layer bitmask, one bit per collision category
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Enemy character layer
        const ENEMY = 1 << 1;
        /// Bullets fired by weapons
        const BULLET = 1 << 2;
        /// Homing and ballistic missiles
        const MISSILE = 1 << 3;
        /// Weapon pickups and weapon hitboxes
        const WEAPON = 1 << 4;
        /// Static or scripted environment volumes
        const ENVIRONMENT = 1 << 5;

        /// Any projectile
        const PROJECTILE = Self::BULLET.bits() | Self::MISSILE.bits();
    }
}

impl CollisionLayers {
    /// Check if two objects should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask AND B's layer must be in A's mask.
    ///
    /// # Example
    /// ```
    /// use collision_engine::physics::CollisionLayers;
    ///
    /// let player_mask = CollisionLayers::ENEMY | CollisionLayers::PROJECTILE;
    /// let enemy_mask = CollisionLayers::PLAYER | CollisionLayers::BULLET;
    ///
    /// assert!(CollisionLayers::should_collide(
    ///     CollisionLayers::PLAYER, player_mask,
    ///     CollisionLayers::ENEMY, enemy_mask,
    /// ));
    /// ```
    pub fn should_collide(
        layer_a: CollisionLayers,
        mask_a: CollisionLayers,
        layer_b: CollisionLayers,
        mask_b: CollisionLayers,
    ) -> bool {
        mask_b.intersects(layer_a) && mask_a.intersects(layer_b)
    }
}

/// What kind of game object a collider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollisionCategory {
    /// The player ship
    Player,
    /// Enemy units
    Enemy,
    /// Bullets
    Bullet,
    /// Missiles
    Missile,
    /// Weapons and weapon pickups
    Weapon,
    /// Environment volumes
    Environment,
}

impl CollisionCategory {
    /// All categories, in declaration order
    pub const ALL: [CollisionCategory; 6] = [
        CollisionCategory::Player,
        CollisionCategory::Enemy,
        CollisionCategory::Bullet,
        CollisionCategory::Missile,
        CollisionCategory::Weapon,
        CollisionCategory::Environment,
    ];

    /// The layer bit this category occupies
    pub fn layer(self) -> CollisionLayers {
        match self {
            CollisionCategory::Player => CollisionLayers::PLAYER,
            CollisionCategory::Enemy => CollisionLayers::ENEMY,
            CollisionCategory::Bullet => CollisionLayers::BULLET,
            CollisionCategory::Missile => CollisionLayers::MISSILE,
            CollisionCategory::Weapon => CollisionLayers::WEAPON,
            CollisionCategory::Environment => CollisionLayers::ENVIRONMENT,
        }
    }

    /// Whether this category is a projectile
    pub fn is_projectile(self) -> bool {
        CollisionLayers::PROJECTILE.contains(self.layer())
    }
}
