//! Arena actors and their collision reactions

use collision_engine::prelude::*;

/// Lifecycle callback counters for one actor
#[derive(Debug, Clone, Copy, Default)]
pub struct CallbackCounts {
    pub enters: u32,
    pub stays: u32,
    pub exits: u32,
}

impl std::ops::AddAssign for CallbackCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.enters += rhs.enters;
        self.stays += rhs.stays;
        self.exits += rhs.exits;
    }
}

/// Anything that moves around the arena
pub struct Actor {
    pub kind: CollisionCategory,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub health: i32,
    /// Seconds left for projectiles; ignored by everything else
    pub ttl: f32,
    pub weapon_level: u32,
    pub destroyed: bool,
    pub counts: CallbackCounts,
}

impl Actor {
    fn new(kind: CollisionCategory, position: Vec3, velocity: Vec3, radius: f32, health: i32) -> Self {
        Self {
            kind,
            position,
            velocity,
            radius,
            health,
            ttl: f32::INFINITY,
            weapon_level: 0,
            destroyed: false,
            counts: CallbackCounts::default(),
        }
    }

    pub fn player(position: Vec3) -> Self {
        Self::new(CollisionCategory::Player, position, Vec3::zeros(), 2.0, 100)
    }

    pub fn enemy(position: Vec3, velocity: Vec3) -> Self {
        Self::new(CollisionCategory::Enemy, position, velocity, 1.5, 3)
    }

    pub fn weapon_pickup(position: Vec3) -> Self {
        Self::new(CollisionCategory::Weapon, position, Vec3::zeros(), 1.0, 1)
    }

    pub fn bullet(position: Vec3, velocity: Vec3) -> Self {
        Self { ttl: 2.0, ..Self::new(CollisionCategory::Bullet, position, velocity, 0.25, 1) }
    }

    pub fn missile(position: Vec3, velocity: Vec3) -> Self {
        Self { ttl: 4.0, ..Self::new(CollisionCategory::Missile, position, velocity, 0.5, 1) }
    }

    /// Integrate motion, age projectiles and keep everything inside the arena
    pub fn advance(&mut self, dt: f32, half_extent: f32) {
        self.position += self.velocity * dt;

        if self.kind.is_projectile() {
            self.ttl -= dt;
            if self.ttl <= 0.0 {
                self.destroyed = true;
            }
            return;
        }

        // Non-projectiles bounce off the arena walls
        for axis in 0..3 {
            if self.position[axis].abs() > half_extent {
                self.position[axis] = self.position[axis].clamp(-half_extent, half_extent);
                self.velocity[axis] = -self.velocity[axis];
            }
        }
    }

    fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
        if self.health <= 0 {
            self.destroyed = true;
        }
    }
}

impl Collidable for Actor {
    fn collider(&self) -> Option<Collider> {
        // Destroyed actors stop colliding before they are swept from the pool
        (!self.destroyed).then(|| Collider::new(self.position, self.radius))
    }

    fn category(&self) -> CollisionCategory {
        self.kind
    }

    fn collision_mask(&self) -> CollisionLayers {
        match self.kind {
            CollisionCategory::Player => {
                CollisionLayers::ENEMY | CollisionLayers::MISSILE | CollisionLayers::WEAPON
            }
            CollisionCategory::Enemy => CollisionLayers::PLAYER | CollisionLayers::BULLET,
            CollisionCategory::Bullet => CollisionLayers::ENEMY,
            CollisionCategory::Missile | CollisionCategory::Weapon => CollisionLayers::PLAYER,
            CollisionCategory::Environment => CollisionLayers::all(),
        }
    }

    fn on_collision_enter(&mut self, other: &CollisionContact) {
        self.counts.enters += 1;

        match (self.kind, other.category) {
            (CollisionCategory::Player, CollisionCategory::Enemy) => self.take_damage(10),
            (CollisionCategory::Player, CollisionCategory::Missile) => self.take_damage(25),
            (CollisionCategory::Player, CollisionCategory::Weapon) => {
                self.weapon_level += 1;
                log::info!("Player picked up a weapon, level {}", self.weapon_level);
            }
            (CollisionCategory::Enemy, CollisionCategory::Bullet) => self.take_damage(1),
            (CollisionCategory::Bullet | CollisionCategory::Missile | CollisionCategory::Weapon, _) => {
                self.destroyed = true;
            }
            _ => {}
        }
    }

    fn on_collision_stay(&mut self, other: &CollisionContact) {
        self.counts.stays += 1;

        // Rammed enemies push the player back out
        if self.kind == CollisionCategory::Player && other.category == CollisionCategory::Enemy {
            let away = self.position - other.collider.position;
            if let Some(dir) = away.try_normalize(f32::EPSILON) {
                self.position += dir * 0.5;
            }
        }
    }

    fn on_collision_exit(&mut self, _other: &CollisionContact) {
        self.counts.exits += 1;
    }
}
