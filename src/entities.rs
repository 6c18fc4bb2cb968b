/// All game entity types, with the per-tick behaviour each one owns.
///
/// Entities carry their own sizes (copied from `GameConfig` when they are
/// created) so hit tests never need the config.

use std::time::Duration;

use crate::geometry::{Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Which side fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub position: Vec2,
    /// Unit vector, fixed at creation.
    pub direction: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub faction: Faction,
    /// Ticks advanced so far.
    pub age: u32,
}

impl Projectile {
    /// Returns `None` when `heading` has no usable direction (target sits
    /// exactly on the origin).
    pub fn new(
        position: Vec2,
        heading: Vec2,
        speed: f32,
        radius: f32,
        faction: Faction,
    ) -> Option<Self> {
        let direction = heading.try_normalize(f32::EPSILON)?;
        Some(Self {
            position,
            direction,
            speed,
            radius,
            faction,
            age: 0,
        })
    }

    pub fn advance(&mut self) {
        self.position += self.direction * self.speed;
        self.age = self.age.saturating_add(1);
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::centered(self.position, self.radius)
    }

    /// Too old, or fully outside the arena.
    pub fn is_expired(&self, arena: &Rect, lifetime_ticks: u32) -> bool {
        self.age >= lifetime_ticks || !self.bounding_box().overlaps(arena)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    /// Center of the player's circle.
    pub position: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub radius: f32,
}

impl Player {
    pub fn new(position: Vec2, max_health: u32, radius: f32) -> Self {
        Self {
            position,
            health: max_health,
            max_health,
            radius,
        }
    }

    /// Unnormalized: two held keys move √2 times as far as one.
    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Subtract `amount`, clamping at zero. Returns `true` once health is zero.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.is_dead()
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::centered(self.position, self.radius)
    }

    /// Fraction of health left, in `[0, 1]`.
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    /// Top-left corner of the enemy's box.
    pub position: Vec2,
    pub size: Vec2,
    pub health: u32,
    /// Ticks since the last shot.
    pub shoot_timer: u32,
}

impl Enemy {
    pub fn new(position: Vec2, size: Vec2, health: u32) -> Self {
        Self {
            position,
            size,
            health,
            shoot_timer: 0,
        }
    }

    /// Step `speed` units toward `target`, unless already within `epsilon`.
    pub fn move_toward(&mut self, target: Vec2, speed: f32, epsilon: f32) {
        let offset = target - self.position;
        let distance = offset.norm();
        if distance > epsilon {
            self.position += offset / distance * speed;
        }
    }

    pub fn receive_hit(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    /// Count one tick toward the next shot; `true` (and timer reset) when due.
    pub fn ready_to_fire(&mut self, interval: u32) -> bool {
        self.shoot_timer += 1;
        if self.shoot_timer >= interval {
            self.shoot_timer = 0;
            true
        } else {
            false
        }
    }

    /// Aim at where the target is now; no lead.
    pub fn fire(&self, target: Vec2, speed: f32, radius: f32) -> Option<Projectile> {
        Projectile::new(
            self.position,
            target - self.position,
            speed,
            radius,
            Faction::Enemy,
        )
    }
}

// ── Ammo ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct AmmoReserve {
    pub rounds: u32,
    pub capacity: u32,
    /// Set while a reload is in progress.
    pub reload_started_at: Option<Duration>,
}

impl AmmoReserve {
    pub fn full(capacity: u32) -> Self {
        Self {
            rounds: capacity,
            capacity,
            reload_started_at: None,
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_started_at.is_some()
    }

    pub fn can_fire(&self) -> bool {
        self.rounds > 0 && !self.is_reloading()
    }

    /// Spend one round. Returns `false` (and changes nothing) if firing is
    /// not allowed.
    pub fn take_round(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        self.rounds -= 1;
        true
    }

    /// Start reloading at `now`. Ignored while already reloading or full.
    pub fn begin_reload(&mut self, now: Duration) -> bool {
        if self.is_reloading() || self.rounds >= self.capacity {
            return false;
        }
        self.reload_started_at = Some(now);
        true
    }

    /// Refill once `duration` has elapsed since the reload began.
    pub fn finish_reload_if_due(&mut self, now: Duration, duration: Duration) -> bool {
        match self.reload_started_at {
            Some(started) if now.saturating_sub(started) >= duration => {
                self.rounds = self.capacity;
                self.reload_started_at = None;
                true
            }
            _ => false,
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state. Cloneable so `compute::tick` can hand back a
/// fresh copy without touching its input.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub ammo: AmmoReserve,
    pub kills: u32,
    pub status: GameStatus,
    /// Spawner frame counter; advances once per playing tick.
    pub frame: u64,
}
