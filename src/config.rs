/// Immutable game tuning, built once at start-up and passed by reference.
///
/// Every section is `#[serde(default)]`, so a TOML file only needs the keys
/// it wants to override:
///
/// ```toml
/// [enemy]
/// max_count = 4
///
/// [ammo]
/// reload_ms = 1500
/// ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::geometry::{Rect, Vec2};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena: ArenaConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub projectile: ProjectileConfig,
    pub ammo: AmmoConfig,
    pub timing: TimingConfig,
    pub display: DisplayConfig,
    pub keys: KeyBindings,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Drawn radius and half-extent of the hitbox.
    pub radius: f32,
    pub max_health: u32,
    /// Units moved per tick for each held direction key.
    pub step: f32,
    /// Keep the player's center inside the arena. Off by default: movement
    /// is a plain translation.
    pub clamp_to_arena: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    pub health: u32,
    pub speed: f32,
    /// Enemies closer than this to their target stop moving.
    pub chase_epsilon: f32,
    /// Ticks between shots.
    pub shoot_interval: u32,
    /// Ticks between spawn attempts.
    pub spawn_interval: u64,
    pub max_count: usize,
    /// Health removed per tick of body contact.
    pub contact_damage: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub radius: f32,
    pub speed: f32,
    /// Health removed by one enemy bullet.
    pub bullet_damage: u32,
    /// Ticks a projectile may live before it is culled.
    pub lifetime_ticks: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AmmoConfig {
    pub capacity: u32,
    pub reload_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fps: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub start_fullscreen: bool,
    /// Size of the windowed viewport in terminal cells.
    pub windowed_cols: u16,
    pub windowed_rows: u16,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: char,
    pub down: char,
    pub left: char,
    pub right: char,
    pub reload: char,
    pub restart: char,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: String,
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            max_health: 100,
            step: 5.0,
            clamp_to_arena: false,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
            health: 3,
            speed: 1.0,
            chase_epsilon: 1.0,
            shoot_interval: 60,
            spawn_interval: 30,
            max_count: 2,
            contact_damage: 1,
        }
    }
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            speed: 10.0,
            bullet_damage: 10,
            lifetime_ticks: 180,
        }
    }
}

impl Default for AmmoConfig {
    fn default() -> Self {
        Self {
            capacity: 30,
            reload_ms: 3000,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            start_fullscreen: true,
            windowed_cols: 80,
            windowed_rows: 30,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: 'w',
            down: 's',
            left: 'a',
            right: 'd',
            reload: 'r',
            restart: 'r',
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "shooter.log".to_string(),
            level: "warn".to_string(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────────────────

impl GameConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        // NaN slips through every ordered comparison below.
        let floats = [
            self.arena.width,
            self.arena.height,
            self.player.radius,
            self.player.step,
            self.enemy.width,
            self.enemy.height,
            self.enemy.speed,
            self.enemy.chase_epsilon,
            self.projectile.radius,
            self.projectile.speed,
        ];
        if floats.iter().any(|v| !v.is_finite()) {
            return invalid("numeric settings must be finite");
        }

        if self.arena.width <= 0.0 || self.arena.height <= 0.0 {
            return invalid("arena dimensions must be positive");
        }
        if self.enemy.width <= 0.0 || self.enemy.height <= 0.0 {
            return invalid("enemy dimensions must be positive");
        }
        if self.enemy.width > self.arena.width || self.enemy.height > self.arena.height {
            return invalid("enemy does not fit inside the arena");
        }
        if self.player.radius <= 0.0 || self.projectile.radius <= 0.0 {
            return invalid("radii must be positive");
        }
        if self.player.max_health == 0 || self.enemy.health == 0 {
            return invalid("starting health must be at least 1");
        }
        if self.projectile.speed <= 0.0 || self.enemy.speed < 0.0 {
            return invalid("speeds must be positive");
        }
        if self.enemy.spawn_interval == 0 || self.enemy.shoot_interval == 0 {
            return invalid("spawn and shoot intervals must be at least 1 tick");
        }
        if self.ammo.capacity == 0 {
            return invalid("ammo capacity must be at least 1");
        }
        if self.projectile.lifetime_ticks == 0 {
            return invalid("projectile lifetime must be at least 1 tick");
        }
        if self.timing.fps == 0 {
            return invalid("fps must be at least 1");
        }
        if self.display.windowed_cols < 4 || self.display.windowed_rows < 4 {
            return invalid("windowed viewport is too small");
        }
        Ok(())
    }

    /// The playable area, anchored at the origin.
    pub fn arena_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.arena.width, self.arena.height)
    }

    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena.width, self.arena.height)
    }

    pub fn arena_center(&self) -> Vec2 {
        Vec2::new(self.arena.width / 2.0, self.arena.height / 2.0)
    }

    pub fn reload_duration(&self) -> Duration {
        Duration::from_millis(self.ammo.reload_ms)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.timing.fps
    }
}
