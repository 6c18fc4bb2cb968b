/// Pure game-logic transitions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` and returns a brand-new `GameState`. Side effects are limited
/// to the injected RNG and the log; time comes in as `now`, the duration
/// since the loop started, so reload timing is deterministic under test.

use std::time::Duration;

use log::info;
use rand::Rng;

use crate::combat;
use crate::config::GameConfig;
use crate::entities::{AmmoReserve, Faction, GameState, GameStatus, Player, Projectile};
use crate::geometry::Vec2;
use crate::input::{movement_vector, Controls};
use crate::spawner;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Initial state: full health and ammo, player centered, no enemies.
/// Restarting a round is the same as building this again.
pub fn init_state(config: &GameConfig) -> GameState {
    GameState {
        player: Player::new(
            config.arena_center(),
            config.player.max_health,
            config.player.radius,
        ),
        enemies: Vec::new(),
        player_projectiles: Vec::new(),
        enemy_projectiles: Vec::new(),
        ammo: AmmoReserve::full(config.ammo.capacity),
        kills: 0,
        status: GameStatus::Playing,
        frame: 0,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player(state: &GameState, controls: &Controls, config: &GameConfig) -> GameState {
    let mut next = state.clone();
    apply_movement(&mut next, controls, config);
    next
}

/// Fire one player projectile toward `aim`. Unchanged when out of ammo,
/// reloading, or when `aim` is exactly the player's position.
pub fn player_fire(state: &GameState, aim: Vec2, config: &GameConfig) -> GameState {
    let mut next = state.clone();
    apply_fire(&mut next, aim, config);
    next
}

/// Start a reload at `now`. Unchanged when already reloading or full.
pub fn request_reload(state: &GameState, now: Duration) -> GameState {
    let mut next = state.clone();
    apply_reload_request(&mut next, now);
    next
}

// ── Per-tick step (nearly pure, RNG is injected) ────────────────────────────

/// Advance the simulation by one tick. A finished round is returned as-is;
/// restarting is the loop's job.
pub fn tick(
    state: &GameState,
    controls: &Controls,
    now: Duration,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = state.clone();
    if next.status == GameStatus::GameOver {
        return next;
    }

    // ── 1. Movement ──────────────────────────────────────────────────────────
    apply_movement(&mut next, controls, config);

    // ── 2. Firing ────────────────────────────────────────────────────────────
    if controls.fire {
        apply_fire(&mut next, controls.pointer, config);
    }

    // ── 3. Reload request and timer ──────────────────────────────────────────
    if controls.reload {
        apply_reload_request(&mut next, now);
    }
    if next.ammo.finish_reload_if_due(now, config.reload_duration()) {
        info!("reload complete");
    }

    // ── 4. Player projectiles vs enemies ─────────────────────────────────────
    combat::resolve_player_projectiles(&mut next, config);

    // ── 5. Spawn ─────────────────────────────────────────────────────────────
    spawner::spawn_tick(&mut next, config, rng);

    // ── 6. Enemies chase, collide, shoot ─────────────────────────────────────
    combat::resolve_enemies(&mut next, config);

    // ── 7. Enemy projectiles vs player ───────────────────────────────────────
    combat::resolve_enemy_projectiles(&mut next, config);

    next
}

// ── In-place helpers shared by the pure wrappers and `tick` ─────────────────

fn apply_movement(state: &mut GameState, controls: &Controls, config: &GameConfig) {
    state
        .player
        .move_by(movement_vector(controls, config.player.step));

    if config.player.clamp_to_arena {
        let p = &mut state.player.position;
        p.x = p.x.clamp(0.0, config.arena.width);
        p.y = p.y.clamp(0.0, config.arena.height);
    }
}

fn apply_fire(state: &mut GameState, aim: Vec2, config: &GameConfig) {
    if !state.ammo.can_fire() {
        return;
    }
    let origin = state.player.position;
    let Some(shot) = Projectile::new(
        origin,
        aim - origin,
        config.projectile.speed,
        config.projectile.radius,
        Faction::Player,
    ) else {
        return;
    };
    if state.ammo.take_round() {
        state.player_projectiles.push(shot);
    }
}

fn apply_reload_request(state: &mut GameState, now: Duration) {
    if state.ammo.begin_reload(now) {
        info!("reloading with {} rounds left", state.ammo.rounds);
    }
}
