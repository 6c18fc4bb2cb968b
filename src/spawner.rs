use log::info;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Enemy, GameState};
use crate::geometry::Vec2;

/// Advance the spawn counter and, on an exact multiple of the spawn interval
/// with room left, add one enemy at a random spot in the arena.
///
/// Returns the index of the new enemy, if one was spawned. The counter keeps
/// running while the arena is full, so a freed slot is refilled on the next
/// multiple rather than immediately.
pub fn spawn_tick(state: &mut GameState, config: &GameConfig, rng: &mut impl Rng) -> Option<usize> {
    state.frame += 1;

    if state.enemies.len() >= config.enemy.max_count
        || state.frame % config.enemy.spawn_interval != 0
    {
        return None;
    }

    // Whole-unit positions, like the rest of the arena grid.
    let max_x = (config.arena.width - config.enemy.width).max(0.0) as i32;
    let max_y = (config.arena.height - config.enemy.height).max(0.0) as i32;
    let position = Vec2::new(
        rng.gen_range(0..=max_x) as f32,
        rng.gen_range(0..=max_y) as f32,
    );

    state.enemies.push(Enemy::new(
        position,
        Vec2::new(config.enemy.width, config.enemy.height),
        config.enemy.health,
    ));
    info!(
        "spawned enemy at ({:.0}, {:.0}); {} active",
        position.x,
        position.y,
        state.enemies.len()
    );
    Some(state.enemies.len() - 1)
}
