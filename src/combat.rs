/// Collision resolution for one tick.
///
/// The three passes run in a fixed order (player shots, enemies, enemy shots)
/// and each uses first-match semantics: a projectile hits at most one enemy,
/// at most one enemy touches the player per tick, and at most one enemy
/// bullet lands per tick.

use log::{debug, info};

use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus};

/// Move player projectiles and apply their hits. Returns the number of
/// enemies killed this pass.
pub fn resolve_player_projectiles(state: &mut GameState, config: &GameConfig) -> u32 {
    let mut killed = 0;
    let mut i = 0;

    while i < state.player_projectiles.len() {
        state.player_projectiles[i].advance();
        let hitbox = state.player_projectiles[i].bounding_box();

        let target = state
            .enemies
            .iter()
            .position(|enemy| hitbox.overlaps(&enemy.bounding_box()));

        match target {
            Some(ei) => {
                state.player_projectiles.remove(i);
                let enemy = &mut state.enemies[ei];
                enemy.receive_hit();
                if !enemy.is_alive() {
                    state.enemies.remove(ei);
                    state.kills += 1;
                    killed += 1;
                    info!("enemy destroyed; kills = {}", state.kills);
                }
            }
            None => i += 1,
        }
    }

    cull_expired(state, config);
    killed
}

/// Move each enemy toward the player, apply body contact, and let enemies
/// fire on their interval.
///
/// The first enemy touching the player deals contact damage and ends the
/// pass: enemies after it neither move nor shoot this tick.
pub fn resolve_enemies(state: &mut GameState, config: &GameConfig) {
    let target = state.player.position;
    let player_box = state.player.bounding_box();

    for enemy in state.enemies.iter_mut() {
        enemy.move_toward(target, config.enemy.speed, config.enemy.chase_epsilon);

        if enemy.bounding_box().overlaps(&player_box) {
            let dead = state.player.take_damage(config.enemy.contact_damage);
            debug!("enemy contact; health = {}", state.player.health);
            if dead {
                set_game_over(&mut state.status, state.kills);
            }
            break;
        }

        if enemy.ready_to_fire(config.enemy.shoot_interval) {
            if let Some(bullet) = enemy.fire(target, config.projectile.speed, config.projectile.radius) {
                state.enemy_projectiles.push(bullet);
            }
        }
    }
}

/// Move enemy bullets in order until one hits the player. Bullets after the
/// hit are left untouched until the next tick.
pub fn resolve_enemy_projectiles(state: &mut GameState, config: &GameConfig) {
    let player_box = state.player.bounding_box();

    let hit = state.enemy_projectiles.iter_mut().position(|bullet| {
        bullet.advance();
        bullet.bounding_box().overlaps(&player_box)
    });

    if let Some(bi) = hit {
        state.enemy_projectiles.remove(bi);
        let dead = state.player.take_damage(config.projectile.bullet_damage);
        debug!("player shot; health = {}", state.player.health);
        if dead {
            set_game_over(&mut state.status, state.kills);
        }
    }

    cull_expired(state, config);
}

/// Drop projectiles that have outlived their lifetime or left the arena.
pub fn cull_expired(state: &mut GameState, config: &GameConfig) {
    let arena = config.arena_rect();
    let lifetime = config.projectile.lifetime_ticks;
    state
        .player_projectiles
        .retain(|p| !p.is_expired(&arena, lifetime));
    state
        .enemy_projectiles
        .retain(|p| !p.is_expired(&arena, lifetime));
}

fn set_game_over(status: &mut GameStatus, kills: u32) {
    if *status != GameStatus::GameOver {
        info!("player died with {} kills", kills);
    }
    *status = GameStatus::GameOver;
}
