//! Damage and health resolution
//!
//! Every hit on the player goes through `apply_damage`, every enemy or boss
//! death goes through `kill_enemy` / `kill_boss`.

use glam::Vec3;

use super::effects::{self, EffectKind};
use super::events::{GameEvent, SoundEffect};
use super::state::{EntityId, GameState};
use super::{level, timers};
use crate::consts::*;

/// Who set off an explosion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionSource {
    Player,
    Boss,
}

/// Damage the player. No-op while shielded or after game over.
pub fn apply_damage(state: &mut GameState, amount: f32) {
    if state.progress.game_over || state.player.shielded {
        return;
    }
    let player = &mut state.player;
    player.health = (player.health - amount).max(0.0);
    let (health, max) = (player.health, player.max_health);
    state.emit(GameEvent::HealthChanged { health, max });

    if health <= 0.0 {
        game_over(state);
    }
}

/// Heal the player, clamped to max health
pub fn heal(state: &mut GameState, amount: f32) {
    let player = &mut state.player;
    player.health = (player.health + amount).min(player.max_health);
    let (health, max) = (player.health, player.max_health);
    state.emit(GameEvent::HealthChanged { health, max });
}

/// Enter the terminal state: intents off, auto-fire off, hostiles cleared
pub fn game_over(state: &mut GameState) {
    if state.progress.game_over {
        return;
    }
    state.progress.game_over = true;
    state.player.sprinting = false;
    state.player.velocity = Vec3::ZERO;
    timers::stop_rapid_fire(state);
    state.registry.clear_hostiles();
    state.tasks.clear();

    log::info!(
        "Game over on level {} with score {}",
        state.progress.level,
        state.progress.score
    );
    let final_score = state.progress.score;
    state.emit(GameEvent::GameOver { final_score });
}

/// Remove an enemy as killed. Returns false if it was already gone.
pub fn kill_enemy(state: &mut GameState, id: EntityId) -> bool {
    let Some(enemy) = state.registry.remove_enemy(id) else {
        return false;
    };
    state.emit(GameEvent::Sound(SoundEffect::Death));
    effects::spawn(state, EffectKind::DeathBurst, enemy.pos, 1000.0);
    level::award_kill(state);
    true
}

/// Subtract boss health and kill it at zero
pub fn damage_boss(state: &mut GameState, amount: f32) {
    let Some(boss) = state.registry.boss.as_mut() else {
        return;
    };
    boss.health -= amount;
    let (health, max) = (boss.health.max(0.0), boss.max_health);
    state.emit(GameEvent::BossHealthChanged { health, max });
    if health <= 0.0 {
        kill_boss(state);
    }
}

/// Boss death: clears every minion and completes the level
pub fn kill_boss(state: &mut GameState) {
    let Some(boss) = state.registry.boss.take() else {
        return;
    };
    log::info!("Boss defeated at {:?}", boss.pos);
    state.emit(GameEvent::Sound(SoundEffect::Death));
    effects::spawn(state, EffectKind::DeathBurst, boss.pos, 1000.0);
    state.registry.enemies.clear();
    state.emit(GameEvent::BossDefeated);
    level::complete_level(state);
}

/// Area explosion: kills every enemy within `radius`; a player explosion also
/// chips the boss
pub fn explode(state: &mut GameState, pos: Vec3, radius: f32, source: ExplosionSource) {
    effects::spawn(state, EffectKind::Explosion { radius }, pos, 700.0);

    let caught: Vec<EntityId> = state
        .registry
        .enemies
        .iter()
        .rev()
        .filter(|e| pos.distance(e.pos) < radius)
        .map(|e| e.id)
        .collect();
    for id in caught {
        kill_enemy(state, id);
    }

    if source == ExplosionSource::Player {
        let boss_caught = state
            .registry
            .boss
            .as_ref()
            .is_some_and(|b| pos.distance(b.pos) < radius);
        if boss_caught {
            damage_boss(state, EXPLOSION_BOSS_DAMAGE);
        }
    }
}
