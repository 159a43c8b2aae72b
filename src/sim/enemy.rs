//! Regular enemy spawning and wandering-pursuit AI
//!
//! Minions on the boss level are regular enemies with the `minion` flag and
//! share all of the logic here.

use glam::Vec3;
use rand::Rng;

use super::boss;
use super::damage;
use super::events::{GameEvent, SoundEffect};
use super::state::{Enemy, GameState};
use crate::consts::*;
use crate::{facing_yaw, horizontal_distance, ring_offset};

fn random_turn_interval(rng: &mut impl Rng) -> f64 {
    ENEMY_TURN_MIN_MS + rng.random::<f64>() * ENEMY_TURN_SPREAD_MS
}

/// Whether `pos` keeps the minimum separation from every live enemy
fn has_clearance(state: &GameState, pos: Vec3) -> bool {
    state
        .registry
        .enemies
        .iter()
        .all(|e| horizontal_distance(pos, e.pos) >= ENEMY_SEPARATION)
}

/// Pick a spawn point on a ring around `center`, inside the enemy bound and
/// clear of other enemies
fn find_spawn_point(state: &mut GameState, center: Vec3, ring_min: f32, ring_spread: f32) -> Option<Vec3> {
    let limit = ENEMY_BOUND - 1.0;
    for _ in 0..SPAWN_ATTEMPTS {
        let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
        let distance = ring_min + state.rng.random::<f32>() * ring_spread;
        let mut pos = center + ring_offset(angle, distance);
        pos.x = pos.x.clamp(-limit, limit);
        pos.z = pos.z.clamp(-limit, limit);
        pos.y = ENEMY_GROUND_HEIGHT;
        if has_clearance(state, pos) {
            return Some(pos);
        }
    }
    None
}

fn push_enemy(state: &mut GameState, pos: Vec3, speed: f32, minion: bool) {
    let id = state.registry.next_entity_id();
    let turn_interval = random_turn_interval(&mut state.rng);
    let now = state.now();
    state.registry.enemies.push(Enemy {
        id,
        pos,
        facing: 0.0,
        direction: Vec3::ZERO,
        speed,
        last_attack: None,
        last_turn: now,
        turn_interval,
        minion,
    });
}

/// Opening wave of a regular level: evenly spaced on a ring around the origin
pub fn spawn_initial_wave(state: &mut GameState) {
    let level = state.levels.get(state.progress.level);
    let count = INITIAL_WAVE_MAX.min(level.enemy_count);
    let speed = level.speed * 2.0;
    for i in 0..count {
        let angle = std::f32::consts::TAU * i as f32 / count as f32;
        let mut pos = ring_offset(angle, INITIAL_RING_RADIUS);
        pos.y = ENEMY_GROUND_HEIGHT;
        push_enemy(state, pos, speed, false);
    }
}

/// Periodic wave around the player. Returns the number actually spawned.
pub fn spawn_wave(state: &mut GameState) -> u32 {
    let live = state.registry.enemies.len() as u32;
    let budget = ((state.progress.level as f32 * 1.5).floor() as u32)
        .min(state.enemy_cap.saturating_sub(live));
    let speed = state.levels.get(state.progress.level).speed * 1.2;
    let center = state.player.pos;

    let mut spawned = 0;
    for _ in 0..budget {
        if let Some(pos) = find_spawn_point(state, center, WAVE_RING_MIN, WAVE_RING_SPREAD) {
            push_enemy(state, pos, speed, false);
            spawned += 1;
        }
    }
    spawned
}

/// One boss-level minion on a ring around the boss
pub fn spawn_minion(state: &mut GameState) -> bool {
    let center = state.registry.boss.as_ref().map_or(Vec3::ZERO, |b| b.pos);
    let speed = state.levels.get(state.progress.level).speed;
    match find_spawn_point(state, center, MINION_RING_MIN, MINION_RING_SPREAD) {
        Some(pos) => {
            push_enemy(state, pos, speed, true);
            true
        }
        None => {
            log::debug!("No room to spawn a minion");
            false
        }
    }
}

fn update_waves(state: &mut GameState) {
    let now = state.now();
    let interval_ms = f64::from(state.spawn_interval) * 1000.0;
    if now - state.spawn_timers.wave > interval_ms
        && (state.registry.enemies.len() as u32) < state.enemy_cap
    {
        let spawned = spawn_wave(state);
        if spawned > 0 {
            log::info!("Wave of {} spawned on level {}", spawned, state.progress.level);
            state.emit(GameEvent::Sound(SoundEffect::Movement));
        }
        state.spawn_timers.wave = now;
    }
}

/// Top the minion pack back up while the boss lives
fn update_reinforcements(state: &mut GameState) {
    if state.registry.boss.is_none() {
        return;
    }
    let Some(desc) = state.levels.get(state.progress.level).boss.clone() else {
        return;
    };
    let now = state.now();
    if now - state.spawn_timers.minion > f64::from(desc.minion_spawn_interval) * 1000.0 {
        if (state.registry.minion_count() as u32) < desc.minion_count {
            spawn_minion(state);
        }
        state.spawn_timers.minion = now;
    }
}

/// Speed for this tick: faster inside the approach range, slower right next
/// to the player, never above the global cap
pub fn effective_speed(base: f32, distance: f32, level: u32) -> f32 {
    let mut speed = base;
    if distance < APPROACH_RANGE {
        speed *= (1.3 + level as f32 * 0.1).min(APPROACH_MULTIPLIER_CAP);
        if distance < MIN_APPROACH_DISTANCE {
            speed *= 0.5;
        }
    }
    speed.min(ENEMY_MAX_SPEED)
}

/// Steering direction toward `target` with per-axis jitter of `spread`
pub fn wander_direction(rng: &mut impl Rng, from: Vec3, target: Vec3, spread: f32) -> Vec3 {
    let to_target = Vec3::new(target.x - from.x, 0.0, target.z - from.z).normalize_or_zero();
    let jitter = Vec3::new(
        (rng.random::<f32>() - 0.5) * spread,
        0.0,
        (rng.random::<f32>() - 0.5) * spread,
    );
    (to_target + jitter).normalize_or_zero()
}

/// Boss, spawners, then every enemy in insertion order
pub fn update(state: &mut GameState) {
    boss::update(state);
    if state.progress.game_over {
        return;
    }

    update_waves(state);
    update_reinforcements(state);

    let level = state.progress.level;
    let descriptor = state.levels.get(level);
    let (attack_damage, attack_ms) = (
        descriptor.attack_damage,
        f64::from(descriptor.attack_speed) * 1000.0,
    );
    let player_pos = state.player.pos;

    for i in 0..state.registry.enemies.len() {
        let now = state.now();
        let attack_ready;
        let distance;
        {
            let rng = &mut state.rng;
            let enemy = &mut state.registry.enemies[i];

            if now - enemy.last_turn > enemy.turn_interval {
                enemy.direction = wander_direction(rng, enemy.pos, player_pos, ENEMY_JITTER);
                enemy.last_turn = now;
                enemy.turn_interval = random_turn_interval(rng);
            }

            distance = enemy.pos.distance(player_pos);
            attack_ready = distance < ENEMY_MELEE_RANGE
                && state.clock.ready(enemy.last_attack, attack_ms);
            if attack_ready {
                enemy.last_attack = Some(now);
            }
        }

        if attack_ready {
            damage::apply_damage(state, attack_damage);
            state.emit(GameEvent::Sound(SoundEffect::Hit));
            if state.progress.game_over {
                return;
            }
        }

        let enemy = &state.registry.enemies[i];
        let speed = effective_speed(enemy.speed, distance, level);
        let candidate = Vec3::new(
            enemy.pos.x + enemy.direction.x * speed,
            enemy.pos.y,
            enemy.pos.z + enemy.direction.z * speed,
        );
        let in_bounds = candidate.x.abs() < ENEMY_BOUND && candidate.z.abs() < ENEMY_BOUND;
        let clear = in_bounds
            && state
                .registry
                .enemies
                .iter()
                .enumerate()
                .all(|(j, other)| j == i || horizontal_distance(candidate, other.pos) >= ENEMY_SEPARATION);

        let enemy = &mut state.registry.enemies[i];
        if clear {
            enemy.pos = candidate;
        }
        enemy.facing = facing_yaw(enemy.direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level;

    fn lone_enemy(state: &mut GameState, pos: Vec3, direction: Vec3, speed: f32) {
        push_enemy(state, pos, speed, false);
        if let Some(e) = state.registry.enemies.last_mut() {
            e.direction = direction;
        }
    }

    #[test]
    fn test_initial_wave_layout() {
        let state = GameState::new(11);
        assert_eq!(state.registry.enemies.len(), 10);
        for e in &state.registry.enemies {
            assert!((horizontal_distance(e.pos, Vec3::ZERO) - INITIAL_RING_RADIUS).abs() < 1e-4);
            assert_eq!(e.pos.y, ENEMY_GROUND_HEIGHT);
            assert!((e.speed - 0.044).abs() < 1e-6);
        }
    }

    #[test]
    fn test_wave_fills_to_cap() {
        let mut state = GameState::new(11);
        for _ in 0..3 {
            state.registry.enemies.pop();
        }
        state.clock.set(5001.0);
        update(&mut state);
        // floor(1 * 1.5) = 1 per wave on level 1
        assert_eq!(state.registry.enemies.len(), 8);
        assert!(state.events.contains(&GameEvent::Sound(SoundEffect::Movement)));
        let newest = state.registry.enemies.last().unwrap();
        assert!(newest.pos.x.abs() < ENEMY_BOUND && newest.pos.z.abs() < ENEMY_BOUND);
    }

    #[test]
    fn test_no_wave_before_interval() {
        let mut state = GameState::new(11);
        state.registry.enemies.truncate(5);
        state.clock.set(4000.0);
        update(&mut state);
        assert_eq!(state.registry.enemies.len(), 5);
    }

    #[test]
    fn test_melee_attack_respects_cooldown() {
        let mut state = GameState::new(11);
        state.registry.enemies.clear();
        let at = Vec3::new(state.player.pos.x, ENEMY_GROUND_HEIGHT, state.player.pos.z);
        lone_enemy(&mut state, at, Vec3::ZERO, 0.0);
        update(&mut state);
        assert_eq!(state.player.health, MAX_HEALTH - 5.0);
        update(&mut state);
        assert_eq!(state.player.health, MAX_HEALTH - 5.0);

        state.clock.set(2001.0);
        update(&mut state);
        assert_eq!(state.player.health, MAX_HEALTH - 10.0);
    }

    #[test]
    fn test_speed_is_capped() {
        assert_eq!(effective_speed(1.0, 10.0, 1), ENEMY_MAX_SPEED);
        assert!((effective_speed(0.05, 10.0, 1) - 0.07).abs() < 1e-6);
        assert!((effective_speed(0.05, 3.0, 1) - 0.035).abs() < 1e-6);
        assert_eq!(effective_speed(0.05, 20.0, 1), 0.05);
        // multiplier saturates at 1.8
        assert!((effective_speed(0.05, 10.0, 9) - 0.09).abs() < 1e-6);
    }

    #[test]
    fn test_separation_rejects_move() {
        let mut state = GameState::new(11);
        state.registry.enemies.clear();
        lone_enemy(&mut state, Vec3::new(10.0, ENEMY_GROUND_HEIGHT, 0.0), Vec3::NEG_X, 0.1);
        lone_enemy(&mut state, Vec3::new(8.45, ENEMY_GROUND_HEIGHT, 0.0), Vec3::ZERO, 0.0);
        update(&mut state);
        assert_eq!(state.registry.enemies[0].pos.x, 10.0);
    }

    #[test]
    fn test_bound_rejects_move() {
        let mut state = GameState::new(11);
        state.registry.enemies.clear();
        lone_enemy(&mut state, Vec3::new(39.95, ENEMY_GROUND_HEIGHT, 0.0), Vec3::X, 0.1);
        update(&mut state);
        assert_eq!(state.registry.enemies[0].pos.x, 39.95);
    }

    #[test]
    fn test_free_move_and_facing() {
        let mut state = GameState::new(11);
        state.registry.enemies.clear();
        lone_enemy(&mut state, Vec3::new(10.0, ENEMY_GROUND_HEIGHT, 5.0), Vec3::X, 1.0);
        update(&mut state);
        let e = &state.registry.enemies[0];
        assert!((e.pos.x - (10.0 + ENEMY_MAX_SPEED)).abs() < 1e-5);
        assert!((e.facing - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_minions_are_reinforced() {
        let mut state = GameState::new(11);
        level::start_next_level(&mut state);
        level::start_next_level(&mut state);
        assert_eq!(state.registry.minion_count(), 5);
        state.registry.enemies.truncate(3);

        state.clock.set(5001.0);
        update(&mut state);
        assert_eq!(state.registry.minion_count(), 4);

        // Nothing more until the next interval
        update(&mut state);
        assert_eq!(state.registry.minion_count(), 4);
    }

    #[test]
    fn test_wander_direction_is_unit_and_horizontal() {
        let mut state = GameState::new(11);
        let dir = wander_direction(&mut state.rng, Vec3::new(10.0, 0.2, 0.0), Vec3::new(0.0, 1.6, 0.0), ENEMY_JITTER);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert_eq!(dir.y, 0.0);
        assert!(dir.x < 0.0);
    }
}
