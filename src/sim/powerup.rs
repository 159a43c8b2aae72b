//! Power-up spawning, pickup and expiry

use glam::Vec3;
use rand::Rng;

use super::damage;
use super::events::{GameEvent, SoundEffect};
use super::state::{GameState, PowerUp, PowerUpKind, WeaponKind};
use super::timers;
use crate::consts::*;

fn random_field_point(state: &mut GameState) -> Vec3 {
    Vec3::new(
        state.rng.random_range(-POWERUP_FIELD..POWERUP_FIELD),
        POWERUP_HEIGHT,
        state.rng.random_range(-POWERUP_FIELD..POWERUP_FIELD),
    )
}

/// Drop a power-up of `kind` somewhere in the field
pub fn spawn(state: &mut GameState, kind: PowerUpKind) {
    let pos = random_field_point(state);
    let id = state.registry.next_entity_id();
    log::debug!("Power-up {:?} spawned at {:?}", kind, pos);
    state.registry.pool_mut(kind).push(PowerUp {
        id,
        kind,
        pos,
        pulse_phase: 0.0,
    });
}

/// Apply a collected power-up to the player
pub fn collect(state: &mut GameState, kind: PowerUpKind) {
    let now = state.now();
    match kind {
        PowerUpKind::Weapon(weapon) => {
            timers::stop_rapid_fire(state);
            state.player.weapon = weapon;
            state.player.weapon_until = now + WEAPON_EFFECT_MS;
            if weapon == WeaponKind::Rapid {
                timers::start_rapid_fire(state);
            }
            state.emit(GameEvent::WeaponChanged {
                weapon,
                expires_at: Some(state.player.weapon_until),
            });
        }
        PowerUpKind::Health => damage::heal(state, HEALTH_PICKUP_AMOUNT),
        PowerUpKind::Shield => {
            state.player.shielded = true;
            state.player.shield_until = now + SHIELD_DURATION_MS;
            state.emit(GameEvent::ShieldChanged { active: true });
        }
    }
    log::debug!("{}", kind.notification());
    state.emit(GameEvent::Sound(SoundEffect::Hit));
    state.emit(GameEvent::PowerUpCollected { kind });
}

fn expire_effects(state: &mut GameState) {
    let now = state.now();
    if state.player.weapon != WeaponKind::Normal && now > state.player.weapon_until {
        timers::stop_rapid_fire(state);
        state.player.weapon = WeaponKind::Normal;
        state.emit(GameEvent::WeaponChanged {
            weapon: WeaponKind::Normal,
            expires_at: None,
        });
    }
    if state.player.shielded && now > state.player.shield_until {
        state.player.shielded = false;
        state.emit(GameEvent::ShieldChanged { active: false });
    }
}

fn run_spawners(state: &mut GameState) {
    let now = state.now();
    let due = |last: f64, interval_s: f32| now - last > f64::from(interval_s) * 1000.0;

    if due(state.spawn_timers.weapon_powerup, WEAPON_POWERUP_INTERVAL) {
        let weapon = if state.rng.random::<bool>() {
            WeaponKind::Explosive
        } else {
            WeaponKind::Rapid
        };
        spawn(state, PowerUpKind::Weapon(weapon));
        state.spawn_timers.weapon_powerup = now;
    }
    if due(state.spawn_timers.health_powerup, HEALTH_POWERUP_INTERVAL) {
        spawn(state, PowerUpKind::Health);
        state.spawn_timers.health_powerup = now;
    }
    if due(state.spawn_timers.shield_powerup, SHIELD_POWERUP_INTERVAL) {
        spawn(state, PowerUpKind::Shield);
        state.spawn_timers.shield_powerup = now;
    }
}

/// Pick up everything within reach, pool by pool, newest first
fn collect_in_reach(state: &mut GameState) {
    let eye = state.player.pos;
    for kind in [
        PowerUpKind::Weapon(WeaponKind::Normal),
        PowerUpKind::Health,
        PowerUpKind::Shield,
    ] {
        let pool = state.registry.pool_mut(kind);
        let mut collected = Vec::new();
        let mut i = pool.len();
        while i > 0 {
            i -= 1;
            if pool[i].pos.distance(eye) < PICKUP_RADIUS {
                collected.push(pool.remove(i).kind);
            }
        }
        for kind in collected {
            collect(state, kind);
        }
    }
}

/// Expiry, spawning, pickups and pulse animation for one tick
pub fn update(state: &mut GameState) {
    expire_effects(state);
    run_spawners(state);
    collect_in_reach(state);

    for p in state
        .registry
        .health_powerups
        .iter_mut()
        .chain(state.registry.shield_powerups.iter_mut())
    {
        p.pulse_phase += PULSE_STEP;
    }
}
