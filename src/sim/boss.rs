//! The Squirrel King
//!
//! A four-state machine (chase, ranged, leap, area) plus a melee action that
//! fires from chase without a transition. While a leap is in flight the state
//! machine is suspended and only the leap advances.

use glam::Vec3;
use rand::Rng;

use super::damage::{self, ExplosionSource};
use super::effects::{self, Effect, EffectKind, Lifetime};
use super::enemy::wander_direction;
use super::events::{GameEvent, SoundEffect};
use super::movement::clamp_to_arena;
use super::projectile;
use super::state::{AttackStamps, Boss, BossState, EntityId, GameState, Leap};
use super::timers::{self, TaskAction};
use crate::consts::*;
use crate::facing_yaw;

/// Position along a leap at progress `t`: linear on XZ, parabolic on Y
/// peaking at `t = 0.5`
pub fn leap_arc(start: Vec3, target: Vec3, peak_height: f32, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    Vec3::new(
        (1.0 - t) * start.x + t * target.x,
        start.y + peak_height * 4.0 * t * (1.0 - t),
        (1.0 - t) * start.z + t * target.z,
    )
}

/// Spawn the boss for the current level at the far end of the arena
pub fn spawn_boss(state: &mut GameState) {
    let Some(desc) = state.levels.get(state.progress.level).boss.clone() else {
        return;
    };
    let id = state.registry.next_entity_id();
    let now = state.now();
    state.registry.boss = Some(Boss {
        id,
        pos: Vec3::new(0.0, BOSS_GROUND_HEIGHT, BOSS_SPAWN_Z),
        facing: 0.0,
        direction: Vec3::ZERO,
        speed: desc.speed,
        health: desc.health,
        max_health: desc.health,
        attack_damage: desc.attack_damage,
        state: BossState::Chase,
        state_entered: now,
        last_used: AttackStamps::default(),
        last_turn: now,
        turn_interval: BOSS_TURN_INTERVAL_MS,
        leap: None,
    });
    log::info!("Boss spawned with {} health", desc.health);
    state.emit(GameEvent::BossHealthChanged {
        health: desc.health,
        max: desc.health,
    });
}

/// What the chase state decided to do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
enum Decision {
    Stay,
    ReturnToChase,
    Enter(BossState),
    Melee,
}

fn decide(state: &GameState, boss: &Boss) -> Decision {
    let clock = &state.clock;
    if boss.state != BossState::Chase {
        let expired = boss
            .state
            .duration_ms()
            .is_some_and(|d| clock.since(boss.state_entered) > d);
        return if expired {
            Decision::ReturnToChase
        } else {
            Decision::Stay
        };
    }

    let distance = boss.pos.distance(state.player.pos);
    if distance >= BOSS_ENGAGE_RANGE {
        return Decision::Stay;
    }
    let stamps = &boss.last_used;
    if clock.ready(stamps.ranged, BOSS_RANGED_COOLDOWN_MS) {
        Decision::Enter(BossState::Ranged)
    } else if distance > BOSS_LEAP_MIN_DISTANCE && clock.ready(stamps.leap, BOSS_LEAP_COOLDOWN_MS) {
        Decision::Enter(BossState::Leap)
    } else if distance < BOSS_AREA_MAX_DISTANCE && clock.ready(stamps.area, BOSS_AREA_COOLDOWN_MS) {
        Decision::Enter(BossState::Area)
    } else if distance < BOSS_MELEE_RANGE && clock.ready(stamps.melee, BOSS_MELEE_COOLDOWN_MS) {
        Decision::Melee
    } else {
        Decision::Stay
    }
}

/// Advance the boss by one tick
pub fn update(state: &mut GameState) {
    let Some(boss) = state.registry.boss.as_ref() else {
        return;
    };
    let id = boss.id;
    if boss.in_leap() {
        update_leap(state, id);
        return;
    }

    let now = state.now();
    let decision = decide(state, boss);
    match decision {
        Decision::Stay => {}
        Decision::ReturnToChase => {
            if let Some(boss) = state.registry.boss.as_mut() {
                log::debug!("Boss {:?} -> Chase", boss.state);
                boss.state = BossState::Chase;
                boss.state_entered = now;
            }
        }
        Decision::Enter(next) => {
            if let Some(boss) = state.registry.boss.as_mut() {
                log::debug!("Boss Chase -> {:?}", next);
                boss.state = next;
                boss.state_entered = now;
                let stamp = Some(now);
                match next {
                    BossState::Ranged => boss.last_used.ranged = stamp,
                    BossState::Leap => boss.last_used.leap = stamp,
                    BossState::Area => boss.last_used.area = stamp,
                    BossState::Chase => {}
                }
            }
            match next {
                BossState::Ranged => prepare_ranged(state, id),
                BossState::Leap => start_leap(state, id),
                BossState::Area => start_area(state, id),
                BossState::Chase => {}
            }
        }
        Decision::Melee => {
            if let Some(boss) = state.registry.boss.as_mut() {
                boss.last_used.melee = Some(now);
            }
            melee(state, id);
        }
    }

    let current = state.registry.boss_with_id(id).map(|b| b.state);
    match current {
        Some(BossState::Chase) => chase(state, id),
        Some(BossState::Ranged) => update_ranged(state, id),
        // Area resolves through its scheduled strike, leap through update_leap
        Some(BossState::Area) | Some(BossState::Leap) | None => {}
    }
}

fn melee(state: &mut GameState, id: EntityId) {
    let Some(boss) = state.registry.boss_with_id(id) else {
        return;
    };
    let (pos, amount) = (boss.pos, boss.attack_damage);
    damage::apply_damage(state, amount);
    state.emit(GameEvent::Sound(SoundEffect::Hit));
    effects::spawn(
        state,
        EffectKind::AttackFlash {
            color: 0xff0000,
            size: 3.0,
        },
        pos,
        350.0,
    );
}

fn chase(state: &mut GameState, id: EntityId) {
    let now = state.now();
    let target = state.player.pos;
    let rng = &mut state.rng;
    let Some(boss) = state.registry.boss.as_mut().filter(|b| b.id == id) else {
        return;
    };

    if now - boss.last_turn > boss.turn_interval {
        boss.direction = wander_direction(rng, boss.pos, target, BOSS_JITTER);
        boss.last_turn = now;
    }

    boss.pos.x = (boss.pos.x + boss.direction.x * boss.speed).clamp(-BOSS_BOUND, BOSS_BOUND);
    boss.pos.z = (boss.pos.z + boss.direction.z * boss.speed).clamp(-BOSS_BOUND, BOSS_BOUND);
    boss.pos.y = BOSS_GROUND_HEIGHT;
    boss.facing = facing_yaw(boss.direction);
}

fn prepare_ranged(state: &mut GameState, id: EntityId) {
    if let Some(pos) = state.registry.boss_with_id(id).map(|b| b.pos) {
        effects::spawn(state, EffectKind::RangedTelegraph, pos, RANGED_TELEGRAPH_MS);
    }
}

/// After the telegraph, queue the staggered burst and go back to chase
fn update_ranged(state: &mut GameState, id: EntityId) {
    let now = state.now();
    let Some(boss) = state.registry.boss_with_id_mut(id) else {
        return;
    };
    if now - boss.state_entered <= RANGED_TELEGRAPH_MS {
        return;
    }
    boss.state = BossState::Chase;
    boss.state_entered = now;
    log::debug!("Boss ranged burst queued");

    for i in 0..RANGED_BURST_COUNT {
        timers::schedule(state, f64::from(i) * RANGED_BURST_STAGGER_MS, TaskAction::BossShot { boss: id });
    }
}

/// One throw from above the boss toward the player's eye
pub fn fire_thrown(state: &mut GameState, id: EntityId) {
    let Some(boss) = state.registry.boss_with_id(id) else {
        return;
    };
    let origin = boss.pos + Vec3::Y * THROWN_LAUNCH_HEIGHT;
    let amount = boss.attack_damage * THROWN_DAMAGE_FACTOR;

    let rng = &mut state.rng;
    let mut dir = (state.player.pos - origin).normalize_or_zero();
    dir += Vec3::new(
        (rng.random::<f32>() - 0.5) * THROWN_JITTER,
        (rng.random::<f32>() - 0.5) * THROWN_JITTER,
        (rng.random::<f32>() - 0.5) * THROWN_JITTER,
    );

    projectile::spawn_thrown(state, origin, dir, amount);
    state.emit(GameEvent::Sound(SoundEffect::Launch));
    effects::spawn(
        state,
        EffectKind::AttackFlash {
            color: 0xffcc00,
            size: 1.5,
        },
        origin,
        350.0,
    );
}

/// Take off toward the player's current position
fn start_leap(state: &mut GameState, id: EntityId) {
    let now = state.now();
    let target = state.player.pos;
    let Some(boss) = state.registry.boss_with_id_mut(id) else {
        return;
    };
    boss.leap = Some(Leap {
        start: boss.pos,
        target,
        progress: 0.0,
        peak_height: LEAP_PEAK_HEIGHT,
    });

    let mut marker = Effect::timed(EffectKind::LeapTarget, Vec3::new(target.x, 0.1, target.z), now, 0.0);
    marker.lifetime = Lifetime::WhileLeaping(id);
    state.effects.push(marker);
    state.emit(GameEvent::Sound(SoundEffect::Death));
}

fn update_leap(state: &mut GameState, id: EntityId) {
    let spawn_trail = state.rng.random::<f32>() > 0.5;
    let Some(boss) = state.registry.boss_with_id_mut(id) else {
        return;
    };
    let Some(leap) = boss.leap.as_mut() else {
        return;
    };

    leap.progress += LEAP_PROGRESS_PER_TICK;
    if leap.progress >= 1.0 {
        land(state, id);
        return;
    }

    let leap = *leap;
    boss.pos = leap_arc(leap.start, leap.target, leap.peak_height, leap.progress);
    boss.facing = facing_yaw(Vec3::new(
        leap.target.x - leap.start.x,
        0.0,
        leap.target.z - leap.start.z,
    ));
    let pos = boss.pos;
    if spawn_trail {
        effects::spawn(state, EffectKind::LeapTrail, pos, 700.0);
    }
}

fn land(state: &mut GameState, id: EntityId) {
    let now = state.now();
    let Some(boss) = state.registry.boss_with_id_mut(id) else {
        return;
    };
    let Some(leap) = boss.leap.take() else {
        return;
    };
    let mut pos = leap_arc(leap.start, leap.target, leap.peak_height, 1.0);
    pos.x = pos.x.clamp(-BOSS_BOUND, BOSS_BOUND);
    pos.z = pos.z.clamp(-BOSS_BOUND, BOSS_BOUND);
    pos.y = BOSS_GROUND_HEIGHT;
    boss.pos = pos;
    boss.state = BossState::Chase;
    boss.state_entered = now;
    let amount = boss.attack_damage * LEAP_DAMAGE_FACTOR;
    log::debug!("Boss landed at {:?}", pos);

    damage::explode(state, pos, LEAP_LANDING_RADIUS, ExplosionSource::Boss);

    if pos.distance(state.player.pos) < LEAP_LANDING_RADIUS {
        let away = Vec3::new(state.player.pos.x - pos.x, 0.0, state.player.pos.z - pos.z);
        let push = away.normalize_or(-state.player.forward());
        clamp_player_after_push(state, push * LEAP_KNOCKBACK);
        damage::apply_damage(state, amount);
    }
}

fn clamp_player_after_push(state: &mut GameState, offset: Vec3) {
    let player = &mut state.player;
    player.pos += offset;
    clamp_to_arena(&mut player.pos);
}

/// Start charging the area attack
fn start_area(state: &mut GameState, id: EntityId) {
    let Some(pos) = state.registry.boss_with_id(id).map(|b| b.pos) else {
        return;
    };
    effects::spawn(
        state,
        EffectKind::AreaCharge {
            radius: AREA_ATTACK_RADIUS,
        },
        Vec3::new(pos.x, 0.1, pos.z),
        AREA_CHARGE_MS,
    );
    timers::schedule(state, AREA_CHARGE_MS, TaskAction::AreaStrike { boss: id });
}

/// Charged area attack going off around the boss
pub fn resolve_area_strike(state: &mut GameState, id: EntityId) {
    let Some(boss) = state.registry.boss_with_id(id) else {
        return;
    };
    let (pos, amount) = (boss.pos, boss.attack_damage * AREA_DAMAGE_FACTOR);

    if pos.distance(state.player.pos) < AREA_ATTACK_RADIUS {
        damage::apply_damage(state, amount);
        effects::shake(state, 0.5, 500.0);
        if state.progress.game_over {
            return;
        }
    }
    damage::explode(state, pos, AREA_ATTACK_RADIUS, ExplosionSource::Boss);
    state.emit(GameEvent::Sound(SoundEffect::Death));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level;

    fn boss_level() -> GameState {
        let mut state = GameState::new(21);
        level::start_next_level(&mut state);
        level::start_next_level(&mut state);
        state
    }

    fn boss(state: &GameState) -> &Boss {
        state.registry.boss.as_ref().unwrap()
    }

    fn place_player(state: &mut GameState, dz: f32) {
        let pos = boss(state).pos;
        state.player.pos = Vec3::new(pos.x, EYE_HEIGHT, pos.z + dz);
    }

    #[test]
    fn test_leap_arc_points() {
        let start = Vec3::ZERO;
        let target = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(leap_arc(start, target, 15.0, 0.5), Vec3::new(5.0, 15.0, 0.0));
        assert_eq!(leap_arc(start, target, 15.0, 0.0).y, 0.0);
        assert_eq!(leap_arc(start, target, 15.0, 1.0), target);
    }

    #[test]
    fn test_spawn_boss() {
        let state = boss_level();
        let b = boss(&state);
        assert_eq!(b.pos, Vec3::new(0.0, BOSS_GROUND_HEIGHT, BOSS_SPAWN_Z));
        assert_eq!(b.health, 1000.0);
        assert_eq!(b.state, BossState::Chase);
    }

    #[test]
    fn test_far_player_keeps_chase() {
        let mut state = boss_level();
        update(&mut state);
        assert_eq!(boss(&state).state, BossState::Chase);
        assert!(boss(&state).last_used.ranged.is_none());
    }

    #[test]
    fn test_ranged_burst() {
        let mut state = boss_level();
        place_player(&mut state, 10.0);
        update(&mut state);
        assert_eq!(boss(&state).state, BossState::Ranged);
        assert_eq!(boss(&state).last_used.ranged, Some(0.0));
        assert!(state.effects.iter().any(|e| e.kind == EffectKind::RangedTelegraph));

        state.clock.set(1400.0);
        update(&mut state);
        assert!(state.tasks.is_empty());

        state.clock.set(1501.0);
        update(&mut state);
        assert_eq!(boss(&state).state, BossState::Chase);
        let due: Vec<f64> = state.tasks.iter().map(|t| t.due_ms).collect();
        assert_eq!(due, vec![1501.0, 1801.0, 2101.0]);
    }

    #[test]
    fn test_thrown_shot_damage() {
        let mut state = boss_level();
        let id = boss(&state).id;
        fire_thrown(&mut state, id);
        let p = state.registry.projectiles.last().unwrap();
        assert!((p.damage - 14.0).abs() < 1e-4);
        assert!((p.vel.length() - THROWN_SPEED).abs() < 1e-5);
        assert!(p.vel.z > 0.0);
    }

    #[test]
    fn test_leap_lands_and_knocks_back() {
        let mut state = boss_level();
        place_player(&mut state, 10.0);
        boss_mut(&mut state).last_used.ranged = Some(0.0);
        let target = state.player.pos;

        update(&mut state);
        assert_eq!(boss(&state).state, BossState::Leap);
        assert!(boss(&state).in_leap());
        assert!(state.effects.iter().any(|e| e.kind == EffectKind::LeapTarget));

        for _ in 0..110 {
            if !boss(&state).in_leap() {
                break;
            }
            update(&mut state);
        }
        let b = boss(&state);
        assert!(!b.in_leap());
        assert_eq!(b.state, BossState::Chase);
        assert_eq!(b.pos, Vec3::new(target.x, BOSS_GROUND_HEIGHT, target.z));
        assert_eq!(state.player.health, MAX_HEALTH - 30.0);
        assert!((state.player.pos.z - (target.z + LEAP_KNOCKBACK)).abs() < 1e-4);
    }

    #[test]
    fn test_leap_peaks_midway() {
        let mut state = boss_level();
        place_player(&mut state, 10.0);
        boss_mut(&mut state).last_used.ranged = Some(0.0);
        update(&mut state);
        for _ in 0..50 {
            update(&mut state);
        }
        let b = boss(&state);
        assert!((b.pos.y - (BOSS_GROUND_HEIGHT + LEAP_PEAK_HEIGHT)).abs() < 0.05);
    }

    #[test]
    fn test_area_attack_charges_then_strikes() {
        let mut state = boss_level();
        place_player(&mut state, 4.0);
        {
            let b = boss_mut(&mut state);
            b.last_used.ranged = Some(0.0);
            b.last_used.leap = Some(0.0);
        }
        update(&mut state);
        assert_eq!(boss(&state).state, BossState::Area);
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.tasks[0].due_ms, AREA_CHARGE_MS);

        let id = boss(&state).id;
        resolve_area_strike(&mut state, id);
        assert!((state.player.health - (MAX_HEALTH - 24.0)).abs() < 1e-4);
        assert_eq!(state.camera_shake.unwrap().intensity, 0.5);
    }

    #[test]
    fn test_area_returns_to_chase_after_duration() {
        let mut state = boss_level();
        place_player(&mut state, 4.0);
        {
            let b = boss_mut(&mut state);
            b.last_used.ranged = Some(0.0);
            b.last_used.leap = Some(0.0);
        }
        update(&mut state);
        state.clock.set(BOSS_AREA_DURATION_MS + 1.0);
        update(&mut state);
        assert_eq!(boss(&state).state, BossState::Chase);
    }

    #[test]
    fn test_melee_without_transition() {
        let mut state = boss_level();
        place_player(&mut state, 3.0);
        {
            let b = boss_mut(&mut state);
            b.last_used.ranged = Some(0.0);
            b.last_used.leap = Some(0.0);
            b.last_used.area = Some(0.0);
        }
        update(&mut state);
        assert_eq!(boss(&state).state, BossState::Chase);
        assert_eq!(state.player.health, MAX_HEALTH - 20.0);
        update(&mut state);
        assert_eq!(state.player.health, MAX_HEALTH - 20.0);
    }

    #[test]
    fn test_stale_strike_is_ignored() {
        let mut state = boss_level();
        place_player(&mut state, 4.0);
        resolve_area_strike(&mut state, 9999);
        assert_eq!(state.player.health, MAX_HEALTH);
    }

    #[test]
    fn test_death_mid_leap() {
        let mut state = boss_level();
        place_player(&mut state, 10.0);
        boss_mut(&mut state).last_used.ranged = Some(0.0);
        update(&mut state);
        update(&mut state);
        damage::damage_boss(&mut state, 1000.0);
        assert!(state.registry.boss.is_none());
        assert!(state.registry.enemies.is_empty());
        assert!(state.progress.level_complete);
        update(&mut state);
        effects::update(&mut state);
        assert!(!state.effects.iter().any(|e| e.kind == EffectKind::LeapTarget));
    }

    fn boss_mut(state: &mut GameState) -> &mut Boss {
        state.registry.boss.as_mut().unwrap()
    }
}
