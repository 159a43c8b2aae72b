//! Player launcher shots and boss throws

use glam::Vec3;

use super::collision::{boss_hitbox, enemy_hitbox};
use super::damage::{self, ExplosionSource};
use super::effects;
use super::events::{GameEvent, SoundEffect};
use super::state::{GameState, Projectile, ProjectileKind, WeaponKind};
use crate::consts::*;

/// Fire the current weapon along the view direction. Silently ignored while
/// the weapon is cooling down.
pub fn launch_player_projectile(state: &mut GameState) {
    if state.is_terminal() {
        return;
    }
    let weapon = state.player.weapon;
    let cooldown_ms = f64::from(weapon.cooldown()) * 1000.0;
    if !state.clock.ready(state.player.last_fire, cooldown_ms) {
        return;
    }

    let dir = state.player.look.normalize_or(Vec3::NEG_Z);
    let pos = state.player.pos + dir * LAUNCH_FORWARD_OFFSET;
    let vel = dir * weapon.speed() + Vec3::Y * LAUNCH_UPWARD_BOOST;

    let id = state.registry.next_entity_id();
    state.registry.projectiles.push(Projectile {
        id,
        kind: ProjectileKind::Player(weapon),
        pos,
        vel,
        damage: weapon.damage(),
        trail: Vec::new(),
    });
    state.player.last_fire = Some(state.now());
    state.emit(GameEvent::Sound(SoundEffect::Launch));
}

/// Spawn a boss throw travelling along `dir` at the fixed throw speed
pub fn spawn_thrown(state: &mut GameState, origin: Vec3, dir: Vec3, damage: f32) {
    let id = state.registry.next_entity_id();
    state.registry.projectiles.push(Projectile {
        id,
        kind: ProjectileKind::Thrown { age: 0.0 },
        pos: origin,
        vel: dir.normalize_or_zero() * THROWN_SPEED,
        damage,
        trail: Vec::new(),
    });
}

fn out_of_play(pos: Vec3) -> bool {
    pos.y < GROUND_HIT_HEIGHT || pos.x.abs() > PROJECTILE_BOUND || pos.z.abs() > PROJECTILE_BOUND
}

/// Resolve a player shot against the boss, then the enemies. Returns true on a hit.
fn resolve_player_hit(state: &mut GameState, pos: Vec3, weapon: WeaponKind, amount: f32) -> bool {
    let boss_hit = state
        .registry
        .boss
        .as_ref()
        .is_some_and(|b| boss_hitbox(b.pos, b.facing).contains(pos));
    if boss_hit {
        state.emit(GameEvent::Sound(SoundEffect::Hit));
        damage::damage_boss(state, amount * BOSS_DAMAGE_MULTIPLIER);
        if let Some(radius) = weapon.explosion_radius() {
            damage::explode(state, pos, radius, ExplosionSource::Player);
        }
        return true;
    }

    // First enemy in insertion order wins
    let target = state
        .registry
        .enemies
        .iter()
        .find(|e| enemy_hitbox(e.pos, e.facing).contains(pos))
        .map(|e| e.id);
    let Some(id) = target else {
        return false;
    };
    state.emit(GameEvent::Sound(SoundEffect::Hit));
    match weapon.explosion_radius() {
        Some(radius) => damage::explode(state, pos, radius, ExplosionSource::Player),
        None => {
            damage::kill_enemy(state, id);
        }
    }
    true
}

/// Advance every live projectile by one tick, newest first
pub fn update(state: &mut GameState, dt: f32) {
    let mut i = state.registry.projectiles.len();
    while i > 0 {
        i -= 1;
        if state.progress.game_over {
            return;
        }

        let proj = &mut state.registry.projectiles[i];
        proj.pos += proj.vel;

        match proj.kind {
            ProjectileKind::Thrown { age } => {
                let age = age + dt;
                proj.kind = ProjectileKind::Thrown { age };
                if age > THROWN_LIFETIME {
                    state.registry.projectiles.remove(i);
                    continue;
                }
                if proj.pos.distance(state.player.pos) < THROWN_HIT_RADIUS {
                    let amount = proj.damage;
                    state.registry.projectiles.remove(i);
                    if !state.player.shielded {
                        damage::apply_damage(state, amount);
                        state.emit(GameEvent::Sound(SoundEffect::Hit));
                        effects::shake(state, 0.2, 200.0);
                    }
                    continue;
                }
            }
            ProjectileKind::Player(weapon) => {
                proj.vel.y -= PROJECTILE_GRAVITY;
                proj.record_trail();
                let (pos, amount) = (proj.pos, proj.damage);
                if resolve_player_hit(state, pos, weapon, amount) {
                    state.registry.projectiles.remove(i);
                    continue;
                }
            }
        }

        if out_of_play(state.registry.projectiles[i].pos) {
            state.registry.projectiles.remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level;

    fn shot(state: &mut GameState, pos: Vec3, weapon: WeaponKind) {
        let id = state.registry.next_entity_id();
        state.registry.projectiles.push(Projectile {
            id,
            kind: ProjectileKind::Player(weapon),
            pos,
            vel: Vec3::ZERO,
            damage: weapon.damage(),
            trail: Vec::new(),
        });
    }

    #[test]
    fn test_launch_respects_cooldown() {
        let mut state = GameState::new(1);
        launch_player_projectile(&mut state);
        launch_player_projectile(&mut state);
        assert_eq!(state.registry.projectiles.len(), 1);

        state.clock.set(501.0);
        launch_player_projectile(&mut state);
        assert_eq!(state.registry.projectiles.len(), 2);
    }

    #[test]
    fn test_launch_geometry() {
        let mut state = GameState::new(1);
        launch_player_projectile(&mut state);
        let p = &state.registry.projectiles[0];
        assert!((p.pos - Vec3::new(0.0, EYE_HEIGHT, PLAYER_START_Z - 1.0)).length() < 1e-5);
        assert!((p.vel - Vec3::new(0.0, 0.5, -3.0)).length() < 1e-5);
        assert!(state.events.contains(&GameEvent::Sound(SoundEffect::Launch)));
    }

    #[test]
    fn test_gravity_and_trail() {
        let mut state = GameState::new(1);
        state.registry.enemies.clear();
        launch_player_projectile(&mut state);
        update(&mut state, SIM_DT);
        let p = &state.registry.projectiles[0];
        assert!((p.vel.y - 0.4).abs() < 1e-5);
        assert_eq!(p.trail.len(), 1);
    }

    #[test]
    fn test_normal_shot_kills_enemy() {
        let mut state = GameState::new(1);
        let target = state.registry.enemies[0].pos + Vec3::Y * 0.5;
        shot(&mut state, target, WeaponKind::Normal);
        update(&mut state, SIM_DT);
        assert!(state.registry.projectiles.is_empty());
        assert_eq!(state.registry.enemies.len(), 9);
        assert_eq!(state.progress.score, KILL_SCORE);
    }

    #[test]
    fn test_explosive_shot_chips_boss_twice() {
        let mut state = GameState::new(1);
        level::start_next_level(&mut state);
        level::start_next_level(&mut state);
        let boss_pos = state.registry.boss.as_ref().unwrap().pos;
        shot(&mut state, boss_pos + Vec3::Y * 2.0, WeaponKind::Explosive);
        update(&mut state, SIM_DT);
        let boss = state.registry.boss.as_ref().unwrap();
        assert_eq!(boss.health, 1000.0 - 20.0 - EXPLOSION_BOSS_DAMAGE);
        assert!(state.registry.projectiles.is_empty());
    }

    #[test]
    fn test_thrown_hits_player() {
        let mut state = GameState::new(1);
        let origin = state.player.pos + Vec3::Z;
        spawn_thrown(&mut state, origin, Vec3::NEG_Z, 14.0);
        update(&mut state, SIM_DT);
        assert!(state.registry.projectiles.is_empty());
        assert_eq!(state.player.health, MAX_HEALTH - 14.0);
        assert!(state.camera_shake.is_some());
    }

    #[test]
    fn test_shielded_thrown_is_still_consumed() {
        let mut state = GameState::new(1);
        state.player.shielded = true;
        let origin = state.player.pos + Vec3::Z;
        spawn_thrown(&mut state, origin, Vec3::NEG_Z, 14.0);
        update(&mut state, SIM_DT);
        assert!(state.registry.projectiles.is_empty());
        assert_eq!(state.player.health, MAX_HEALTH);
    }

    #[test]
    fn test_thrown_expires() {
        let mut state = GameState::new(1);
        spawn_thrown(&mut state, Vec3::new(0.0, 5.0, -20.0), Vec3::X, 14.0);
        state.registry.projectiles[0].kind = ProjectileKind::Thrown { age: THROWN_LIFETIME };
        update(&mut state, SIM_DT);
        assert!(state.registry.projectiles.is_empty());
    }

    #[test]
    fn test_ground_and_bounds_removal() {
        let mut state = GameState::new(1);
        state.registry.enemies.clear();
        shot(&mut state, Vec3::new(0.0, 0.15, -20.0), WeaponKind::Normal);
        shot(&mut state, Vec3::new(51.0, 5.0, 0.0), WeaponKind::Normal);
        update(&mut state, SIM_DT);
        assert_eq!(state.registry.projectiles.len(), 1);
        update(&mut state, SIM_DT);
        assert!(state.registry.projectiles.is_empty());
    }
}
