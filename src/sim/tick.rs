//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session in a fixed subsystem order.

use glam::Vec3;

use super::movement::MoveIntent;
use super::state::GameState;
use super::{effects, enemy, level, movement, powerup, projectile, timers};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub movement: MoveIntent,
    /// New view direction (from mouse look)
    pub look_dir: Option<Vec3>,
    /// Fire the launcher (click)
    pub fire: bool,
    /// Pointer capture is active; the session is paused without it
    pub pointer_locked: bool,
    /// Start the next level once the current one is complete (space)
    pub advance_level: bool,
    /// Rebuild the session after game over
    pub restart: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    // Game over rejects everything except restart
    if state.is_terminal() {
        if input.restart {
            state.restart();
        }
        return;
    }

    if !input.pointer_locked {
        return;
    }

    state.clock.advance(dt);

    if let Some(look) = input.look_dir {
        if look.length_squared() > 1e-8 {
            state.player.look = look.normalize();
        }
    }

    if input.advance_level && state.progress.level_complete {
        level::start_next_level(state);
    }

    timers::run_due(state, input.pointer_locked);
    if state.is_terminal() {
        return;
    }

    if input.fire {
        projectile::launch_player_projectile(state);
    }

    movement::update(state, &input.movement, dt);

    projectile::update(state, dt);
    if state.is_terminal() {
        return;
    }

    enemy::update(state);
    if state.is_terminal() {
        return;
    }

    powerup::update(state);
    effects::update(state);
}

/// Demo AI: aim at the closest threat, keep firing, back off when crowded
fn autopilot(state: &GameState, input: &mut TickInput) {
    input.pointer_locked = true;
    if state.is_terminal() {
        input.restart = true;
        return;
    }
    if state.progress.level_complete {
        input.advance_level = true;
    }

    let eye = state.player.pos;
    let boss_target = state.registry.boss.as_ref().map(|b| b.pos + Vec3::Y * 2.0);
    let nearest_enemy = state
        .registry
        .enemies
        .iter()
        .map(|e| e.pos + Vec3::Y * 0.5)
        .min_by(|a, b| a.distance(eye).total_cmp(&b.distance(eye)));

    let Some(target) = nearest_enemy
        .filter(|p| p.distance(eye) < 10.0)
        .or(boss_target)
        .or(nearest_enemy)
    else {
        input.movement = MoveIntent::default();
        return;
    };

    input.look_dir = Some(target - eye);
    input.fire = true;

    // Alternate strafing every two seconds and retreat from close threats
    let strafe_right = (state.now() / 2000.0) as u64 % 2 == 0;
    let crowded = target.distance(eye) < 6.0;
    input.movement = MoveIntent {
        forward: false,
        backward: crowded,
        left: !strafe_right,
        right: strafe_right,
        sprint: crowded,
    };
}
