//! Player movement and stamina
//!
//! Movement is relative to the view direction. Sprinting is gated by a
//! two-state latch: emptying the stamina pool locks sprint out until stamina
//! climbs back above `STAMINA_LOCKOUT_THRESHOLD`.

use glam::Vec3;

use super::events::GameEvent;
use super::state::{GameState, Player};
use crate::consts::*;

/// Held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
}

impl MoveIntent {
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Normalized view-relative input (x = strafe right, z = forward)
    pub fn direction(&self) -> Vec3 {
        let x = self.right as i32 - self.left as i32;
        let z = self.forward as i32 - self.backward as i32;
        Vec3::new(x as f32, 0.0, z as f32).normalize_or_zero()
    }
}

/// Drain or regenerate stamina and maintain the sprint latch
pub fn update_stamina(player: &mut Player, moving: bool, dt: f32) {
    if player.sprinting && moving {
        player.stamina = (player.stamina - STAMINA_DRAIN_RATE * dt).max(0.0);
        if player.stamina <= 0.0 {
            player.sprinting = false;
            player.can_sprint = false;
        }
    } else {
        player.stamina = (player.stamina + STAMINA_REGEN_RATE * dt).min(player.max_stamina);
        if !player.can_sprint && player.stamina > STAMINA_LOCKOUT_THRESHOLD {
            player.can_sprint = true;
        }
    }
}

/// Apply the sprint key to the latch
pub fn apply_sprint_intent(player: &mut Player, sprint_held: bool) {
    if sprint_held {
        if player.can_sprint && player.stamina > 0.0 {
            player.sprinting = true;
        }
    } else {
        player.sprinting = false;
    }
}

/// Move `pos` by `displacement`, rejecting each axis that would cross the wall
/// bound and pulling the player back onto the bound if already past it
pub fn contain_move(pos: &mut Vec3, displacement: Vec3) {
    let bound = WALL_DISTANCE - PLAYER_RADIUS;
    let candidate = *pos + displacement;

    if candidate.x.abs() > bound {
        if pos.x.abs() > bound {
            pos.x = pos.x.signum() * bound;
        }
    } else {
        pos.x = candidate.x;
    }

    if candidate.z.abs() > bound {
        if pos.z.abs() > bound {
            pos.z = pos.z.signum() * bound;
        }
    } else {
        pos.z = candidate.z;
    }
}

/// Clamp a position straight onto the walkable area
pub fn clamp_to_arena(pos: &mut Vec3) {
    let bound = WALL_DISTANCE - PLAYER_RADIUS;
    pos.x = pos.x.clamp(-bound, bound);
    pos.z = pos.z.clamp(-bound, bound);
}

/// Advance the player by one tick
pub fn update(state: &mut GameState, intent: &MoveIntent, dt: f32) {
    let stamina_before = state.player.stamina;
    let player = &mut state.player;

    apply_sprint_intent(player, intent.sprint);
    update_stamina(player, intent.is_moving(), dt);

    let mut speed = MOVE_SPEED;
    if player.sprinting && player.stamina > 0.0 {
        speed *= SPRINT_MULTIPLIER;
    }

    let dir = intent.direction();
    player.velocity = Vec3::new(
        if intent.left || intent.right { dir.x * speed } else { 0.0 },
        0.0,
        if intent.forward || intent.backward { dir.z * speed } else { 0.0 },
    );

    let move_amount = dt * FRAME_RATE_SCALE;
    let displacement = player.right() * (player.velocity.x * move_amount)
        + player.forward() * (player.velocity.z * move_amount);
    let mut pos = player.pos;
    contain_move(&mut pos, displacement);
    pos.y = EYE_HEIGHT;
    player.pos = pos;

    if player.stamina != stamina_before {
        let (stamina, max) = (player.stamina, player.max_stamina);
        state.emit(GameEvent::StaminaChanged { stamina, max });
    }
}
