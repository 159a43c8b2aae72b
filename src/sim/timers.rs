//! Deferred work processed at a fixed point of each tick
//!
//! Delayed gameplay actions carry the ID of the entity they act for and are
//! dropped silently if that entity is gone by the time they come due.

use super::state::{EntityId, GameState};
use super::{boss, projectile};
use crate::consts::RAPID_FIRE_INTERVAL_MS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskAction {
    /// One throw of the boss ranged burst
    BossShot { boss: EntityId },
    /// Resolution of a charged boss area attack
    AreaStrike { boss: EntityId },
}

impl TaskAction {
    fn target(&self) -> EntityId {
        match *self {
            TaskAction::BossShot { boss } | TaskAction::AreaStrike { boss } => boss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    pub due_ms: f64,
    pub action: TaskAction,
}

/// Rapid-fire auto trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoFire {
    pub next_fire_ms: f64,
}

/// Queue `action` to run `delay_ms` from now
pub fn schedule(state: &mut GameState, delay_ms: f64, action: TaskAction) {
    let due_ms = state.now() + delay_ms;
    state.tasks.push(Task { due_ms, action });
}

/// Arm the auto trigger, replacing any previous one
pub fn start_rapid_fire(state: &mut GameState) {
    state.auto_fire = Some(AutoFire {
        next_fire_ms: state.now() + RAPID_FIRE_INTERVAL_MS,
    });
}

pub fn stop_rapid_fire(state: &mut GameState) {
    state.auto_fire = None;
}

/// Run the auto trigger and every task that has come due, oldest first
pub fn run_due(state: &mut GameState, pointer_locked: bool) {
    let now = state.now();

    if let Some(mut auto) = state.auto_fire {
        if now >= auto.next_fire_ms {
            if pointer_locked && !state.progress.game_over && !state.progress.level_complete {
                projectile::launch_player_projectile(state);
            }
            auto.next_fire_ms += RAPID_FIRE_INTERVAL_MS;
            if auto.next_fire_ms <= now {
                auto.next_fire_ms = now + RAPID_FIRE_INTERVAL_MS;
            }
            // The launch above never disarms the trigger
            if state.auto_fire.is_some() {
                state.auto_fire = Some(auto);
            }
        }
    }

    if state.tasks.is_empty() {
        return;
    }
    let (mut due, pending): (Vec<Task>, Vec<Task>) =
        state.tasks.drain(..).partition(|t| t.due_ms <= now);
    state.tasks = pending;
    due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));

    for task in due {
        if state.progress.game_over {
            break;
        }
        if state.registry.boss_with_id(task.action.target()).is_none() {
            log::debug!("Dropping {:?}: target gone", task.action);
            continue;
        }
        match task.action {
            TaskAction::BossShot { boss } => boss::fire_thrown(state, boss),
            TaskAction::AreaStrike { boss } => boss::resolve_area_strike(state, boss),
        }
    }
}
