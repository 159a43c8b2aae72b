//! Scoring, level completion and level transitions

use super::events::{GameEvent, SoundEffect};
use super::state::GameState;
use super::{boss, damage, enemy};
use crate::consts::*;

/// Spawn the opening population of the current level
pub fn setup_level(state: &mut GameState) {
    let level = state.progress.level;
    if state.is_boss_level() {
        boss::spawn_boss(state);
        let minions = state
            .levels
            .get(level)
            .boss
            .as_ref()
            .map_or(0, |b| b.minion_count);
        for _ in 0..minions {
            enemy::spawn_minion(state);
        }
        state.spawn_timers.minion = state.now();
    } else {
        enemy::spawn_initial_wave(state);
    }
    log::info!(
        "Level {} ready: {} enemies, boss: {}",
        level,
        state.registry.enemies.len(),
        state.registry.boss.is_some()
    );
    state.emit(GameEvent::LevelChanged { level });
}

/// Score a regular kill. Kills on the boss level do not score.
pub fn award_kill(state: &mut GameState) {
    if state.is_boss_level() {
        return;
    }
    let progress = &mut state.progress;
    progress.score += KILL_SCORE;
    progress.level_score += KILL_SCORE;
    let (score, level_score) = (progress.score, progress.level_score);
    state.emit(GameEvent::ScoreChanged { score, level_score });

    let threshold = state.levels.get(state.progress.level).score_to_next;
    if level_score >= threshold && !state.progress.level_complete {
        state.emit(GameEvent::Sound(SoundEffect::LevelComplete));
        complete_level(state);
    }
}

/// Flag the current level as complete
pub fn complete_level(state: &mut GameState) {
    if state.progress.level_complete {
        return;
    }
    state.progress.level_complete = true;
    let level = state.progress.level;
    let final_level = level >= state.levels.max_level();
    log::info!("Level {} complete (final: {})", level, final_level);
    state.emit(GameEvent::LevelComplete { level, final_level });
}

/// Message shown when entering `level`
pub fn transition_message(state: &GameState, level: u32) -> String {
    if state.levels.is_boss_level(level) {
        "Boss Level: The Lair of the Squirrel King".into()
    } else if level > 1 && state.levels.is_boss_level(level - 1) {
        "You've defeated the Squirrel King! Return to the forest...".into()
    } else if level == state.levels.max_level() {
        "Final Level: The Ultimate Challenge".into()
    } else if level == 2 {
        "Level 2: More squirrels await...".into()
    } else {
        format!("Level {}", level)
    }
}

/// Advance to the next level. No-op past the final level or after game over.
pub fn start_next_level(state: &mut GameState) {
    if state.progress.game_over || state.progress.level >= state.levels.max_level() {
        return;
    }

    state.progress.level += 1;
    state.progress.level_score = 0;
    state.progress.level_complete = false;
    let level = state.progress.level;

    damage::heal(state, LEVEL_ADVANCE_HEAL);

    let descriptor = state.levels.get(level);
    state.enemy_cap = descriptor.enemy_count;
    state.spawn_interval = descriptor.spawn_interval;

    state.registry.clear_hostiles();
    state.tasks.clear();

    let message = transition_message(state, level);
    log::info!("Entering level {}: {}", level, message);
    state.emit(GameEvent::LevelTransition { message });

    setup_level(state);

    let (score, level_score) = (state.progress.score, state.progress.level_score);
    state.emit(GameEvent::ScoreChanged { score, level_score });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenth_kill_completes_level_one() {
        let mut state = GameState::new(5);
        for _ in 0..9 {
            award_kill(&mut state);
        }
        assert!(!state.progress.level_complete);
        award_kill(&mut state);
        assert!(state.progress.level_complete);
        assert_eq!(state.progress.score, 100);
    }

    #[test]
    fn test_advance_resets_and_heals() {
        let mut state = GameState::new(5);
        state.player.health = 50.0;
        state.progress.level_score = 100;
        state.progress.level_complete = true;
        start_next_level(&mut state);
        assert_eq!(state.progress.level, 2);
        assert_eq!(state.progress.level_score, 0);
        assert!(!state.progress.level_complete);
        assert_eq!(state.player.health, 80.0);
        assert_eq!(state.enemy_cap, 30);
        assert_eq!(state.spawn_interval, 1.5);
    }

    #[test]
    fn test_boss_level_setup_and_no_score() {
        let mut state = GameState::new(5);
        start_next_level(&mut state);
        start_next_level(&mut state);
        assert_eq!(state.progress.level, 3);
        assert!(state.registry.boss.is_some());
        assert_eq!(state.registry.minion_count(), 5);
        assert_eq!(state.enemy_cap, 0);

        let score = state.progress.score;
        award_kill(&mut state);
        assert_eq!(state.progress.score, score);
    }

    #[test]
    fn test_no_advance_past_final_level() {
        let mut state = GameState::new(5);
        for _ in 0..10 {
            start_next_level(&mut state);
        }
        assert_eq!(state.progress.level, MAX_LEVEL);
        assert!(state.registry.boss.is_none());
    }

    #[test]
    fn test_transition_messages() {
        let state = GameState::new(5);
        assert_eq!(transition_message(&state, 2), "Level 2: More squirrels await...");
        assert_eq!(transition_message(&state, 3), "Boss Level: The Lair of the Squirrel King");
        assert_eq!(
            transition_message(&state, 4),
            "You've defeated the Squirrel King! Return to the forest..."
        );
        assert_eq!(transition_message(&state, 5), "Final Level: The Ultimate Challenge");
    }
}
