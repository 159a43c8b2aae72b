//! Presentation boundary
//!
//! The core only ever pushes notifications outward. A presentation layer
//! (HUD, audio, a log) implements `Presentation` and never feeds back.

use crate::sim::{GameEvent, Hud, SoundEffect};

/// Sink for one-way notifications from the simulation
pub trait Presentation {
    /// Handle a single notification
    fn notify(&mut self, event: &GameEvent);

    /// Refresh any continuously displayed values
    fn sync_hud(&mut self, _hud: &Hud) {}
}

/// Collects events, mostly useful for tests and replays
impl Presentation for Vec<GameEvent> {
    fn notify(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Writes notifications to the `log` facade
#[derive(Debug, Default)]
pub struct LogPresentation {
    /// Sound cues seen so far (logged at trace level)
    pub sounds_played: u64,
    last_hud: Option<Hud>,
}

impl LogPresentation {
    pub fn last_hud(&self) -> Option<&Hud> {
        self.last_hud.as_ref()
    }
}

impl Presentation for LogPresentation {
    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Sound(sound) => {
                self.sounds_played += 1;
                log::trace!("sound: {:?}", sound);
                if *sound == SoundEffect::LevelComplete {
                    log::info!("Level threshold reached");
                }
            }
            GameEvent::PowerUpCollected { kind } => log::info!("{}", kind.notification()),
            GameEvent::LevelTransition { message } => log::info!("{}", message),
            GameEvent::LevelComplete { level, final_level } => {
                if *final_level {
                    log::info!("Level {} complete - that was the final level!", level);
                } else {
                    log::info!("Level {} complete - advance when ready", level);
                }
            }
            GameEvent::GameOver { final_score } => log::info!("GAME OVER - final score {}", final_score),
            GameEvent::BossDefeated => log::info!("The Squirrel King has fallen"),
            GameEvent::Restarted => log::info!("New game"),
            other => log::debug!("{:?}", other),
        }
    }

    fn sync_hud(&mut self, hud: &Hud) {
        self.last_hud = Some(hud.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    #[test]
    fn test_vec_collects_events() {
        let mut sink: Vec<GameEvent> = Vec::new();
        sink.notify(&GameEvent::BossDefeated);
        assert_eq!(sink, vec![GameEvent::BossDefeated]);
    }

    #[test]
    fn test_log_presentation_tracks_hud() {
        let state = GameState::new(4);
        let mut log = LogPresentation::default();
        log.notify(&GameEvent::Sound(SoundEffect::Launch));
        log.sync_hud(&state.hud());
        assert_eq!(log.sounds_played, 1);
        assert_eq!(log.last_hud().map(|h| h.level), Some(1));
    }
}
