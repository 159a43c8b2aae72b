//! One-way notifications from the core to presentation (UI/audio)

use serde::Serialize;

use super::state::{PowerUpKind, WeaponKind};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundEffect {
    /// Projectile launched (player or boss)
    Launch,
    /// Something took a hit, or a pickup was collected
    Hit,
    /// Enemy or boss died, big boss attack landed
    Death,
    /// A wave spawned
    Movement,
    /// Level threshold reached
    LevelComplete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    ScoreChanged { score: u64, level_score: u64 },
    LevelChanged { level: u32 },
    HealthChanged { health: f32, max: f32 },
    StaminaChanged { stamina: f32, max: f32 },
    WeaponChanged { weapon: WeaponKind, expires_at: Option<f64> },
    ShieldChanged { active: bool },
    PowerUpCollected { kind: PowerUpKind },
    LevelTransition { message: String },
    BossHealthChanged { health: f32, max: f32 },
    BossDefeated,
    LevelComplete { level: u32, final_level: bool },
    GameOver { final_score: u64 },
    Restarted,
    Sound(SoundEffect),
}

impl PowerUpKind {
    /// Notification text for a collected power-up
    pub fn notification(&self) -> String {
        match self {
            PowerUpKind::Weapon(WeaponKind::Explosive) => "EXPLOSIVE NUTS: Area damage!".into(),
            PowerUpKind::Weapon(WeaponKind::Rapid) => "RAPID FIRE: Auto-shooting!".into(),
            PowerUpKind::Weapon(WeaponKind::Normal) => "NORMAL NUTS".into(),
            PowerUpKind::Health => format!(
                "HEALTH BOOST: +{} HP!",
                crate::consts::HEALTH_PICKUP_AMOUNT as u32
            ),
            PowerUpKind::Shield => format!(
                "SHIELD ACTIVATED: Invincible for {} seconds!",
                (crate::consts::SHIELD_DURATION_MS / 1000.0) as u32
            ),
        }
    }
}
