//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (registry insertion order)
//! - No rendering or platform dependencies

pub mod boss;
pub mod clock;
pub mod collision;
pub mod damage;
pub mod effects;
pub mod enemy;
pub mod events;
pub mod level;
pub mod movement;
pub mod powerup;
pub mod projectile;
pub mod registry;
pub mod state;
pub mod tick;
pub mod timers;

pub use boss::leap_arc;
pub use clock::Clock;
pub use collision::{Aabb, boss_hitbox, enemy_hitbox};
pub use damage::{ExplosionSource, apply_damage};
pub use effects::{CameraShake, Easing, Effect, EffectKind, Lifetime};
pub use events::{GameEvent, SoundEffect};
pub use movement::MoveIntent;
pub use registry::Registry;
pub use state::{
    Boss, BossState, Enemy, EntityId, GameState, Hud, Leap, Player, PowerUp, PowerUpKind,
    Progress, Projectile, ProjectileKind, WeaponKind,
};
pub use tick::{TickInput, tick};
pub use timers::{Task, TaskAction};
