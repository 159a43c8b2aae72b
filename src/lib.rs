//! Nut Launcher - first-person arena shooter core
//!
//! Core modules:
//! - `sim`: Simulation core (movement, projectiles, enemy AI, boss, power-ups, progression)
//! - `tuning`: Data-driven level table
//! - `presentation`: One-way notification sink for UI/audio
//! - `driver`: Fixed timestep frame driver

pub mod driver;
pub mod presentation;
pub mod sim;
pub mod tuning;

pub use driver::FrameDriver;
pub use presentation::{LogPresentation, Presentation};
pub use tuning::{LevelDescriptor, LevelTable, TuningError};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one animation frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the driver will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions
    pub const WALL_DISTANCE: f32 = 29.0;
    pub const PLAYER_RADIUS: f32 = 1.0;
    pub const EYE_HEIGHT: f32 = 1.6;
    pub const PLAYER_START_Z: f32 = 5.0;
    /// Projectiles beyond this |x| or |z| are discarded
    pub const PROJECTILE_BOUND: f32 = 50.0;
    /// Projectiles below this height hit the ground
    pub const GROUND_HIT_HEIGHT: f32 = 0.1;

    /// Movement (speeds are per 1/60 s frame)
    pub const MOVE_SPEED: f32 = 0.1;
    pub const SPRINT_MULTIPLIER: f32 = 1.8;
    pub const FRAME_RATE_SCALE: f32 = 60.0;

    /// Stamina
    pub const MAX_STAMINA: f32 = 100.0;
    pub const STAMINA_DRAIN_RATE: f32 = 20.0;
    pub const STAMINA_REGEN_RATE: f32 = 10.0;
    pub const STAMINA_LOCKOUT_THRESHOLD: f32 = 10.0;

    /// Health
    pub const MAX_HEALTH: f32 = 100.0;
    pub const LEVEL_ADVANCE_HEAL: f32 = 30.0;
    pub const HEALTH_PICKUP_AMOUNT: f32 = 10.0;

    /// Player projectiles (per-tick units)
    pub const DEFAULT_FIRE_COOLDOWN: f32 = 0.5;
    pub const LAUNCH_FORWARD_OFFSET: f32 = 1.0;
    pub const LAUNCH_UPWARD_BOOST: f32 = 0.5;
    pub const PROJECTILE_GRAVITY: f32 = 0.1;
    pub const EXPLOSIVE_RADIUS: f32 = 5.0;
    pub const BOSS_DAMAGE_MULTIPLIER: f32 = 10.0;
    pub const EXPLOSION_BOSS_DAMAGE: f32 = 5.0;

    /// Thrown (enemy) projectiles
    pub const THROWN_SPEED: f32 = 0.5;
    pub const THROWN_LIFETIME: f32 = 5.0;
    pub const THROWN_HIT_RADIUS: f32 = 1.5;
    pub const THROWN_DAMAGE_FACTOR: f32 = 0.7;
    pub const THROWN_LAUNCH_HEIGHT: f32 = 2.0;
    pub const THROWN_JITTER: f32 = 0.1;

    /// Regular enemies
    pub const ENEMY_GROUND_HEIGHT: f32 = 0.225;
    pub const ENEMY_MELEE_RANGE: f32 = 2.0;
    pub const ENEMY_SEPARATION: f32 = 1.5;
    pub const ENEMY_MAX_SPEED: f32 = 0.12;
    pub const ENEMY_BOUND: f32 = 40.0;
    pub const ENEMY_HITBOX_MARGIN: f32 = 0.2;
    pub const ENEMY_JITTER: f32 = 0.3;
    pub const ENEMY_TURN_MIN_MS: f64 = 1000.0;
    pub const ENEMY_TURN_SPREAD_MS: f64 = 2000.0;
    pub const APPROACH_RANGE: f32 = 15.0;
    pub const MIN_APPROACH_DISTANCE: f32 = 5.0;
    pub const APPROACH_MULTIPLIER_CAP: f32 = 1.8;
    pub const KILL_SCORE: u64 = 10;

    /// Spawning
    pub const OPENING_ENEMY_CAP: u32 = 10;
    pub const OPENING_SPAWN_INTERVAL: f32 = 5.0;
    pub const INITIAL_WAVE_MAX: u32 = 10;
    pub const INITIAL_RING_RADIUS: f32 = 20.0;
    pub const WAVE_RING_MIN: f32 = 35.0;
    pub const WAVE_RING_SPREAD: f32 = 10.0;
    pub const MINION_RING_MIN: f32 = 20.0;
    pub const MINION_RING_SPREAD: f32 = 5.0;
    pub const SPAWN_ATTEMPTS: u32 = 8;

    /// Boss
    pub const BOSS_SCALE: f32 = 5.0;
    pub const BOSS_GROUND_HEIGHT: f32 = ENEMY_GROUND_HEIGHT * BOSS_SCALE;
    pub const BOSS_SPAWN_Z: f32 = -25.0;
    pub const BOSS_HITBOX_MARGIN: f32 = 0.6;
    pub const BOSS_BOUND: f32 = 25.0;
    pub const BOSS_TURN_INTERVAL_MS: f64 = 3000.0;
    pub const BOSS_JITTER: f32 = 0.5;
    pub const BOSS_ENGAGE_RANGE: f32 = 20.0;
    pub const BOSS_MELEE_COOLDOWN_MS: f64 = 3000.0;
    pub const BOSS_RANGED_COOLDOWN_MS: f64 = 5000.0;
    pub const BOSS_LEAP_COOLDOWN_MS: f64 = 12000.0;
    pub const BOSS_AREA_COOLDOWN_MS: f64 = 15000.0;
    pub const BOSS_RANGED_DURATION_MS: f64 = 5000.0;
    pub const BOSS_LEAP_DURATION_MS: f64 = 3000.0;
    pub const BOSS_AREA_DURATION_MS: f64 = 4000.0;
    pub const BOSS_MELEE_RANGE: f32 = 5.0;
    pub const BOSS_LEAP_MIN_DISTANCE: f32 = 8.0;
    pub const BOSS_AREA_MAX_DISTANCE: f32 = 10.0;
    pub const RANGED_TELEGRAPH_MS: f64 = 1500.0;
    pub const RANGED_BURST_COUNT: u32 = 3;
    pub const RANGED_BURST_STAGGER_MS: f64 = 300.0;
    pub const LEAP_PEAK_HEIGHT: f32 = 15.0;
    pub const LEAP_PROGRESS_PER_TICK: f32 = 0.01;
    pub const LEAP_LANDING_RADIUS: f32 = 7.0;
    pub const LEAP_DAMAGE_FACTOR: f32 = 1.5;
    pub const LEAP_KNOCKBACK: f32 = 10.0;
    pub const AREA_ATTACK_RADIUS: f32 = 8.0;
    pub const AREA_DAMAGE_FACTOR: f32 = 1.2;
    pub const AREA_CHARGE_MS: f64 = 3750.0;

    /// Power-ups
    pub const PICKUP_RADIUS: f32 = 2.0;
    pub const POWERUP_HEIGHT: f32 = 1.0;
    pub const POWERUP_FIELD: f32 = 25.0;
    pub const WEAPON_POWERUP_INTERVAL: f32 = 15.0;
    pub const HEALTH_POWERUP_INTERVAL: f32 = 25.0;
    pub const SHIELD_POWERUP_INTERVAL: f32 = 40.0;
    pub const WEAPON_EFFECT_MS: f64 = 15000.0;
    pub const SHIELD_DURATION_MS: f64 = 8000.0;
    pub const RAPID_FIRE_INTERVAL_MS: f64 = 150.0;
    pub const PULSE_STEP: f32 = 0.05;

    /// Progression
    pub const MAX_LEVEL: u32 = 5;
}

/// Length of the horizontal (XZ) component of a vector
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Horizontal unit vector at `angle` around the Y axis, on the XZ plane
#[inline]
pub fn ring_offset(angle: f32, distance: f32) -> Vec3 {
    Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Yaw so that a model facing +Z points along `dir`
#[inline]
pub fn facing_yaw(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}
