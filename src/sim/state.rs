//! Game state and core simulation types
//!
//! `GameState` is the explicit simulation context: every subsystem function
//! takes it by `&mut` and nothing lives in globals.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::effects::{CameraShake, Effect};
use super::events::GameEvent;
use super::registry::Registry;
use super::timers::{AutoFire, Task};
use crate::consts::*;
use crate::tuning::LevelTable;

/// Stable identity of a registry entity
pub type EntityId = u32;

/// Projectile behavior profile of the player's launcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Normal,
    Explosive,
    Rapid,
}

impl WeaponKind {
    pub fn damage(&self) -> f32 {
        match self {
            WeaponKind::Normal => 1.0,
            WeaponKind::Explosive => 2.0,
            WeaponKind::Rapid => 0.5,
        }
    }

    /// Launch speed (units per tick)
    pub fn speed(&self) -> f32 {
        match self {
            WeaponKind::Normal => 3.0,
            WeaponKind::Explosive => 2.0,
            WeaponKind::Rapid => 5.0,
        }
    }

    /// Minimum seconds between launches
    pub fn cooldown(&self) -> f32 {
        match self {
            WeaponKind::Rapid => 0.1,
            _ => DEFAULT_FIRE_COOLDOWN,
        }
    }

    pub fn explosion_radius(&self) -> Option<f32> {
        match self {
            WeaponKind::Explosive => Some(EXPLOSIVE_RADIUS),
            _ => None,
        }
    }

    /// Display color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            WeaponKind::Normal => 0x8B4513,
            WeaponKind::Explosive => 0xFF0000,
            WeaponKind::Rapid => 0xFFFF00,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Normal => "normal",
            WeaponKind::Explosive => "explosive",
            WeaponKind::Rapid => "rapid",
        }
    }
}

/// The first-person player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Eye position
    pub pos: Vec3,
    /// Unit view direction
    pub look: Vec3,
    /// View-relative horizontal velocity of the last tick (x = strafe, z = forward)
    pub velocity: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub sprinting: bool,
    /// Sprint latch: cleared when stamina empties, set again above the lockout threshold
    pub can_sprint: bool,
    pub shielded: bool,
    pub shield_until: f64,
    pub weapon: WeaponKind,
    pub weapon_until: f64,
    pub last_fire: Option<f64>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::new(0.0, EYE_HEIGHT, PLAYER_START_Z),
            look: Vec3::NEG_Z,
            velocity: Vec3::ZERO,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            stamina: MAX_STAMINA,
            max_stamina: MAX_STAMINA,
            sprinting: false,
            can_sprint: true,
            shielded: false,
            shield_until: 0.0,
            weapon: WeaponKind::Normal,
            weapon_until: 0.0,
            last_fire: None,
        }
    }
}

impl Player {
    /// Horizontal forward direction derived from the view
    pub fn forward(&self) -> Vec3 {
        let flat = Vec3::new(self.look.x, 0.0, self.look.z);
        if flat.length_squared() < 1e-8 {
            Vec3::NEG_Z
        } else {
            flat.normalize()
        }
    }

    /// Horizontal right-hand direction derived from the view
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y)
    }
}

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Player launcher shot (ballistic)
    Player(WeaponKind),
    /// Boss throw (straight line, limited lifetime)
    Thrown { age: f32 },
}

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub pos: Vec3,
    /// Velocity (units per tick)
    pub vel: Vec3,
    pub damage: f32,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec3>,
}

impl Projectile {
    pub fn is_player(&self) -> bool {
        matches!(self.kind, ProjectileKind::Player(_))
    }

    /// Record current position to trail
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }
}

/// A regular enemy or a boss-level minion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec3,
    /// Yaw (radians)
    pub facing: f32,
    /// Steering direction (unit, horizontal)
    pub direction: Vec3,
    /// Base speed (units per tick)
    pub speed: f32,
    pub last_attack: Option<f64>,
    pub last_turn: f64,
    pub turn_interval: f64,
    pub minion: bool,
}

/// Boss behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossState {
    Chase,
    Ranged,
    Leap,
    Area,
}

impl BossState {
    /// How long an attack state lasts before falling back to chase
    pub fn duration_ms(&self) -> Option<f64> {
        match self {
            BossState::Chase => None,
            BossState::Ranged => Some(BOSS_RANGED_DURATION_MS),
            BossState::Leap => Some(BOSS_LEAP_DURATION_MS),
            BossState::Area => Some(BOSS_AREA_DURATION_MS),
        }
    }
}

/// Transient leap attack data; present exactly while the boss is airborne
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leap {
    pub start: Vec3,
    /// Player position captured at takeoff
    pub target: Vec3,
    /// 0..=1
    pub progress: f32,
    pub peak_height: f32,
}

/// Last-use stamps per attack kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackStamps {
    pub melee: Option<f64>,
    pub ranged: Option<f64>,
    pub leap: Option<f64>,
    pub area: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: EntityId,
    pub pos: Vec3,
    pub facing: f32,
    pub direction: Vec3,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub attack_damage: f32,
    pub state: BossState,
    pub state_entered: f64,
    pub last_used: AttackStamps,
    pub last_turn: f64,
    pub turn_interval: f64,
    pub leap: Option<Leap>,
}

impl Boss {
    pub fn in_leap(&self) -> bool {
        self.leap.is_some()
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Weapon(WeaponKind),
    Health,
    Shield,
}

/// A pickup lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub pos: Vec3,
    /// Cosmetic pulse animation phase
    pub pulse_phase: f32,
}

impl PowerUp {
    /// Cosmetic scale derived from the pulse phase
    pub fn pulse_scale(&self) -> f32 {
        1.0 + 0.1 * self.pulse_phase.sin()
    }
}

/// Level and score bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub level: u32,
    pub score: u64,
    pub level_score: u64,
    pub level_complete: bool,
    pub game_over: bool,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            level: 1,
            score: 0,
            level_score: 0,
            level_complete: false,
            game_over: false,
        }
    }
}

/// Last-spawn stamps for the periodic spawners (ms)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub wave: f64,
    pub minion: f64,
    pub weapon_powerup: f64,
    pub health_powerup: f64,
    pub shield_powerup: f64,
}

/// HUD snapshot for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    /// Level score as a percentage of the level threshold (0 on the boss level)
    pub level_progress: f32,
    pub health: f32,
    pub max_health: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub weapon: WeaponKind,
    /// Whole seconds left on a weapon power-up
    pub weapon_seconds_left: Option<u32>,
    pub shielded: bool,
    pub boss_health: Option<(f32, f32)>,
    pub level_complete: bool,
    pub game_over: bool,
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub clock: Clock,
    pub levels: LevelTable,
    pub progress: Progress,
    pub player: Player,
    pub registry: Registry,
    /// Live regular-enemy cap for wave spawning (0 disables waves)
    pub enemy_cap: u32,
    /// Seconds between waves
    pub spawn_interval: f32,
    pub spawn_timers: SpawnTimers,
    /// Rapid-fire auto trigger, present only while the rapid weapon is active
    pub auto_fire: Option<AutoFire>,
    /// Deferred gameplay actions (staggered shots, charged attacks)
    pub tasks: Vec<Task>,
    /// Visual effects (not gameplay-affecting)
    pub effects: Vec<Effect>,
    pub camera_shake: Option<CameraShake>,
    /// Notifications produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the stock level table
    pub fn new(seed: u64) -> Self {
        Self::with_levels(seed, LevelTable::default())
    }

    /// Create a new session using a custom level table
    pub fn with_levels(seed: u64, levels: LevelTable) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock: Clock::new(),
            levels,
            progress: Progress::default(),
            player: Player::default(),
            registry: Registry::default(),
            enemy_cap: OPENING_ENEMY_CAP,
            spawn_interval: OPENING_SPAWN_INTERVAL,
            spawn_timers: SpawnTimers::default(),
            auto_fire: None,
            tasks: Vec::new(),
            effects: Vec::new(),
            camera_shake: None,
            events: Vec::new(),
        };

        super::level::setup_level(&mut state);
        log::info!("Session started (seed {})", seed);

        state
    }

    /// Rebuild the session after game over, keeping the level table
    pub fn restart(&mut self) {
        let seed = self.seed.wrapping_add(1);
        let levels = std::mem::take(&mut self.levels.levels);
        *self = Self::with_levels(seed, LevelTable { levels });
        self.events.push(GameEvent::Restarted);
    }

    /// Queue a presentation notification
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all notifications produced so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn is_boss_level(&self) -> bool {
        self.levels.is_boss_level(self.progress.level)
    }

    /// Whether gameplay actions are currently rejected
    pub fn is_terminal(&self) -> bool {
        self.progress.game_over
    }

    pub fn hud(&self) -> Hud {
        let level = self.levels.get(self.progress.level);
        let level_progress = if level.score_to_next > 0 {
            self.progress.level_score as f32 / level.score_to_next as f32 * 100.0
        } else {
            0.0
        };
        let weapon_seconds_left = (self.player.weapon != WeaponKind::Normal).then(|| {
            ((self.player.weapon_until - self.now()).max(0.0) / 1000.0).floor() as u32
        });
        Hud {
            score: self.progress.score,
            level: self.progress.level,
            level_progress,
            health: self.player.health,
            max_health: self.player.max_health,
            stamina: self.player.stamina,
            max_stamina: self.player.max_stamina,
            weapon: self.player.weapon,
            weapon_seconds_left,
            shielded: self.player.shielded,
            boss_health: self
                .registry
                .boss
                .as_ref()
                .map(|b| (b.health, b.max_health)),
            level_complete: self.progress.level_complete,
            game_over: self.progress.game_over,
        }
    }
}
