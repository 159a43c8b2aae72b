//! Visual effect records
//!
//! Each effect is plain state (start, duration, easing) advanced by the tick
//! and read by the renderer. Effects never feed back into gameplay.

use glam::Vec3;

use super::state::{EntityId, GameState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// Quadratic ease-out
    EaseOut,
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    /// Expanding fireball
    Explosion { radius: f32 },
    /// Quick flash where an attack originates
    AttackFlash { color: u32, size: f32 },
    /// Glow around the boss before a ranged burst
    RangedTelegraph,
    /// Ring marking where the boss will land
    LeapTarget,
    /// Puff left behind by the airborne boss
    LeapTrail,
    /// Growing ring while the area attack charges
    AreaCharge { radius: f32 },
    /// Scatter of particles where an enemy died
    DeathBurst,
}

/// When an effect ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifetime {
    For { duration_ms: f64 },
    /// Lives while the given boss is mid-leap
    WhileLeaping(EntityId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec3,
    pub started_ms: f64,
    pub lifetime: Lifetime,
    pub easing: Easing,
    /// Peak opacity at the start of the effect
    pub opacity: f32,
}

impl Effect {
    pub fn timed(kind: EffectKind, pos: Vec3, now: f64, duration_ms: f64) -> Self {
        let opacity = match kind {
            EffectKind::RangedTelegraph => 0.3,
            EffectKind::LeapTarget => 0.5,
            _ => 0.7,
        };
        Self {
            kind,
            pos,
            started_ms: now,
            lifetime: Lifetime::For { duration_ms },
            easing: Easing::Linear,
            opacity,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Eased progress in 0..=1 (always 0 for entity-bound effects)
    pub fn progress(&self, now: f64) -> f32 {
        match self.lifetime {
            Lifetime::For { duration_ms } if duration_ms > 0.0 => {
                self.easing
                    .apply(((now - self.started_ms) / duration_ms) as f32)
            }
            Lifetime::For { .. } => 1.0,
            Lifetime::WhileLeaping(_) => 0.0,
        }
    }

    /// Current opacity, fading out over the lifetime
    pub fn current_opacity(&self, now: f64) -> f32 {
        self.opacity * (1.0 - self.progress(now))
    }

    /// Current scale multiplier of the mesh
    pub fn current_scale(&self, now: f64) -> f32 {
        let elapsed_s = ((now - self.started_ms) / 1000.0).max(0.0) as f32;
        match self.kind {
            EffectKind::Explosion { .. } => 1.0 + 1.4 * self.progress(now),
            EffectKind::AttackFlash { .. } => 1.1f32.powf(elapsed_s * 20.0),
            EffectKind::RangedTelegraph => 1.0 + elapsed_s,
            EffectKind::LeapTarget => 1.0 + elapsed_s * 1.8,
            EffectKind::LeapTrail => 0.95f32.powf(elapsed_s * 20.0),
            EffectKind::AreaCharge { radius } => 1.0 + self.progress(now) * (radius * 2.0 - 1.0),
            EffectKind::DeathBurst => 1.0,
        }
    }

    fn finished(&self, state: &GameState) -> bool {
        match self.lifetime {
            Lifetime::For { duration_ms } => state.now() - self.started_ms >= duration_ms,
            Lifetime::WhileLeaping(id) => !state
                .registry
                .boss_with_id(id)
                .is_some_and(|b| b.in_leap()),
        }
    }
}

/// Cosmetic camera shake request; the simulated player never moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraShake {
    pub intensity: f32,
    pub started_ms: f64,
    pub duration_ms: f64,
}

impl CameraShake {
    pub fn active(&self, now: f64) -> bool {
        now - self.started_ms < self.duration_ms
    }
}

/// Spawn a timed effect
pub fn spawn(state: &mut GameState, kind: EffectKind, pos: Vec3, duration_ms: f64) {
    let now = state.now();
    let effect = Effect::timed(kind, pos, now, duration_ms);
    let effect = match kind {
        EffectKind::Explosion { .. } | EffectKind::AreaCharge { .. } => {
            effect.with_easing(Easing::EaseOut)
        }
        _ => effect,
    };
    state.effects.push(effect);
}

/// Request a camera shake, replacing any weaker one in progress
pub fn shake(state: &mut GameState, intensity: f32, duration_ms: f64) {
    let now = state.now();
    if let Some(current) = state.camera_shake {
        if current.active(now) && current.intensity > intensity {
            return;
        }
    }
    state.camera_shake = Some(CameraShake {
        intensity,
        started_ms: now,
        duration_ms,
    });
}

/// Drop finished effects and expired shake
pub fn update(state: &mut GameState) {
    let mut effects = std::mem::take(&mut state.effects);
    effects.retain(|e| !e.finished(state));
    state.effects = effects;

    let now = state.now();
    if state.camera_shake.is_some_and(|s| !s.active(now)) {
        state.camera_shake = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_effect_fades_and_expires() {
        let mut state = GameState::new(1);
        spawn(&mut state, EffectKind::DeathBurst, Vec3::ZERO, 1000.0);
        let fx = state.effects[0].clone();
        assert!((fx.current_opacity(500.0) - 0.35).abs() < 1e-4);

        state.clock.set(999.0);
        update(&mut state);
        assert_eq!(state.effects.len(), 1);

        state.clock.set(1000.0);
        update(&mut state);
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_leap_target_dies_with_boss() {
        let mut state = GameState::new(1);
        state.effects.push(Effect {
            kind: EffectKind::LeapTarget,
            pos: Vec3::ZERO,
            started_ms: 0.0,
            lifetime: Lifetime::WhileLeaping(999),
            easing: Easing::Linear,
            opacity: 0.5,
        });
        update(&mut state);
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_ease_out() {
        assert_eq!(Easing::EaseOut.apply(0.0), 0.0);
        assert_eq!(Easing::EaseOut.apply(1.0), 1.0);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn test_explosions_ease_out() {
        let mut state = GameState::new(1);
        spawn(&mut state, EffectKind::Explosion { radius: 5.0 }, Vec3::ZERO, 700.0);
        assert_eq!(state.effects[0].easing, Easing::EaseOut);
        assert!(state.effects[0].current_scale(350.0) > 1.7);
    }

    #[test]
    fn test_stronger_shake_wins() {
        let mut state = GameState::new(1);
        shake(&mut state, 0.5, 500.0);
        shake(&mut state, 0.2, 200.0);
        assert_eq!(state.camera_shake.unwrap().intensity, 0.5);
    }
}
