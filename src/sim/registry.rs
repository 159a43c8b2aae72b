//! Entity registry
//!
//! Owns every dynamic collection. Entities are addressed by `EntityId` so that
//! deferred work can re-validate its target before touching it.

use super::state::{Boss, Enemy, EntityId, PowerUp, PowerUpKind, Projectile};

#[derive(Debug, Clone)]
pub struct Registry {
    /// Live projectiles (player and thrown), in launch order
    pub projectiles: Vec<Projectile>,
    /// Live regular enemies and minions, in insertion order
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub weapon_powerups: Vec<PowerUp>,
    pub health_powerups: Vec<PowerUp>,
    pub shield_powerups: Vec<PowerUp>,
    next_id: EntityId,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            projectiles: Vec::new(),
            enemies: Vec::new(),
            boss: None,
            weapon_powerups: Vec::new(),
            health_powerups: Vec::new(),
            shield_powerups: Vec::new(),
            next_id: 1,
        }
    }
}

impl Registry {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn enemy_index(&self, id: EntityId) -> Option<usize> {
        self.enemies.iter().position(|e| e.id == id)
    }

    /// Remove an enemy by identity; absent IDs are ignored
    pub fn remove_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        self.enemy_index(id).map(|idx| self.enemies.remove(idx))
    }

    /// The boss, if it is the entity with this ID
    pub fn boss_with_id(&self, id: EntityId) -> Option<&Boss> {
        self.boss.as_ref().filter(|b| b.id == id)
    }

    pub fn boss_with_id_mut(&mut self, id: EntityId) -> Option<&mut Boss> {
        self.boss.as_mut().filter(|b| b.id == id)
    }

    /// Whether an entity with this ID is still registered
    pub fn contains(&self, id: EntityId) -> bool {
        self.boss_with_id(id).is_some()
            || self.enemies.iter().any(|e| e.id == id)
            || self.projectiles.iter().any(|p| p.id == id)
            || self.powerups().any(|p| p.id == id)
    }

    pub fn minion_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.minion).count()
    }

    pub fn regular_count(&self) -> usize {
        self.enemies.iter().filter(|e| !e.minion).count()
    }

    /// Remove every enemy and the boss
    pub fn clear_hostiles(&mut self) {
        self.enemies.clear();
        self.boss = None;
    }

    pub fn powerups(&self) -> impl Iterator<Item = &PowerUp> {
        self.weapon_powerups
            .iter()
            .chain(self.health_powerups.iter())
            .chain(self.shield_powerups.iter())
    }

    /// Pool a power-up of this kind lives in
    pub fn pool_mut(&mut self, kind: PowerUpKind) -> &mut Vec<PowerUp> {
        match kind {
            PowerUpKind::Weapon(_) => &mut self.weapon_powerups,
            PowerUpKind::Health => &mut self.health_powerups,
            PowerUpKind::Shield => &mut self.shield_powerups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn enemy(id: EntityId, minion: bool) -> Enemy {
        Enemy {
            id,
            pos: Vec3::ZERO,
            facing: 0.0,
            direction: Vec3::ZERO,
            speed: 0.0,
            last_attack: None,
            last_turn: 0.0,
            turn_interval: 1000.0,
            minion,
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut reg = Registry::default();
        let a = reg.next_entity_id();
        let b = reg.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_by_identity_preserves_order() {
        let mut reg = Registry::default();
        for id in 1..=4 {
            reg.enemies.push(enemy(id, id % 2 == 0));
        }
        assert!(reg.remove_enemy(2).is_some());
        assert!(reg.remove_enemy(2).is_none());
        let ids: Vec<_> = reg.enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(reg.minion_count(), 1);
        assert_eq!(reg.regular_count(), 2);
        assert!(reg.contains(3));
        assert!(!reg.contains(2));
    }
}
