//! Bounding volumes for hit detection
//!
//! Enemies are tested with world-space axis-aligned boxes built from the
//! model's local extents rotated by its facing, the same volume a scene graph
//! would report for the rotated mesh.

use glam::Vec3;

use crate::consts::*;

/// Local-space extents of the enemy model (unscaled, relative to its origin)
pub const ENEMY_LOCAL_MIN: Vec3 = Vec3::new(-0.35, -0.225, -0.9);
pub const ENEMY_LOCAL_MAX: Vec3 = Vec3::new(0.35, 1.2, 0.8);

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// World box of a local box rotated by `yaw` about Y, scaled, and placed at `origin`
    pub fn from_model(origin: Vec3, yaw: f32, scale: f32, local_min: Vec3, local_max: Vec3) -> Self {
        let (sin, cos) = yaw.sin_cos();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for &x in &[local_min.x, local_max.x] {
            for &z in &[local_min.z, local_max.z] {
                // Yaw rotation as applied to a +Z-facing model
                let wx = x * cos + z * sin;
                let wz = -x * sin + z * cos;
                min.x = min.x.min(wx);
                max.x = max.x.max(wx);
                min.z = min.z.min(wz);
                max.z = max.z.max(wz);
            }
        }
        min.y = local_min.y;
        max.y = local_max.y;
        Self {
            min: origin + min * scale,
            max: origin + max * scale,
        }
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Hit volume of a regular enemy
pub fn enemy_hitbox(pos: Vec3, facing: f32) -> Aabb {
    Aabb::from_model(pos, facing, 1.0, ENEMY_LOCAL_MIN, ENEMY_LOCAL_MAX).expanded(ENEMY_HITBOX_MARGIN)
}

/// Hit volume of the boss (same model, scaled up)
pub fn boss_hitbox(pos: Vec3, facing: f32) -> Aabb {
    Aabb::from_model(pos, facing, BOSS_SCALE, ENEMY_LOCAL_MIN, ENEMY_LOCAL_MAX)
        .expanded(BOSS_HITBOX_MARGIN)
}

/// Sphere-point proximity
#[inline]
pub fn within(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance(b) < radius
}
