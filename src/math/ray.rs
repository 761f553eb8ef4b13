//! Ray type and operations

use crate::core::types::Vec3;
use super::aabb::Aabb;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Precomputed 1/direction for fast AABB intersection
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: Vec3::new(
                1.0 / direction.x,
                1.0 / direction.y,
                1.0 / direction.z,
            ),
        }
    }

    /// Create a ray through two points
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self::new(from, (to - from).normalize())
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Clip the ray against an AABB using the slab method.
    /// Returns the `[t_enter, t_exit]` parameter interval inside the box,
    /// with `t_enter` clamped to 0 when the origin is inside.
    pub fn clip_aabb(&self, aabb: &Aabb) -> Option<(f32, f32)> {
        let t1 = (aabb.min - self.origin) * self.inv_direction;
        let t2 = (aabb.max - self.origin) * self.inv_direction;

        let t_min = t1.min(t2);
        let t_max = t1.max(t2);

        let t_enter = t_min.x.max(t_min.y).max(t_min.z);
        let t_exit = t_max.x.min(t_max.y).min(t_max.z);

        if t_enter <= t_exit && t_exit >= 0.0 {
            Some((t_enter.max(0.0), t_exit))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray.at(3.0), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_between_normalizes() {
        let ray = Ray::between(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clip_aabb_hit() {
        let ray = Ray::new(Vec3::new(-2.0, 0.5, 0.5), Vec3::X);
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let (t_enter, t_exit) = ray.clip_aabb(&aabb).unwrap();
        assert!((t_enter - 2.0).abs() < 1e-4);
        assert!((t_exit - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_clip_aabb_miss() {
        let ray = Ray::new(Vec3::new(-2.0, 5.0, 0.5), Vec3::X);
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(ray.clip_aabb(&aabb).is_none());
    }

    #[test]
    fn test_clip_aabb_origin_inside() {
        let ray = Ray::new(Vec3::splat(0.5), Vec3::NEG_Y);
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let (t_enter, _) = ray.clip_aabb(&aabb).unwrap();
        assert_eq!(t_enter, 0.0);
    }
}
