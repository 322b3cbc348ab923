// Re-export glam for convenience
pub use glam::*;

// RTW math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_reciprocal_of_zero_is_infinite() {
        let inv = Vec3::new(0.0, -0.0, 2.0).recip();
        assert_eq!(inv.x, f32::INFINITY);
        assert_eq!(inv.y, f32::NEG_INFINITY);
        assert_eq!(inv.z, 0.5);
    }
}
