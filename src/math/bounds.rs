use glam::Vec3;

use crate::math::ray::Ray;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(point1: Vec3, point2: Vec3) -> AABB {
        let min = point1.min(point2);
        let max = point1.max(point2);
        AABB { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<AABB> {
        let mut points = points.into_iter();
        let first = points.next()?;

        Some(points.fold(AABB::new(first, first), |bounds, point| AABB {
            min: bounds.min.min(point),
            max: bounds.max.max(point),
        }))
    }

    /// Slab test. Returns the ray parameter of the entry point, or the exit
    /// point when the origin is inside the box. Hits behind the origin are
    /// rejected.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (min, max) = (self.min[axis], self.max[axis]);

            if direction.abs() < f32::EPSILON {
                // Parallel to this slab: either always inside it or never
                if origin < min || origin > max {
                    return None;
                }
                continue;
            }

            let inverse = 1.0 / direction;
            let mut t1 = (min - origin) * inverse;
            let mut t2 = (max - origin) * inverse;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_min = t_min.max(t1);
            t_max = t_max.min(t2);

            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }

        Some(if t_min >= 0.0 { t_min } else { t_max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> AABB {
        AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    #[test]
    fn test_from_points_spans_all_points() {
        let bounds = AABB::from_points([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();

        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 0.5));
        assert!(AABB::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_ray_hits_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = unit_box().intersect_ray(&ray).unwrap();
        assert!((t - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_ray_misses_beside_box() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_box_behind_ray_is_ignored() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_flat_box_is_hit_head_on() {
        let plane = AABB::new(Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.5, 0.5, 0.0));
        let ray = Ray::new(Vec3::new(0.1, 0.2, 3.0), Vec3::NEG_Z);
        let t = plane.intersect_ray(&ray).unwrap();
        assert!((t - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_origin_inside_returns_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = unit_box().intersect_ray(&ray).unwrap();
        assert!((t - 0.5).abs() < 1e-6);
    }
}
