use super::hittable::{HitRecord, Hittable};
use super::ray::{Point3, Ray};

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Nearest root in range
        let mut root = (-half_b - sqrtd) / a;
        if root <= t_min || t_max <= root {
            root = (-half_b + sqrtd) / a;
            if root <= t_min || t_max <= root {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(ray, root, outward_normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn unit_sphere_ahead() -> Sphere {
        Sphere::new(Point3::new(0.0, 0.0, -3.0), 1.0)
    }

    #[test]
    fn head_on_hit() {
        let ray = Ray::new(Point3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let rec = unit_sphere_ahead().hit(&ray, 0.0, f64::INFINITY).unwrap();

        assert_relative_eq!(rec.t, 2.0);
        assert_relative_eq!(rec.p.z, -2.0);
        assert_relative_eq!(rec.normal.z, 1.0);
        assert!(rec.front_face);
    }

    #[test]
    fn miss() {
        let ray = Ray::new(Point3::ZERO, DVec3::new(0.0, 1.0, 0.0));
        assert!(unit_sphere_ahead().hit(&ray, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn far_root_used_when_near_is_out_of_range() {
        let ray = Ray::new(Point3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let rec = unit_sphere_ahead().hit(&ray, 2.5, f64::INFINITY).unwrap();

        assert_relative_eq!(rec.t, 4.0);
        assert!(!rec.front_face);
        assert_relative_eq!(rec.normal.z, 1.0);
    }

    #[test]
    fn respects_t_max() {
        let ray = Ray::new(Point3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        assert!(unit_sphere_ahead().hit(&ray, 0.0, 1.5).is_none());
    }
}
