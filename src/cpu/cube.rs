use super::hittable::{HitRecord, Hittable};
use super::ray::{Point3, Ray};
use glam::DVec3;

/// Axis-aligned box between two corners
#[derive(Debug, Clone, Copy)]
pub struct Cube {
    min: Point3,
    max: Point3,
}

impl Cube {
    /// Corners may be given in any order.
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

impl Hittable for Cube {
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        // Slab test: the ray is inside the box between the last slab entry
        // and the first slab exit.
        let mut t_entry = f64::NEG_INFINITY;
        let mut t_exit = f64::INFINITY;
        let mut entry_axis = 0;
        let mut exit_axis = 0;

        for axis in 0..3 {
            let t0 = (self.min[axis] - ray.origin[axis]) / ray.direction[axis];
            let t1 = (self.max[axis] - ray.origin[axis]) / ray.direction[axis];
            let (near, far) = (t0.min(t1), t0.max(t1));

            if near > t_entry {
                t_entry = near;
                entry_axis = axis;
            }
            if far < t_exit {
                t_exit = far;
                exit_axis = axis;
            }
        }

        if t_entry > t_exit || t_entry >= t_max || t_exit <= t_min {
            return None;
        }

        // Origin inside the box: the visible surface is where the ray leaves
        let (t, outward_normal) = if t_entry > t_min {
            (t_entry, face_normal(entry_axis, -ray.direction[entry_axis]))
        } else if t_exit < t_max {
            (t_exit, face_normal(exit_axis, ray.direction[exit_axis]))
        } else {
            return None;
        };

        Some(HitRecord::new(ray, t, outward_normal))
    }
}

/// Unit normal on `axis` with the sign of `toward`.
fn face_normal(axis: usize, toward: f64) -> DVec3 {
    let mut normal = DVec3::ZERO;
    normal[axis] = if toward > 0.0 { 1.0 } else { -1.0 };
    normal
}
