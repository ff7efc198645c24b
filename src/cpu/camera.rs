use super::ray::{Point3, Ray};
use glam::DVec3;

const VIEWPORT_HEIGHT: f64 = 2.0;
const FOCAL_LENGTH: f64 = 1.0;

/// Pinhole camera at the origin looking down -Z
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: DVec3,
    vertical: DVec3,
}

impl Camera {
    pub fn new(aspect_ratio: f64) -> Self {
        let viewport_width = aspect_ratio * VIEWPORT_HEIGHT;

        let origin = Point3::ZERO;
        let horizontal = DVec3::new(viewport_width, 0.0, 0.0);
        let vertical = DVec3::new(0.0, VIEWPORT_HEIGHT, 0.0);
        let lower_left_corner =
            origin - horizontal / 2.0 - vertical / 2.0 - DVec3::new(0.0, 0.0, FOCAL_LENGTH);

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
        }
    }

    /// Ray through viewport coordinates `u`, `v` in `[0, 1]`, origin bottom-left.
    pub fn get_ray(&self, u: f64, v: f64) -> Ray {
        Ray::new(
            self.origin,
            self.lower_left_corner + u * self.horizontal + v * self.vertical - self.origin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_ray_looks_down_negative_z() {
        let cam = Camera::new(16.0 / 9.0);
        let ray = cam.get_ray(0.5, 0.5);

        assert_eq!(ray.origin, Point3::ZERO);
        assert_relative_eq!(ray.direction.x, 0.0);
        assert_relative_eq!(ray.direction.y, 0.0);
        assert_relative_eq!(ray.direction.z, -1.0);
    }

    #[test]
    fn corners_span_the_viewport() {
        let cam = Camera::new(2.0);

        let bottom_left = cam.get_ray(0.0, 0.0).direction;
        assert_relative_eq!(bottom_left.x, -2.0);
        assert_relative_eq!(bottom_left.y, -1.0);

        let top_right = cam.get_ray(1.0, 1.0).direction;
        assert_relative_eq!(top_right.x, 2.0);
        assert_relative_eq!(top_right.y, 1.0);
        assert_relative_eq!(top_right.z, -1.0);
    }
}
