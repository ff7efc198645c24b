use glam::DVec3;

pub type Point3 = DVec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: Point3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Point reached after travelling `t` directions from the origin
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }
}
