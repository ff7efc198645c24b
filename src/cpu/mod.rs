// CPU path tracer
//
// Diffuse-only tracer over spheres and axis-aligned boxes, writing plain PPM.
// Vectors, points and colors are all `glam::DVec3`.

pub mod camera;
pub mod color;
pub mod cube;
pub mod hittable;
pub mod ray;
pub mod render;
pub mod scene;
pub mod sphere;

pub use camera::Camera;
pub use color::Color;
pub use cube::Cube;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use ray::{Point3, Ray};
pub use render::{render, RenderSettings};
pub use sphere::Sphere;
