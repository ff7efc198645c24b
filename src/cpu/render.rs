// Path tracing loop and PPM output

use super::camera::Camera;
use super::color::{write_color, Color};
use super::hittable::Hittable;
use super::ray::Ray;
use crate::config::RenderConfig;
use anyhow::{Context, Result};
use glam::DVec3;
use rand::Rng;
use std::io::Write;

/// Hits closer than this are ignored (surface acne)
const HIT_T_MIN: f64 = 0.1;
/// Energy kept at each diffuse bounce
const ATTENUATION: f64 = 0.5;

const SKY_HORIZON: Color = Color::new(0.81, 0.93, 0.96);
const SKY_ZENITH: Color = Color::new(0.28, 0.35, 0.50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
}

impl RenderSettings {
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        config.validate().context("Invalid render settings")?;

        Ok(Self {
            image_width: config.image_width,
            image_height: config.image_height(),
            samples_per_pixel: config.samples_per_pixel.max(1),
            max_depth: config.max_depth,
        })
    }
}

/// Rejection-sample a point strictly inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut impl Rng) -> DVec3 {
    loop {
        let p = DVec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Radiance carried back along `ray`.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut impl Rng) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    if let Some(rec) = world.hit(ray, HIT_T_MIN, f64::INFINITY) {
        let target = rec.p + rec.normal + random_in_unit_sphere(rng);
        let scattered = Ray::new(rec.p, target - rec.p);
        return ATTENUATION * ray_color(&scattered, world, depth - 1, rng);
    }

    sky_color(ray)
}

fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let t = 0.5 * (unit_direction.y + 1.0);
    (1.0 - t) * SKY_HORIZON + t * SKY_ZENITH
}

/// Render the whole image as plain-text PPM (P3), top scanline first.
pub fn render(
    world: &dyn Hittable,
    camera: &Camera,
    settings: &RenderSettings,
    rng: &mut impl Rng,
    out: &mut impl Write,
) -> Result<()> {
    let RenderSettings {
        image_width: width,
        image_height: height,
        samples_per_pixel,
        max_depth,
    } = *settings;

    log::info!(
        "Rendering {}x{} at {} samples per pixel (depth {})",
        width,
        height,
        samples_per_pixel,
        max_depth
    );

    write!(out, "P3\n{} {}\n255\n", width, height).context("Failed to write PPM header")?;

    // Guard the divisions for 1-pixel images
    let u_span = (width.max(2) - 1) as f64;
    let v_span = (height.max(2) - 1) as f64;

    for j in (0..height).rev() {
        log::debug!("Scanlines remaining: {}", j);

        for i in 0..width {
            let mut pixel_color = Color::ZERO;
            for _ in 0..samples_per_pixel {
                let u = (i as f64 + rng.gen::<f64>()) / u_span;
                let v = (j as f64 + rng.gen::<f64>()) / v_span;
                let ray = camera.get_ray(u, v);
                pixel_color += ray_color(&ray, world, max_depth, rng);
            }
            write_color(out, pixel_color, samples_per_pixel).context("Failed to write pixel")?;
        }
    }

    out.flush()?;
    log::info!("Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::{HittableList, Point3, Sphere};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn unit_sphere_samples_stay_inside() {
        let mut rng = rng();
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
        }
    }

    #[test]
    fn zero_depth_is_black() {
        let world = HittableList::new();
        let ray = Ray::new(Point3::ZERO, DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(ray_color(&ray, &world, 0, &mut rng()), Color::ZERO);
    }

    #[test]
    fn sky_gradient_endpoints() {
        let world = HittableList::new();

        let up = ray_color(&Ray::new(Point3::ZERO, DVec3::Y), &world, 10, &mut rng());
        assert_relative_eq!(up.x, SKY_ZENITH.x);
        assert_relative_eq!(up.z, SKY_ZENITH.z);

        let down = ray_color(&Ray::new(Point3::ZERO, -DVec3::Y), &world, 10, &mut rng());
        assert_relative_eq!(down.y, SKY_HORIZON.y);
    }

    #[test]
    fn enclosed_ray_runs_out_of_bounces() {
        // Inside a huge sphere every bounce hits again until depth runs out
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Point3::ZERO, 1000.0)));

        let ray = Ray::new(Point3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(ray_color(&ray, &world, 5, &mut rng()), Color::ZERO);
    }

    #[test]
    fn writes_ppm_with_one_line_per_pixel() {
        let world = HittableList::new();
        let camera = Camera::new(2.0);
        let settings = RenderSettings {
            image_width: 4,
            image_height: 2,
            samples_per_pixel: 2,
            max_depth: 3,
        };

        let mut out = Vec::new();
        render(&world, &camera, &settings, &mut rng(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(&lines[..3], &["P3", "4 2", "255"]);
        assert_eq!(lines.len(), 3 + 8);
        for pixel in &lines[3..] {
            let channels: Vec<u8> = pixel.split(' ').map(|c| c.parse().unwrap()).collect();
            assert_eq!(channels.len(), 3);
        }
    }

    #[test]
    fn settings_never_use_zero_samples() {
        let config = RenderConfig {
            samples_per_pixel: 0,
            ..Default::default()
        };
        assert_eq!(RenderSettings::from_config(&config).unwrap().samples_per_pixel, 1);
    }

    #[test]
    fn degenerate_aspect_ratio_is_rejected() {
        for aspect_ratio in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = RenderConfig {
                aspect_ratio,
                image_width: 4,
                ..Default::default()
            };
            let err = RenderSettings::from_config(&config).unwrap_err();
            assert!(format!("{:#}", err).contains("aspect_ratio"));
        }
    }

    #[test]
    fn settings_follow_valid_config() {
        let config = RenderConfig {
            aspect_ratio: 2.0,
            image_width: 4,
            ..Default::default()
        };
        let settings = RenderSettings::from_config(&config).unwrap();
        assert_eq!((settings.image_width, settings.image_height), (4, 2));
    }
}
