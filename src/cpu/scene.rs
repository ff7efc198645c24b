use super::cube::Cube;
use super::hittable::HittableList;
use super::ray::Point3;
use super::sphere::Sphere;
use crate::config::SceneConfig;

/// World from the config, or the built-in scene when none is given.
pub fn build_world(scene: Option<&SceneConfig>) -> HittableList {
    match scene {
        Some(scene) => from_config(scene),
        None => default_scene(),
    }
}

/// A sphere and two boxes standing on a thin floor slab.
pub fn default_scene() -> HittableList {
    let mut world = HittableList::new();

    world.add(Box::new(Sphere::new(Point3::new(0.0, -1.0, -1.0), 0.5)));
    world.add(Box::new(Cube::new(
        Point3::new(-2.0, -1.5, -2.0),
        Point3::new(-1.0, -0.5, -1.0),
    )));
    world.add(Box::new(Cube::new(
        Point3::new(1.5, -0.75, -2.5),
        Point3::new(2.5, 0.25, -1.5),
    )));

    // Floor
    world.add(Box::new(Cube::new(
        Point3::new(-5.0, -1.75, -2.5),
        Point3::new(5.0, -1.5, 1.5),
    )));

    world
}

fn from_config(scene: &SceneConfig) -> HittableList {
    let mut world = HittableList::new();

    for sphere in &scene.spheres {
        world.add(Box::new(Sphere::new(Point3::from_array(sphere.center), sphere.radius)));
    }
    for cube in &scene.cubes {
        world.add(Box::new(Cube::new(
            Point3::from_array(cube.min),
            Point3::from_array(cube.max),
        )));
    }

    log::info!(
        "Scene from config: {} spheres, {} boxes",
        scene.spheres.len(),
        scene.cubes.len()
    );
    world
}
