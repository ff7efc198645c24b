// CPU path tracer: renders the configured scene to a PPM image.
//
// Output goes to `render.output` when set, stdout otherwise, so
// `render > image.ppm` works like the tutorial it comes from.

use anyhow::{Context, Result};
use raytracer::config::Config;
use raytracer::cpu::{render, scene, Camera, RenderSettings};
use raytracer::logging::init_logging;
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn main() -> Result<()> {
    let (config, source) = Config::load();
    init_logging(&config)?;
    source.log();

    let settings = RenderSettings::from_config(&config.render)?;
    let world = scene::build_world(config.render.scene.as_ref());
    let camera = Camera::new(config.render.aspect_ratio);
    let mut rng = rand::thread_rng();

    let mut out: Box<dyn Write> = match &config.render.output {
        Some(path) => {
            log::info!("Writing image to {}", path);
            let file = File::create(path).with_context(|| format!("Failed to create {}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    render(&world, &camera, &settings, &mut rng, &mut out)
}
