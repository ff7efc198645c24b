use glam::DVec3;
use std::io::{self, Write};

pub type Color = DVec3;

/// Average `samples_per_pixel` accumulated samples and write one PPM pixel.
pub fn write_color(out: &mut impl Write, pixel_color: Color, samples_per_pixel: u32) -> io::Result<()> {
    let scale = 1.0 / samples_per_pixel as f64;
    let [r, g, b] = (pixel_color * scale).to_array().map(to_byte);

    writeln!(out, "{} {} {}", r, g, b)
}

fn to_byte(channel: f64) -> u8 {
    (256.0 * channel.clamp(0.0, 0.999)) as u8
}
