// =============================================================================
// RAYTRACER - Vulkan bring-up and a CPU path tracer
// =============================================================================
//
// Two binaries share this library:
//   raytracer  - window + Vulkan instance/device/queue, empty poll loop
//   render     - CPU path tracer writing a PPM image
//
// =============================================================================

pub mod backend;
pub mod config;
pub mod cpu;
pub mod logging;
