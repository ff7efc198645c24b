// =============================================================================
// VULKAN BRING-UP
// =============================================================================
//
// SEQUENCE:
// 1. Open a window (no client API, Vulkan only)
// 2. Create the Vulkan instance (+ validation layers in debug builds)
// 3. Score physical devices, keep the best one
// 4. Create the logical device and fetch the graphics queue
// 5. Poll events until the window closes
// 6. Tear down in reverse: device -> instance -> window
//
// =============================================================================

use anyhow::Result;
use raw_window_handle::HasRawDisplayHandle;
use raytracer::backend::{InstanceSettings, VulkanDevice, VulkanInstance};
use raytracer::config::Config;
use raytracer::logging::init_logging;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let (config, source) = Config::load();
    init_logging(&config)?;
    source.log();

    log::info!("Starting Vulkan bring-up");
    log::info!(
        "Window: {}x{} (validation layers {})",
        config.window.width,
        config.window.height,
        if config.validation_enabled() { "on" } else { "off" }
    );

    let event_loop = EventLoop::new()?;
    // Busy-poll: nothing is rendered, events are all there is
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    app.take_error().map_or(Ok(()), Err)
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Owns every handle of the bring-up.
///
/// Field order is drop order: the device (which holds the instance) must go
/// before the window it was created for.
struct App {
    device: Option<Arc<VulkanDevice>>,
    window: Option<Window>,
    config: Config,
    /// First fatal error; turned into the process exit status
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            device: None,
            window: None,
            config,
            error: None,
        }
    }

    fn init_vulkan(&mut self, window: &Window) -> Result<()> {
        log::info!("Initializing Vulkan...");

        let settings = InstanceSettings::from_config(&self.config);
        let instance = VulkanInstance::new(&settings, window.raw_display_handle())?;
        let device = VulkanDevice::new(instance)?;

        self.device = Some(device);
        log::info!("Vulkan initialized successfully!");
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }
}

// =============================================================================
// EVENT HANDLING
// =============================================================================

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = WindowAttributes::default()
            .with_title(&self.config.window.title)
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_resizable(self.config.window.resizable);

        let window = match event_loop.create_window(window_attributes) {
            Ok(w) => w,
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("Failed to create window"));
                return;
            }
        };

        if let Err(e) = self.init_vulkan(&window) {
            self.fail(event_loop, e.context("Failed to initialize Vulkan"));
        }

        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down...");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                use winit::keyboard::{KeyCode, PhysicalKey};

                if event.state.is_pressed() && event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    log::info!("ESC pressed, exiting...");
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

// =============================================================================
// CLEANUP
// =============================================================================

impl Drop for App {
    fn drop(&mut self) {
        log::info!("Cleaning up...");

        // Reverse order of creation; the device waits for idle itself
        self.device = None;
        self.window = None;

        log::info!("Cleanup complete");
    }
}
