// Vulkan Device - Core GPU interface
//
// Responsibilities:
// - Physical device scoring (discrete GPUs and big textures win)
// - Graphics queue family lookup
// - Logical device + queue creation

use super::instance::{fixed_c_str, VALIDATION_LAYERS};
use super::{BackendError, VulkanInstance};
use anyhow::{Context, Result};
use ash::vk;
use std::ffi::c_char;
use std::sync::Arc;

/// Bonus a discrete GPU gets over every other device type
const DISCRETE_GPU_BONUS: u32 = 1000;

/// Queue families this device needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics_family: Option<u32>,
}

impl QueueFamilyIndices {
    /// Scan queue families in order until every required family is known.
    pub fn find(families: &[vk::QueueFamilyProperties]) -> Self {
        let mut indices = Self::default();

        for (index, family) in families.iter().enumerate() {
            if family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
                indices.graphics_family = Some(index as u32);
            }

            if indices.is_complete() {
                break;
            }
        }

        indices
    }

    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some()
    }
}

/// Score a physical device; 0 means unusable.
pub fn rate_device_suitability(
    properties: &vk::PhysicalDeviceProperties,
    features: &vk::PhysicalDeviceFeatures,
) -> u32 {
    if features.geometry_shader != vk::TRUE {
        return 0;
    }

    let mut score = 0;
    if properties.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
        score += DISCRETE_GPU_BONUS;
    }

    // Max texture size
    score.saturating_add(properties.limits.max_image_dimension2_d)
}

/// Highest score wins; on a tie the last enumerated candidate is kept.
pub fn pick_best<T>(candidates: impl IntoIterator<Item = (u32, T)>) -> Result<T, BackendError> {
    let mut best: Option<(u32, T)> = None;

    for (score, candidate) in candidates {
        let better = match &best {
            Some((best_score, _)) => score >= *best_score,
            None => true,
        };
        if better {
            best = Some((score, candidate));
        }
    }

    match best {
        None => Err(BackendError::NoVulkanDevices),
        Some((0, _)) => Err(BackendError::NoSuitableDevice),
        Some((_, candidate)) => Ok(candidate),
    }
}

/// A physical device that has been looked at by the selector
#[derive(Debug, Clone, Copy)]
struct Candidate {
    physical_device: vk::PhysicalDevice,
    properties: vk::PhysicalDeviceProperties,
    queue_families: QueueFamilyIndices,
}

/// Logical device wrapper with automatic cleanup
pub struct VulkanDevice {
    pub device: ash::Device,
    pub physical_device: vk::PhysicalDevice,

    // Queue handles
    pub graphics_queue: vk::Queue,
    pub queue_families: QueueFamilyIndices,

    // Device properties (cached for logging)
    pub properties: vk::PhysicalDeviceProperties,

    // Keeps the instance alive until the device is gone
    _instance: Arc<VulkanInstance>,
}

impl VulkanDevice {
    /// Pick the best GPU and create a logical device with one graphics queue.
    pub fn new(instance: Arc<VulkanInstance>) -> Result<Arc<Self>> {
        let candidate = Self::pick_physical_device(&instance.instance)?;

        // Suitable candidates always carry a graphics family
        let graphics_family = candidate
            .queue_families
            .graphics_family
            .context("Selected GPU has no graphics queue family")?;

        let (device, graphics_queue) = Self::create_logical_device(
            &instance,
            candidate.physical_device,
            graphics_family,
        )?;

        log::info!("Selected GPU: {}", fixed_c_str(&candidate.properties.device_name));
        log::info!(
            "API Version: {}.{}.{}",
            vk::api_version_major(candidate.properties.api_version),
            vk::api_version_minor(candidate.properties.api_version),
            vk::api_version_patch(candidate.properties.api_version)
        );
        log::info!("Graphics queue family: {}", graphics_family);

        Ok(Arc::new(Self {
            device,
            physical_device: candidate.physical_device,
            graphics_queue,
            queue_families: candidate.queue_families,
            properties: candidate.properties,
            _instance: instance,
        }))
    }

    fn pick_physical_device(instance: &ash::Instance) -> Result<Candidate> {
        let devices = unsafe { instance.enumerate_physical_devices() }
            .context("Failed to enumerate physical devices")?;

        let scored = devices.into_iter().map(|physical_device| {
            let candidate = Self::inspect(instance, physical_device);
            let features = unsafe { instance.get_physical_device_features(physical_device) };

            let score = if candidate.queue_families.is_complete() {
                rate_device_suitability(&candidate.properties, &features)
            } else {
                0
            };

            log::info!(
                "Device score: {} ({})",
                score,
                fixed_c_str(&candidate.properties.device_name)
            );
            (score, candidate)
        });

        Ok(pick_best(scored)?)
    }

    fn inspect(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> Candidate {
        let properties = unsafe { instance.get_physical_device_properties(physical_device) };
        let families =
            unsafe { instance.get_physical_device_queue_family_properties(physical_device) };

        Candidate {
            physical_device,
            properties,
            queue_families: QueueFamilyIndices::find(&families),
        }
    }

    fn create_logical_device(
        instance: &VulkanInstance,
        physical_device: vk::PhysicalDevice,
        graphics_family: u32,
    ) -> Result<(ash::Device, vk::Queue)> {
        let queue_priorities = [1.0];
        let queue_create_info = vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(graphics_family)
            .queue_priorities(&queue_priorities)
            .build();

        // Nothing beyond the core feature set yet
        let features = vk::PhysicalDeviceFeatures::default();

        // Device layers are ignored by current loaders; older ones still read them
        let layer_names: Vec<*const c_char> = if instance.validation_enabled {
            VALIDATION_LAYERS.iter().map(|layer| layer.as_ptr()).collect()
        } else {
            Vec::new()
        };

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(std::slice::from_ref(&queue_create_info))
            .enabled_features(&features)
            .enabled_layer_names(&layer_names);

        let device = unsafe {
            instance
                .instance
                .create_device(physical_device, &create_info, None)
        }
        .context("failed to create logical device")?;

        let graphics_queue = unsafe { device.get_device_queue(graphics_family, 0) };

        Ok((device, graphics_queue))
    }

    /// Wait for device to be idle (e.g., before cleanup)
    pub fn wait_idle(&self) -> Result<()> {
        unsafe { self.device.device_wait_idle() }?;
        Ok(())
    }
}

impl Drop for VulkanDevice {
    fn drop(&mut self) {
        log::info!("Destroying Vulkan device...");

        let _ = self.wait_idle();

        unsafe {
            self.device.destroy_device(None);
        }
        // `_instance` field drops after this, so the instance goes last
    }
}
