// Vulkan Instance - loader entry point
//
// Responsibilities:
// - Load the Vulkan library
// - Check the requested validation layers exist
// - Create the instance with the window system's extensions
// - Route validation messages into the log (debug builds only)

use super::BackendError;
use crate::config::Config;
use anyhow::{Context, Result};
use ash::extensions::ext::DebugUtils;
use ash::{vk, Entry};
use raw_window_handle::RawDisplayHandle;
use std::ffi::{c_char, CStr, CString};
use std::sync::Arc;

/// Layers enabled when validation is on
pub const VALIDATION_LAYERS: [&CStr; 1] = [c"VK_LAYER_KHRONOS_validation"];

/// What the instance is created with
#[derive(Debug, Clone)]
pub struct InstanceSettings {
    pub application_name: String,
    pub engine_name: String,
    pub enable_validation: bool,
    pub log_extensions: bool,
}

impl InstanceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            application_name: config.vulkan.application_name.clone(),
            engine_name: config.vulkan.engine_name.clone(),
            enable_validation: config.validation_enabled(),
            log_extensions: config.vulkan.log_extensions,
        }
    }
}

/// Vulkan instance wrapper, destroyed on drop
pub struct VulkanInstance {
    pub instance: ash::Instance,
    pub entry: Entry,
    pub validation_enabled: bool,
    debug_utils: Option<(DebugUtils, vk::DebugUtilsMessengerEXT)>,
}

impl VulkanInstance {
    /// Create the instance for a window living on `display_handle`.
    pub fn new(settings: &InstanceSettings, display_handle: RawDisplayHandle) -> Result<Arc<Self>> {
        log::info!("Creating Vulkan instance: {}", settings.application_name);

        let entry = unsafe { Entry::load() }
            .context("Failed to load Vulkan library. Is Vulkan installed?")?;

        if settings.enable_validation {
            let available = entry
                .enumerate_instance_layer_properties()
                .context("Failed to enumerate instance layers")?;
            let missing = missing_layers(&VALIDATION_LAYERS, &available);
            if !missing.is_empty() {
                return Err(BackendError::ValidationLayersUnavailable(missing).into());
            }
        }

        let app_name = CString::new(settings.application_name.as_str())?;
        let engine_name = CString::new(settings.engine_name.as_str())?;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(&engine_name)
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_0);

        // Surface extensions for whatever platform the window is on
        let mut extensions = ash_window::enumerate_required_extensions(display_handle)
            .context("Failed to query required window extensions")?
            .to_vec();
        if settings.enable_validation {
            extensions.push(DebugUtils::name().as_ptr());
        }

        let layer_names: Vec<*const c_char> = if settings.enable_validation {
            VALIDATION_LAYERS.iter().map(|layer| layer.as_ptr()).collect()
        } else {
            Vec::new()
        };

        if settings.log_extensions {
            let available = available_extension_names(&entry)?;
            log::info!("Available extensions ({}):", available.len());
            for name in &available {
                log::info!("\t{}", name);
            }
        }

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extensions)
            .enabled_layer_names(&layer_names);

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .context("failed to create instance")?;
        log::info!("Vulkan instance created successfully");

        let debug_utils = if settings.enable_validation {
            match Self::setup_debug_messenger(&entry, &instance) {
                Ok(messenger) => Some(messenger),
                Err(e) => {
                    unsafe { instance.destroy_instance(None) };
                    return Err(e);
                }
            }
        } else {
            None
        };

        Ok(Arc::new(Self {
            instance,
            entry,
            validation_enabled: settings.enable_validation,
            debug_utils,
        }))
    }

    fn setup_debug_messenger(
        entry: &Entry,
        instance: &ash::Instance,
    ) -> Result<(DebugUtils, vk::DebugUtilsMessengerEXT)> {
        let debug_utils = DebugUtils::new(entry, instance);

        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));

        let messenger = unsafe { debug_utils.create_debug_utils_messenger(&create_info, None) }
            .context("Failed to create debug messenger")?;

        Ok((debug_utils, messenger))
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        log::info!("Destroying Vulkan instance...");

        unsafe {
            if let Some((debug_utils, messenger)) = self.debug_utils.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}

/// Names of the instance extensions the loader offers.
pub fn available_extension_names(entry: &Entry) -> Result<Vec<String>> {
    let extensions = entry
        .enumerate_instance_extension_properties(None)
        .context("Failed to enumerate instance extensions")?;

    Ok(extensions
        .iter()
        .map(|ext| fixed_c_str(&ext.extension_name))
        .collect())
}

/// Requested layers absent from `available`, in request order.
pub fn missing_layers(requested: &[&CStr], available: &[vk::LayerProperties]) -> Vec<String> {
    requested
        .iter()
        .map(|layer| layer.to_string_lossy().into_owned())
        .filter(|name| !available.iter().any(|props| fixed_c_str(&props.layer_name) == *name))
        .collect()
}

/// Decode a NUL-terminated fixed-size name array from a Vulkan struct.
pub(crate) fn fixed_c_str(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

// Debug callback for validation layers
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _p_user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    let message = CStr::from_ptr((*p_callback_data).p_message).to_string_lossy();

    match message_severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => {
            log::error!("[Vulkan] {:?} {}", message_type, message);
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => {
            log::warn!("[Vulkan] {:?} {}", message_type, message);
        }
        _ => {
            log::debug!("[Vulkan] {:?} {}", message_type, message);
        }
    }

    vk::FALSE
}
