// Backend module - Vulkan bring-up
//
// Design: Thin wrapper around ash, one owner per handle
// Teardown: device before instance, enforced by the device holding the instance

pub mod device;
pub mod error;
pub mod instance;

pub use device::{QueueFamilyIndices, VulkanDevice};
pub use error::BackendError;
pub use instance::{InstanceSettings, VulkanInstance};
