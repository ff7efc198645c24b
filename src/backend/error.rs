// Typed failures of the bring-up sequence
//
// Everything else goes through anyhow with context; these are the cases
// callers (and tests) want to tell apart.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("validation layers requested, but not available: {}", .0.join(", "))]
    ValidationLayersUnavailable(Vec<String>),

    #[error("failed to find GPUs with Vulkan support")]
    NoVulkanDevices,

    #[error("failed to find a suitable GPU")]
    NoSuitableDevice,
}
