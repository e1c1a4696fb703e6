use serde::{Deserialize, Serialize};

mod debug_reporter;
use debug_reporter::VkDebugReporter;

mod instance;
use instance::VkInstance;

mod device;
use device::VkDevice;

mod swapchain;
use swapchain::VkSwapchain;

mod skia_support;
use skia_support::VkSkiaContext;

mod msaa;
pub use msaa::choose_sample_count;

mod renderer;
pub use renderer::VkRenderer;

/// Options for the vulkan backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VulkanOptions {
    /// Enable VK_LAYER_KHRONOS_validation if it is installed
    pub validation: bool,
    /// Upper bound for multisampling. 1 disables it.
    pub max_sample_count: u32,
}

impl Default for VulkanOptions {
    fn default() -> Self {
        VulkanOptions {
            validation: false,
            max_sample_count: 16,
        }
    }
}
