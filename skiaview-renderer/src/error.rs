use ash::vk;

/// Represents an error from creating or using one of the surface owners
#[derive(Debug)]
pub enum RendererError {
    /// The GPU context (GL interface, skia direct context, ...) could not be created
    ContextCreation(String),
    /// Skia refused to create a drawing surface of the given size
    SurfaceCreation { width: u32, height: u32 },
    /// The vulkan loader could not be found
    VulkanLoading(ash::LoadingError),
    Vulkan(vk::Result),
    /// No physical device has a queue that can both draw and present to the window
    NoSuitableDevice,
}

impl std::error::Error for RendererError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            RendererError::VulkanLoading(ref e) => Some(e),
            RendererError::Vulkan(ref e) => Some(e),
            _ => None,
        }
    }
}

impl core::fmt::Display for RendererError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            RendererError::ContextCreation(ref msg) => {
                write!(fmt, "Failed to create GPU context: {}", msg)
            }
            RendererError::SurfaceCreation { width, height } => {
                write!(fmt, "Failed to create skia surface of size {}x{}", width, height)
            }
            RendererError::VulkanLoading(ref e) => e.fmt(fmt),
            RendererError::Vulkan(ref e) => e.fmt(fmt),
            RendererError::NoSuitableDevice => {
                write!(fmt, "No vulkan device can render and present to this window")
            }
        }
    }
}

impl From<vk::Result> for RendererError {
    fn from(result: vk::Result) -> Self {
        RendererError::Vulkan(result)
    }
}

impl From<ash::LoadingError> for RendererError {
    fn from(result: ash::LoadingError) -> Self {
        RendererError::VulkanLoading(result)
    }
}
