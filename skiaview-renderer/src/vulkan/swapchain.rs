use ash::extensions::khr;
use ash::vk;

use super::VkDevice;
use super::VkInstance;
use crate::PhysicalSize;

pub struct SwapchainInfo {
    pub surface_format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extents: vk::Extent2D,
}

pub struct VkSwapchain {
    pub swapchain_info: SwapchainInfo,
    pub swapchain_loader: khr::Swapchain,
    pub swapchain: vk::SwapchainKHR,
    pub swapchain_images: Vec<vk::Image>,
}

impl VkSwapchain {
    /// Creates a swapchain for the device's surface. Passing the previous swapchain lets the
    /// driver recycle its resources, it still has to be dropped by the caller.
    pub fn new(
        instance: &VkInstance,
        device: &VkDevice,
        window_size: PhysicalSize,
        old_swapchain: Option<vk::SwapchainKHR>,
    ) -> Result<VkSwapchain, vk::Result> {
        let surface_loader = &device.surface_loader;
        let (available_formats, surface_capabilities) = unsafe {
            (
                surface_loader
                    .get_physical_device_surface_formats(device.physical_device, device.surface)?,
                surface_loader.get_physical_device_surface_capabilities(
                    device.physical_device,
                    device.surface,
                )?,
            )
        };

        let surface_format = Self::choose_format(&available_formats);
        let present_mode = Self::choose_present_mode();
        let extents = Self::choose_extents(&surface_capabilities, window_size);

        let mut image_count = surface_capabilities.min_image_count + 1;
        if surface_capabilities.max_image_count > 0 {
            image_count = image_count.min(surface_capabilities.max_image_count);
        }

        let pre_transform = if surface_capabilities
            .supported_transforms
            .contains(vk::SurfaceTransformFlagsKHR::IDENTITY)
        {
            vk::SurfaceTransformFlagsKHR::IDENTITY
        } else {
            surface_capabilities.current_transform
        };

        // Skia copies through transfer usage when it can, but only color attachment is required
        let image_usage = vk::ImageUsageFlags::COLOR_ATTACHMENT
            | (surface_capabilities.supported_usage_flags
                & (vk::ImageUsageFlags::TRANSFER_SRC | vk::ImageUsageFlags::TRANSFER_DST));

        info!(
            "Create swapchain {}x{} {:?} {:?} with {} images",
            extents.width, extents.height, surface_format.format, present_mode, image_count
        );

        let swapchain_create_info = vk::SwapchainCreateInfoKHR::builder()
            .surface(device.surface)
            .min_image_count(image_count)
            .image_format(surface_format.format)
            .image_color_space(surface_format.color_space)
            .image_extent(extents)
            .image_array_layers(1)
            .image_usage(image_usage)
            .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            .pre_transform(pre_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .old_swapchain(old_swapchain.unwrap_or_else(vk::SwapchainKHR::null));

        let swapchain_loader = khr::Swapchain::new(&instance.instance, &device.logical_device);
        let swapchain = unsafe { swapchain_loader.create_swapchain(&swapchain_create_info, None)? };

        let swapchain_images = match unsafe { swapchain_loader.get_swapchain_images(swapchain) } {
            Ok(images) => images,
            Err(e) => {
                unsafe { swapchain_loader.destroy_swapchain(swapchain, None) };
                return Err(e);
            }
        };

        Ok(VkSwapchain {
            swapchain_info: SwapchainInfo {
                surface_format,
                present_mode,
                extents,
            },
            swapchain_loader,
            swapchain,
            swapchain_images,
        })
    }

    // Skia can wrap both of these, BGRA is the common one on desktop
    fn choose_format(available_formats: &[vk::SurfaceFormatKHR]) -> vk::SurfaceFormatKHR {
        let preferred = [vk::Format::B8G8R8A8_UNORM, vk::Format::R8G8B8A8_UNORM];
        for format in preferred.iter() {
            if let Some(found) = available_formats.iter().find(|available| {
                available.format == *format
                    && available.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
            }) {
                return *found;
            }
        }

        // A single UNDEFINED entry means the surface takes any format
        match available_formats.first() {
            Some(first) if first.format != vk::Format::UNDEFINED => *first,
            _ => vk::SurfaceFormatKHR {
                format: vk::Format::B8G8R8A8_UNORM,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            },
        }
    }

    // FIFO is always available and paces frames to the display
    fn choose_present_mode() -> vk::PresentModeKHR {
        vk::PresentModeKHR::FIFO
    }

    fn choose_extents(
        surface_capabilities: &vk::SurfaceCapabilitiesKHR,
        window_size: PhysicalSize,
    ) -> vk::Extent2D {
        if surface_capabilities.current_extent.width != u32::MAX {
            return surface_capabilities.current_extent;
        }

        let min = surface_capabilities.min_image_extent;
        let max = surface_capabilities.max_image_extent;
        vk::Extent2D {
            width: window_size.width.clamp(min.width, max.width),
            height: window_size.height.clamp(min.height, max.height),
        }
    }
}

impl Drop for VkSwapchain {
    fn drop(&mut self) {
        debug!("destroying VkSwapchain");
        unsafe {
            self.swapchain_loader
                .destroy_swapchain(self.swapchain, None);
        }
        debug!("destroyed VkSwapchain");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_format(format: vk::Format) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        }
    }

    #[test]
    fn prefers_bgra_then_rgba() {
        let formats = [
            surface_format(vk::Format::R8G8B8A8_UNORM),
            surface_format(vk::Format::B8G8R8A8_UNORM),
        ];
        assert_eq!(VkSwapchain::choose_format(&formats).format, vk::Format::B8G8R8A8_UNORM);

        let formats = [
            surface_format(vk::Format::A2B10G10R10_UNORM_PACK32),
            surface_format(vk::Format::R8G8B8A8_UNORM),
        ];
        assert_eq!(VkSwapchain::choose_format(&formats).format, vk::Format::R8G8B8A8_UNORM);
    }

    #[test]
    fn undefined_format_means_anything_goes() {
        let formats = [surface_format(vk::Format::UNDEFINED)];
        assert_eq!(VkSwapchain::choose_format(&formats).format, vk::Format::B8G8R8A8_UNORM);
    }

    #[test]
    fn presents_with_fifo() {
        assert_eq!(VkSwapchain::choose_present_mode(), vk::PresentModeKHR::FIFO);
    }

    #[test]
    fn extents_follow_surface_or_clamp_window_size() {
        let mut capabilities = vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D {
                width: 800,
                height: 600,
            },
            min_image_extent: vk::Extent2D {
                width: 1,
                height: 1,
            },
            max_image_extent: vk::Extent2D {
                width: 4096,
                height: 4096,
            },
            ..Default::default()
        };
        let extents = VkSwapchain::choose_extents(&capabilities, PhysicalSize::new(1000, 700));
        assert_eq!((extents.width, extents.height), (800, 600));

        capabilities.current_extent.width = u32::MAX;
        let extents = VkSwapchain::choose_extents(&capabilities, PhysicalSize::new(5000, 700));
        assert_eq!((extents.width, extents.height), (4096, 700));
    }
}
