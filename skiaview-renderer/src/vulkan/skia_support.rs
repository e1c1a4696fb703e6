use ash::vk;
use ash::vk::Handle;
use skia_safe::gpu::{self, vk as skia_vk, DirectContext, SurfaceOrigin};
use skia_safe::{AlphaType, ColorType, ImageInfo, Surface};

use super::VkDevice;
use super::VkInstance;
use crate::RendererError;

/// Handles setting up skia to use the same vulkan instance and device we initialize
pub struct VkSkiaContext {
    pub context: DirectContext,
}

impl VkSkiaContext {
    pub fn new(
        instance: &VkInstance,
        device: &VkDevice,
    ) -> Result<Self, RendererError> {
        let get_proc = |of| unsafe {
            match Self::get_proc(instance, of) {
                Some(f) => f as _,
                None => {
                    error!("resolve of vulkan function for skia failed");
                    std::ptr::null()
                }
            }
        };

        info!(
            "Setting up skia backend context with queue family index {}",
            device.queue_family_index
        );

        let backend_context = unsafe {
            skia_vk::BackendContext::new(
                instance.instance.handle().as_raw() as _,
                device.physical_device.as_raw() as _,
                device.logical_device.handle().as_raw() as _,
                (
                    device.queue.as_raw() as _,
                    device.queue_family_index as usize,
                ),
                &get_proc,
            )
        };

        let context =
            gpu::direct_contexts::make_vulkan(&backend_context, None).ok_or_else(|| {
                RendererError::ContextCreation(
                    "Failed to create skia vulkan direct context".to_string(),
                )
            })?;

        Ok(VkSkiaContext { context })
    }

    unsafe fn get_proc(
        instance: &VkInstance,
        of: skia_vk::GetProcOf,
    ) -> Option<unsafe extern "system" fn()> {
        match of {
            skia_vk::GetProcOf::Instance(instance_proc, name) => {
                let ash_instance = vk::Instance::from_raw(instance_proc as _);
                instance.entry.get_instance_proc_addr(ash_instance, name)
            }
            skia_vk::GetProcOf::Device(device_proc, name) => {
                let ash_device = vk::Device::from_raw(device_proc as _);
                instance.instance.get_device_proc_addr(ash_device, name)
            }
        }
    }

    /// Wraps a swapchain image so skia can draw directly into it. Skia tracks the image layout
    /// from here on, starting from UNDEFINED.
    pub fn wrap_swapchain_image(
        &mut self,
        image: vk::Image,
        format: vk::Format,
        extents: vk::Extent2D,
    ) -> Result<Surface, RendererError> {
        let (skia_format, color_type) = skia_format(format);

        let image_info = unsafe {
            skia_vk::ImageInfo::new(
                image.as_raw() as _,
                skia_vk::Alloc::default(),
                skia_vk::ImageTiling::OPTIMAL,
                skia_vk::ImageLayout::UNDEFINED,
                skia_format,
                1,
                None,
                None,
                None,
                None,
            )
        };

        let render_target = gpu::backend_render_targets::make_vk(
            (extents.width as i32, extents.height as i32),
            &image_info,
        );

        gpu::surfaces::wrap_backend_render_target(
            &mut self.context,
            &render_target,
            SurfaceOrigin::TopLeft,
            color_type,
            None,
            None,
        )
        .ok_or(RendererError::SurfaceCreation {
            width: extents.width,
            height: extents.height,
        })
    }

    /// Creates a skia owned multisampled surface the scene is drawn to before it is composited
    /// onto a swapchain image
    pub fn create_msaa_surface(
        &mut self,
        format: vk::Format,
        extents: vk::Extent2D,
        sample_count: u32,
    ) -> Result<Surface, RendererError> {
        let (_, color_type) = skia_format(format);
        let image_info = ImageInfo::new(
            (extents.width as i32, extents.height as i32),
            color_type,
            AlphaType::Premul,
            None,
        );

        gpu::surfaces::render_target(
            &mut self.context,
            gpu::Budgeted::Yes,
            &image_info,
            sample_count as usize,
            SurfaceOrigin::TopLeft,
            None,
            false,
            None,
        )
        .ok_or(RendererError::SurfaceCreation {
            width: extents.width,
            height: extents.height,
        })
    }
}

// Only the two formats the swapchain prefers are expected here
fn skia_format(format: vk::Format) -> (skia_vk::Format, ColorType) {
    match format {
        vk::Format::R8G8B8A8_UNORM => (skia_vk::Format::R8G8B8A8_UNORM, ColorType::RGBA8888),
        vk::Format::B8G8R8A8_UNORM => (skia_vk::Format::B8G8R8A8_UNORM, ColorType::BGRA8888),
        _ => {
            warn!("Unexpected swapchain format {:?}, treating it as BGRA", format);
            (skia_vk::Format::B8G8R8A8_UNORM, ColorType::BGRA8888)
        }
    }
}

