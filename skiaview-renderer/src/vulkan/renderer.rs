use ash::vk;
use skia_safe::gpu::FlushInfo;
use skia_safe::surfaces::BackendSurfaceAccess;
use skia_safe::{Canvas, SamplingOptions, Surface};

use super::msaa::choose_sample_count;
use super::VkDevice;
use super::VkInstance;
use super::VkSkiaContext;
use super::VkSwapchain;
use super::VulkanOptions;
use crate::{PhysicalSize, RendererError, Window};

/// Vulkan renderer that creates and manages the vulkan instance, device and swapchain, and lets
/// skia draw straight into the swapchain images.
///
/// One frame is in flight at a time. Acquiring an image waits on a fence and skia's work is
/// synced with the CPU before presenting, so no semaphores are involved.
pub struct VkRenderer {
    // Ordered in drop order
    msaa_surface: Option<Surface>,
    skia_surfaces: Vec<Surface>,
    skia_context: VkSkiaContext,
    image_acquired_fence: vk::Fence,
    swapchain: Option<VkSwapchain>,
    device: VkDevice,
    instance: VkInstance,

    sample_count: u32,
    window_size: PhysicalSize,
    needs_recreate: bool,
}

impl VkRenderer {
    /// Create the renderer. The window is only used to create the vulkan surface and read the
    /// initial size.
    pub fn new(
        window: &dyn Window,
        options: &VulkanOptions,
    ) -> Result<VkRenderer, RendererError> {
        let extension_names = window.extension_names()?;
        let instance = VkInstance::new(&extension_names, options.validation)?;

        info!("Create vulkan surface");
        let surface = unsafe { window.create_vulkan_surface(&instance.entry, &instance.instance)? };
        let device = VkDevice::new(&instance, surface)?;

        let skia_context = VkSkiaContext::new(&instance, &device)?;

        let sample_count =
            choose_sample_count(&device.supported_sample_counts, options.max_sample_count);
        info!("Using sample count {}", sample_count);

        let fence_create_info = vk::FenceCreateInfo::builder();
        let image_acquired_fence =
            unsafe { device.logical_device.create_fence(&fence_create_info, None)? };

        let mut renderer = VkRenderer {
            msaa_surface: None,
            skia_surfaces: vec![],
            skia_context,
            image_acquired_fence,
            swapchain: None,
            device,
            instance,
            sample_count,
            window_size: window.physical_size(),
            needs_recreate: true,
        };

        renderer.recreate_swapchain()?;
        Ok(renderer)
    }

    /// Sample count picked at startup, 1 if there is no multisampling
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Size of the swapchain images, if there is a swapchain
    pub fn surface_size(&self) -> Option<PhysicalSize> {
        self.swapchain.as_ref().map(|swapchain| {
            let extents = swapchain.swapchain_info.extents;
            PhysicalSize::new(extents.width, extents.height)
        })
    }

    /// Records the new window size. The swapchain is rebuilt before the next frame.
    pub fn resize(
        &mut self,
        size: PhysicalSize,
    ) {
        if size != self.window_size {
            debug!("Vulkan window resized to {}", size);
            self.window_size = size;
            self.needs_recreate = true;
        }
    }

    /// Draws one frame with `f` and presents it. Returns false if no frame was presented, which
    /// happens while the window has no area or while the swapchain is out of date.
    pub fn draw<F: FnOnce(&Canvas)>(
        &mut self,
        f: F,
    ) -> Result<bool, RendererError> {
        if self.needs_recreate {
            self.recreate_swapchain()?;
        }

        let swapchain = match self.swapchain.as_ref() {
            Some(swapchain) => swapchain,
            None => return Ok(false),
        };

        let logical_device = &self.device.logical_device;
        let fences = [self.image_acquired_fence];
        unsafe { logical_device.reset_fences(&fences)? };

        let acquire_result = unsafe {
            swapchain.swapchain_loader.acquire_next_image(
                swapchain.swapchain,
                u64::MAX,
                vk::Semaphore::null(),
                self.image_acquired_fence,
            )
        };

        let present_index = match acquire_result {
            Ok((present_index, suboptimal)) => {
                if suboptimal {
                    self.needs_recreate = true;
                }
                present_index
            }
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                debug!("Swapchain out of date on acquire");
                self.needs_recreate = true;
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        unsafe { logical_device.wait_for_fences(&fences, true, u64::MAX)? };

        let surface = match self.skia_surfaces.get_mut(present_index as usize) {
            Some(surface) => surface,
            None => {
                warn!("Acquired swapchain image {} has no skia surface", present_index);
                self.needs_recreate = true;
                return Ok(false);
            }
        };

        match self.msaa_surface {
            Some(ref mut msaa_surface) => {
                f(msaa_surface.canvas());
                msaa_surface.draw(
                    surface.canvas(),
                    (0, 0),
                    SamplingOptions::default(),
                    None,
                );
            }
            None => f(surface.canvas()),
        }

        let context = &mut self.skia_context.context;
        context.flush_surface_with_access(
            surface,
            BackendSurfaceAccess::Present,
            &FlushInfo::default(),
        );
        context.flush_submit_and_sync_cpu();

        let swapchains = [swapchain.swapchain];
        let image_indices = [present_index];
        let present_info = vk::PresentInfoKHR::builder()
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let present_result = unsafe {
            swapchain
                .swapchain_loader
                .queue_present(self.device.queue, &present_info)
        };

        match present_result {
            Ok(false) => {}
            Ok(true) | Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                debug!("Swapchain suboptimal or out of date on present");
                self.needs_recreate = true;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(true)
    }

    fn recreate_swapchain(&mut self) -> Result<(), RendererError> {
        unsafe { self.device.logical_device.device_wait_idle()? };

        self.msaa_surface = None;
        self.skia_surfaces.clear();
        self.needs_recreate = false;

        if self.window_size.is_empty() {
            debug!("Window size is {}, dropping swapchain until resized", self.window_size);
            self.swapchain = None;
            return Ok(());
        }

        let old_swapchain = self.swapchain.take();
        let swapchain = VkSwapchain::new(
            &self.instance,
            &self.device,
            self.window_size,
            old_swapchain.as_ref().map(|old| old.swapchain),
        )?;
        std::mem::drop(old_swapchain);

        let format = swapchain.swapchain_info.surface_format.format;
        let extents = swapchain.swapchain_info.extents;
        if extents.width == 0 || extents.height == 0 {
            debug!("Surface extents are empty, not drawing until resized");
            return Ok(());
        }

        for image in &swapchain.swapchain_images {
            let surface = self
                .skia_context
                .wrap_swapchain_image(*image, format, extents)?;
            self.skia_surfaces.push(surface);
        }

        if self.sample_count > 1 {
            self.msaa_surface = Some(self.skia_context.create_msaa_surface(
                format,
                extents,
                self.sample_count,
            )?);
        }

        debug!(
            "Wrapped {} swapchain images for skia, presenting with {:?}",
            self.skia_surfaces.len(),
            swapchain.swapchain_info.present_mode
        );
        self.swapchain = Some(swapchain);
        Ok(())
    }
}

impl Drop for VkRenderer {
    fn drop(&mut self) {
        debug!("destroying VkRenderer");

        unsafe {
            // Nothing sensible can be done about a failure this late
            let _ = self.device.logical_device.device_wait_idle();
            self.msaa_surface = None;
            self.skia_surfaces.clear();
            self.device
                .logical_device
                .destroy_fence(self.image_acquired_fence, None);
        }

        debug!("destroyed VkRenderer");
    }
}
