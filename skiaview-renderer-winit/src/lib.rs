//! Glue between winit windows and the windowing-independent renderer crate

pub use winit;

use std::os::raw::c_char;

use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};
use skiaview_renderer::ash;
use skiaview_renderer::ash::prelude::VkResult;
use skiaview_renderer::ash::vk;
use skiaview_renderer::PhysicalSize;
use skiaview_renderer::Window;

#[derive(Clone)]
pub struct WinitWindow<'a> {
    window: &'a winit::window::Window,
}

impl<'a> WinitWindow<'a> {
    pub fn new(window: &'a winit::window::Window) -> Self {
        WinitWindow { window }
    }
}

impl<'a> Window for WinitWindow<'a> {
    fn physical_size(&self) -> PhysicalSize {
        physical_size(self.window.inner_size())
    }

    unsafe fn create_vulkan_surface(
        &self,
        entry: &ash::Entry,
        instance: &ash::Instance,
    ) -> VkResult<vk::SurfaceKHR> {
        ash_window::create_surface(
            entry,
            instance,
            self.window.raw_display_handle(),
            self.window.raw_window_handle(),
            None,
        )
    }

    fn extension_names(&self) -> VkResult<Vec<*const c_char>> {
        let extensions =
            ash_window::enumerate_required_extensions(self.window.raw_display_handle())?;
        log::debug!("Window requires {} vulkan instance extensions", extensions.len());
        Ok(extensions.to_vec())
    }
}

/// Converts a winit size into the renderer's size type
pub fn physical_size(size: winit::dpi::PhysicalSize<u32>) -> PhysicalSize {
    PhysicalSize::new(size.width, size.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_winit_sizes() {
        let size = physical_size(winit::dpi::PhysicalSize::new(1200, 800));
        assert_eq!(size, PhysicalSize::new(1200, 800));
        assert!(physical_size(winit::dpi::PhysicalSize::new(0, 800)).is_empty());
    }
}
