use skiaview_renderer::skia_safe::Canvas;
use skiaview_renderer::{VkRenderer, VulkanOptions};
use skiaview_renderer_winit::{physical_size, WinitWindow};

use super::WindowBackend;
use crate::winit;
use crate::AppError;

/// Skia draws into the swapchain images of a vulkan surface created for the window
pub struct VulkanBackend {
    // The renderer owns the vulkan surface, so it must go before the window
    renderer: VkRenderer,
    window: winit::window::Window,
}

impl VulkanBackend {
    pub fn new(
        window_target: &winit::event_loop::EventLoopWindowTarget<()>,
        window_builder: winit::window::WindowBuilder,
        vulkan_options: &VulkanOptions,
    ) -> Result<Self, AppError> {
        let window = window_builder.build(window_target)?;
        let renderer = VkRenderer::new(&WinitWindow::new(&window), vulkan_options)?;
        Ok(VulkanBackend { renderer, window })
    }
}

impl WindowBackend for VulkanBackend {
    fn window(&self) -> &winit::window::Window {
        &self.window
    }

    fn resize(
        &mut self,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<(), AppError> {
        self.renderer.resize(physical_size(size));
        Ok(())
    }

    fn render(
        &mut self,
        draw: &mut dyn FnMut(&Canvas),
    ) -> Result<bool, AppError> {
        Ok(self.renderer.draw(|canvas| draw(canvas))?)
    }
}
