//! A window paired with the mechanism that gets skia's pixels onto it

use std::num::NonZeroU32;

use skiaview_renderer::skia_safe::Canvas;
use skiaview_renderer::{BackendKind, VulkanOptions};

use crate::winit;
use crate::AppError;

mod opengl;
pub use opengl::OpenGlBackend;

mod software;
pub use software::SoftwareBackend;

mod vulkan;
pub use vulkan::VulkanBackend;

/// Owns the window and everything needed to present skia drawing in it
pub trait WindowBackend {
    fn window(&self) -> &winit::window::Window;

    /// Called when the window's inner size changes. A zero size means nothing is drawn until the
    /// next non-zero resize.
    fn resize(
        &mut self,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<(), AppError>;

    /// Draws one frame with `draw` and presents it. Returns false if nothing was presented.
    fn render(
        &mut self,
        draw: &mut dyn FnMut(&Canvas),
    ) -> Result<bool, AppError>;
}

/// Creates the window described by `window_builder` along with the backend for `kind`
pub fn create_backend(
    kind: BackendKind,
    window_target: &winit::event_loop::EventLoopWindowTarget<()>,
    window_builder: winit::window::WindowBuilder,
    vulkan_options: &VulkanOptions,
) -> Result<Box<dyn WindowBackend>, AppError> {
    info!("Creating {} backend", kind);
    Ok(match kind {
        BackendKind::OpenGl => Box::new(OpenGlBackend::new(window_target, window_builder)?),
        BackendKind::Software => Box::new(SoftwareBackend::new(window_target, window_builder)?),
        BackendKind::Vulkan => Box::new(VulkanBackend::new(
            window_target,
            window_builder,
            vulkan_options,
        )?),
    })
}

// None while minimized, glutin and softbuffer only take non-zero sizes
fn non_zero_size(size: winit::dpi::PhysicalSize<u32>) -> Option<(NonZeroU32, NonZeroU32)> {
    Some((NonZeroU32::new(size.width)?, NonZeroU32::new(size.height)?))
}
