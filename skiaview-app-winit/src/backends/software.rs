use std::rc::Rc;

use skiaview_renderer::skia_safe::Canvas;
use skiaview_renderer::SoftwareRenderer;
use skiaview_renderer_winit::physical_size;

use super::{non_zero_size, WindowBackend};
use crate::winit;
use crate::AppError;

type Window = Rc<winit::window::Window>;

/// Rasterizes on the CPU and copies the pixels into a softbuffer surface
pub struct SoftwareBackend {
    renderer: SoftwareRenderer,
    surface: softbuffer::Surface<Window, Window>,
    _context: softbuffer::Context<Window>,
    window: Window,
}

impl SoftwareBackend {
    pub fn new(
        window_target: &winit::event_loop::EventLoopWindowTarget<()>,
        window_builder: winit::window::WindowBuilder,
    ) -> Result<Self, AppError> {
        let window = Rc::new(window_builder.build(window_target)?);
        let context = softbuffer::Context::new(window.clone())?;
        let surface = softbuffer::Surface::new(&context, window.clone())?;

        let mut backend = SoftwareBackend {
            renderer: SoftwareRenderer::new(),
            surface,
            _context: context,
            window,
        };

        let size = backend.window.inner_size();
        backend.resize(size)?;
        Ok(backend)
    }
}

impl WindowBackend for SoftwareBackend {
    fn window(&self) -> &winit::window::Window {
        &self.window
    }

    fn resize(
        &mut self,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<(), AppError> {
        self.renderer.resize(physical_size(size))?;
        if let Some((width, height)) = non_zero_size(size) {
            self.surface.resize(width, height)?;
        }
        Ok(())
    }

    fn render(
        &mut self,
        draw: &mut dyn FnMut(&Canvas),
    ) -> Result<bool, AppError> {
        if !self.renderer.draw(|canvas| draw(canvas)) {
            return Ok(false);
        }

        let mut buffer = self.surface.buffer_mut()?;
        let copied = self.renderer.copy_to_xrgb(&mut buffer);
        if copied != buffer.len() {
            trace!("Copied {} of {} pixels into the window buffer", copied, buffer.len());
        }
        buffer.present()?;
        Ok(true)
    }
}
