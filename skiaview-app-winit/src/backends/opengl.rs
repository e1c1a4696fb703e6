use std::ffi::CString;
use std::num::NonZeroU32;

use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasRawWindowHandle;

use skiaview_renderer::skia_safe::Canvas;
use skiaview_renderer::{GlFramebuffer, GlRenderer};
use skiaview_renderer_winit::physical_size;

use super::{non_zero_size, WindowBackend};
use crate::winit;
use crate::AppError;

// Multisampling requested from the GL config
const GL_SAMPLE_COUNT: u8 = 4;

/// Skia draws through a GL context straight into the window's default framebuffer
pub struct OpenGlBackend {
    // Ordered in drop order, skia's context goes while the GL context is still current
    renderer: GlRenderer,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: winit::window::Window,
}

impl OpenGlBackend {
    pub fn new(
        window_target: &winit::event_loop::EventLoopWindowTarget<()>,
        window_builder: winit::window::WindowBuilder,
    ) -> Result<Self, AppError> {
        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_multisampling(GL_SAMPLE_COUNT);

        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let (window, gl_config) = display_builder
            .build(window_target, template, |configs| {
                // glutin fails before calling the picker if no config matches the template
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("glutin offered no GL configs")
            })
            .map_err(|e| AppError::GlDisplay(e.to_string()))?;

        let window = window.ok_or_else(|| {
            AppError::GlDisplay("The display builder did not create a window".to_string())
        })?;

        info!(
            "Picked GL config with {} samples and {} stencil bits",
            gl_config.num_samples(),
            gl_config.stencil_size()
        );

        let raw_window_handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
        let fallback_context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(None))
            .build(Some(raw_window_handle));

        let not_current_context = unsafe {
            match gl_display.create_context(&gl_config, &context_attributes) {
                Ok(context) => context,
                Err(e) => {
                    debug!("Desktop GL context unavailable ({}), trying GLES", e);
                    gl_display.create_context(&gl_config, &fallback_context_attributes)?
                }
            }
        };

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
        );
        let gl_surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes)? };
        let gl_context = not_current_context.make_current(&gl_surface)?;

        let framebuffer = GlFramebuffer {
            fboid: 0,
            sample_count: gl_config.num_samples() as usize,
            stencil_bits: gl_config.stencil_size() as usize,
        };

        let renderer = GlRenderer::new(
            |name| {
                // Skia looks this one up on EGL, it is not needed for drawing
                if name == "eglGetCurrentDisplay" {
                    return std::ptr::null();
                }
                match CString::new(name) {
                    Ok(name) => gl_display.get_proc_address(name.as_c_str()),
                    Err(_) => std::ptr::null(),
                }
            },
            framebuffer,
        )?;

        let mut backend = OpenGlBackend {
            renderer,
            gl_surface,
            gl_context,
            window,
        };

        backend.resize(size)?;
        Ok(backend)
    }
}

impl WindowBackend for OpenGlBackend {
    fn window(&self) -> &winit::window::Window {
        &self.window
    }

    fn resize(
        &mut self,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<(), AppError> {
        if let Some((width, height)) = non_zero_size(size) {
            self.gl_surface.resize(&self.gl_context, width, height);
        }
        self.renderer.resize(physical_size(size))?;
        Ok(())
    }

    fn render(
        &mut self,
        draw: &mut dyn FnMut(&Canvas),
    ) -> Result<bool, AppError> {
        if !self.renderer.draw(|canvas| draw(canvas)) {
            return Ok(false);
        }

        self.gl_surface.swap_buffers(&self.gl_context)?;
        Ok(true)
    }
}
