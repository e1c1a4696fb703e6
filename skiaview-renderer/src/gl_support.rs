use std::ffi::c_void;

use skia_safe::gpu::{self, gl, DirectContext, SurfaceOrigin};
use skia_safe::{Canvas, ColorType, Surface};

use crate::{PhysicalSize, RendererError};

/// Describes the GL framebuffer skia should draw into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlFramebuffer {
    /// 0 for the window's default framebuffer
    pub fboid: u32,
    pub sample_count: usize,
    pub stencil_bits: usize,
}

impl Default for GlFramebuffer {
    fn default() -> Self {
        GlFramebuffer {
            fboid: 0,
            sample_count: 0,
            stencil_bits: 8,
        }
    }
}

/// Owns a skia GL context and a surface wrapping the window's framebuffer.
///
/// The GL context this is created against must be current whenever any method is called.
pub struct GlRenderer {
    // Surface must be dropped before the context
    surface: Option<Surface>,
    context: DirectContext,
    framebuffer: GlFramebuffer,
}

impl GlRenderer {
    /// Creates the skia GL context. `load_fn` resolves GL function names, usually through the
    /// windowing library's `get_proc_address`.
    pub fn new<F>(
        load_fn: F,
        framebuffer: GlFramebuffer,
    ) -> Result<Self, RendererError>
    where
        F: FnMut(&str) -> *const c_void,
    {
        let interface = gl::Interface::new_load_with(load_fn).ok_or_else(|| {
            RendererError::ContextCreation("Could not assemble a GL interface".to_string())
        })?;

        let context = gpu::direct_contexts::make_gl(interface, None).ok_or_else(|| {
            RendererError::ContextCreation("Failed to create skia GL direct context".to_string())
        })?;

        info!(
            "Created skia GL context (framebuffer {}, {} samples, {} stencil bits)",
            framebuffer.fboid, framebuffer.sample_count, framebuffer.stencil_bits
        );

        Ok(GlRenderer {
            surface: None,
            context,
            framebuffer,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface_size(&self) -> Option<PhysicalSize> {
        self.surface
            .as_ref()
            .map(|surface| PhysicalSize::new(surface.width() as u32, surface.height() as u32))
    }

    /// Re-wraps the framebuffer at `size`. Call after the window's GL surface was resized.
    pub fn resize(
        &mut self,
        size: PhysicalSize,
    ) -> Result<(), RendererError> {
        self.surface = None;
        if size.is_empty() {
            return Ok(());
        }

        let framebuffer_info = gl::FramebufferInfo {
            fboid: self.framebuffer.fboid,
            format: gl::Format::RGBA8.into(),
            ..Default::default()
        };

        let backend_render_target = gpu::backend_render_targets::make_gl(
            size.to_skia(),
            self.framebuffer.sample_count,
            self.framebuffer.stencil_bits,
            framebuffer_info,
        );

        let surface = gpu::surfaces::wrap_backend_render_target(
            &mut self.context,
            &backend_render_target,
            SurfaceOrigin::BottomLeft,
            ColorType::RGBA8888,
            None,
            None,
        )
        .ok_or(RendererError::SurfaceCreation {
            width: size.width,
            height: size.height,
        })?;

        debug!("Wrapped GL framebuffer at {}", size);
        self.surface = Some(surface);
        Ok(())
    }

    /// Calls `f` with the canvas and flushes the GL commands. The caller still has to swap
    /// buffers. Returns false if there is no surface to draw on.
    pub fn draw<F: FnOnce(&Canvas)>(
        &mut self,
        f: F,
    ) -> bool {
        let surface = match self.surface {
            Some(ref mut surface) => surface,
            None => return false,
        };

        f(surface.canvas());
        self.context.flush_and_submit();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_failure_is_an_error() {
        let result = GlRenderer::new(|_| std::ptr::null(), GlFramebuffer::default());
        match result {
            Err(RendererError::ContextCreation(_)) => {}
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("a null GL loader must not produce a renderer"),
        }
    }
}
