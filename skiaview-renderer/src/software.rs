use skia_safe::{surfaces, AlphaType, Canvas, ColorType, ImageInfo, Surface};

use crate::{PhysicalSize, RendererError};

/// Owns a CPU raster surface sized to the window. The app layer copies the pixels into whatever
/// the window system presents.
#[derive(Default)]
pub struct SoftwareRenderer {
    surface: Option<Surface>,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        SoftwareRenderer { surface: None }
    }

    /// True once a surface exists, i.e. after the first non-empty resize
    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    /// Size of the current surface, if there is one
    pub fn surface_size(&self) -> Option<PhysicalSize> {
        self.surface
            .as_ref()
            .map(|surface| PhysicalSize::new(surface.width() as u32, surface.height() as u32))
    }

    /// Identifies the current pixel buffer. Changes every time the surface is recreated.
    pub fn surface_id(&self) -> Option<u32> {
        self.surface.as_ref().map(|surface| surface.unique_id())
    }

    /// Drops the current surface and creates one of `size`. An empty size leaves the renderer
    /// without a surface until the next resize.
    pub fn resize(
        &mut self,
        size: PhysicalSize,
    ) -> Result<(), RendererError> {
        self.surface = None;
        if size.is_empty() {
            debug!("Software surface size is {}, not drawing until resized", size);
            return Ok(());
        }

        // BGRA matches the 0RGB words the window buffer wants on little endian machines
        let image_info = ImageInfo::new(
            size.to_skia(),
            ColorType::BGRA8888,
            AlphaType::Premul,
            None,
        );

        let surface = surfaces::raster(&image_info, None, None).ok_or(
            RendererError::SurfaceCreation {
                width: size.width,
                height: size.height,
            },
        )?;

        debug!("Created software surface {}", size);
        self.surface = Some(surface);
        Ok(())
    }

    /// Calls `f` with the surface's canvas. Returns false (and doesn't call `f`) if there is no
    /// surface.
    pub fn draw<F: FnOnce(&Canvas)>(
        &mut self,
        f: F,
    ) -> bool {
        match self.surface {
            Some(ref mut surface) => {
                f(surface.canvas());
                true
            }
            None => false,
        }
    }

    /// Copies the surface into `dst` as one `0x00RRGGBB` word per pixel, row by row. Copies
    /// as many pixels as both buffers hold. Returns the number of pixels written.
    pub fn copy_to_xrgb(
        &mut self,
        dst: &mut [u32],
    ) -> usize {
        let surface = match self.surface {
            Some(ref mut surface) => surface,
            None => return 0,
        };

        let pixmap = match surface.peek_pixels() {
            Some(pixmap) => pixmap,
            None => return 0,
        };

        let bytes = match pixmap.bytes() {
            Some(bytes) => bytes,
            None => return 0,
        };

        let width = pixmap.width() as usize;
        let height = pixmap.height() as usize;
        let row_bytes = pixmap.row_bytes();

        let mut written = 0;
        for (y, dst_row) in dst.chunks_mut(width).take(height).enumerate() {
            let src_row = &bytes[y * row_bytes..y * row_bytes + width * 4];
            for (dst_pixel, bgra) in dst_row.iter_mut().zip(src_row.chunks_exact(4)) {
                *dst_pixel = (bgra[2] as u32) << 16 | (bgra[1] as u32) << 8 | bgra[0] as u32;
                written += 1;
            }
        }

        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FontLibrary, Scene, SceneParams};
    use skia_safe::Color;

    #[test]
    fn not_ready_before_first_resize() {
        let mut renderer = SoftwareRenderer::new();
        assert!(!renderer.is_ready());
        assert!(!renderer.draw(|_| panic!("should not draw without a surface")));
        assert_eq!(renderer.copy_to_xrgb(&mut [0; 4]), 0);
    }

    #[test]
    fn resize_creates_surface_of_requested_size() {
        let mut renderer = SoftwareRenderer::new();
        renderer.resize(PhysicalSize::new(320, 240)).unwrap();
        assert_eq!(renderer.surface_size(), Some(PhysicalSize::new(320, 240)));

        renderer.resize(PhysicalSize::new(1000, 700)).unwrap();
        assert_eq!(renderer.surface_size(), Some(PhysicalSize::new(1000, 700)));
    }

    #[test]
    fn resize_replaces_the_pixel_buffer() {
        let mut renderer = SoftwareRenderer::new();
        renderer.resize(PhysicalSize::new(64, 64)).unwrap();
        let first = renderer.surface_id().unwrap();

        renderer.resize(PhysicalSize::new(64, 64)).unwrap();
        let second = renderer.surface_id().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn empty_size_drops_surface() {
        let mut renderer = SoftwareRenderer::new();
        renderer.resize(PhysicalSize::new(64, 64)).unwrap();
        renderer.resize(PhysicalSize::new(0, 64)).unwrap();
        assert!(!renderer.is_ready());
        assert_eq!(renderer.surface_size(), None);
    }

    #[test]
    fn copies_pixels_as_xrgb() {
        let mut renderer = SoftwareRenderer::new();
        renderer.resize(PhysicalSize::new(4, 2)).unwrap();
        assert!(renderer.draw(|canvas| {
            canvas.clear(Color::from_rgb(0x12, 0x34, 0x56));
        }));

        let mut buffer = vec![0u32; 8];
        assert_eq!(renderer.copy_to_xrgb(&mut buffer), 8);
        assert!(buffer.iter().all(|pixel| *pixel == 0x0012_3456));
    }

    #[test]
    fn copy_stops_at_destination_length() {
        let mut renderer = SoftwareRenderer::new();
        renderer.resize(PhysicalSize::new(4, 4)).unwrap();
        renderer.draw(|canvas| canvas.clear(Color::WHITE));

        let mut buffer = vec![0u32; 6];
        assert_eq!(renderer.copy_to_xrgb(&mut buffer), 6);
        assert!(buffer.iter().all(|pixel| *pixel == 0x00FF_FFFF));
    }

    #[test]
    fn renders_scene_at_window_size() {
        let mut renderer = SoftwareRenderer::new();
        renderer.resize(PhysicalSize::new(100, 50)).unwrap();

        let mut scene = Scene::new(SceneParams::default());
        let fonts = FontLibrary::new();
        renderer.draw(|canvas| scene.draw(canvas, &fonts));

        let mut buffer = vec![0u32; 100 * 50];
        renderer.copy_to_xrgb(&mut buffer);
        assert_eq!(buffer[0], 0x0000_00FF);
        assert_eq!(scene.frame_count(), 1);
    }
}
