//! Skia in a winit window, three ways
//!
//! The same animated scene (a rotating line and a growing counter) is drawn through one of three
//! backends picked at startup:
//!
//! * `opengl`: skia renders through a GL context into the window's framebuffer
//! * `software`: skia rasterizes on the CPU and the pixels are copied into the window
//! * `vulkan`: skia renders into the images of a vulkan swapchain
//!
//! The pieces live in their own crates. `skiaview_renderer` has everything that doesn't depend
//! on the windowing library, `skiaview_app_winit` runs the event loop and owns the window. This
//! crate adds the configuration and the demo app handler used by the `skiaview` binary.

#[macro_use]
extern crate log;

pub mod config;
pub use config::AppConfig;
pub use config::ConfigError;

mod demo;
pub use demo::DemoApp;

pub use skiaview_app_winit as app;
pub use skiaview_renderer::BackendKind;
pub use skiaview_renderer::FontLibrary;
pub use skiaview_renderer::Scene;
pub use skiaview_renderer::SceneParams;

// Export these crates so that downstream crates can easily use the same version of them as we do
pub use skiaview_renderer::ash;
pub use skiaview_renderer::skia_safe;
pub use skiaview_renderer_winit::winit;
