//! Skia surface owners for skiaview.
//!
//! Everything in this crate is independent of the windowing library. The app layer hands in
//! sizes, a GL proc-address loader or a [`Window`] for Vulkan surface creation, and gets back a
//! canvas to draw on.

#[macro_use]
extern crate log;

pub use ash;
pub use skia_safe;

mod coordinates;
pub use coordinates::PhysicalSize;

mod error;
pub use error::RendererError;

mod backend;
pub use backend::BackendKind;
pub use backend::ParseBackendKindError;

mod fonts;
pub use fonts::FontLibrary;

mod scene;
pub use scene::Scene;
pub use scene::SceneLayout;
pub use scene::SceneParams;

mod software;
pub use software::SoftwareRenderer;

mod gl_support;
pub use gl_support::GlFramebuffer;
pub use gl_support::GlRenderer;

mod window_support;
pub use window_support::Window;

mod vulkan;
pub use vulkan::choose_sample_count;
pub use vulkan::VkRenderer;
pub use vulkan::VulkanOptions;
