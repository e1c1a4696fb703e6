#[macro_use]
extern crate log;

mod app;
pub use app::App;
pub use app::AppBuilder;
pub use app::AppDrawArgs;
pub use app::AppError;
pub use app::AppHandler;

mod app_control;
pub use app_control::AppControl;

mod backends;
pub use backends::create_backend;
pub use backends::WindowBackend;

mod frame_stats;
pub use frame_stats::FrameStats;

mod util;
pub use util::PeriodicEvent;

pub use skiaview_renderer::skia_safe;
pub use skiaview_renderer::BackendKind;
pub use skiaview_renderer::VulkanOptions;
pub use skiaview_renderer_winit::winit;

// These are re-exported winit types
pub use winit::dpi::LogicalSize;
pub use winit::dpi::PhysicalSize;
pub use winit::dpi::Size;
