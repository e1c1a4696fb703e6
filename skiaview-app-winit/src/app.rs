//! Contains the main types a user needs to interact with to configure and run a skiaview app

use crate::skia_safe;
use crate::winit;

use super::app_control::AppControl;
use super::backends::{create_backend, WindowBackend};
use super::frame_stats::FrameStats;
use super::util::PeriodicEvent;

use skiaview_renderer::BackendKind;
use skiaview_renderer::RendererError;
use skiaview_renderer::VulkanOptions;
use winit::dpi::{LogicalSize, PhysicalSize, Size};
use winit::event::{Event, WindowEvent};

/// Represents an error from creating the window, the backend or rendering a frame
#[derive(Debug)]
pub enum AppError {
    Renderer(RendererError),
    Os(winit::error::OsError),
    EventLoop(winit::error::EventLoopError),
    Gl(glutin::error::Error),
    GlDisplay(String),
    SoftBuffer(softbuffer::SoftBufferError),
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            AppError::Renderer(ref e) => Some(e),
            AppError::Os(ref e) => Some(e),
            AppError::EventLoop(ref e) => Some(e),
            AppError::Gl(ref e) => Some(e),
            AppError::GlDisplay(_) => None,
            AppError::SoftBuffer(ref e) => Some(e),
        }
    }
}

impl core::fmt::Display for AppError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            AppError::Renderer(ref e) => e.fmt(fmt),
            AppError::Os(ref e) => e.fmt(fmt),
            AppError::EventLoop(ref e) => e.fmt(fmt),
            AppError::Gl(ref e) => e.fmt(fmt),
            AppError::GlDisplay(ref message) => {
                write!(fmt, "Could not create GL display: {}", message)
            }
            AppError::SoftBuffer(ref e) => e.fmt(fmt),
        }
    }
}

impl From<RendererError> for AppError {
    fn from(result: RendererError) -> Self {
        AppError::Renderer(result)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(result: winit::error::OsError) -> Self {
        AppError::Os(result)
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(result: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(result)
    }
}

impl From<glutin::error::Error> for AppError {
    fn from(result: glutin::error::Error) -> Self {
        AppError::Gl(result)
    }
}

impl From<softbuffer::SoftBufferError> for AppError {
    fn from(result: softbuffer::SoftBufferError) -> Self {
        AppError::SoftBuffer(result)
    }
}

/// Passed to `AppHandler::draw`. Calling `enqueue_terminate_process` on `app_control` exits the
/// app once the frame has been presented.
pub struct AppDrawArgs<'a, 'b, 'c> {
    pub app_control: &'a mut AppControl,
    pub frame_stats: &'b FrameStats,
    pub canvas: &'c skia_safe::Canvas,
}

/// A skiaview app requires implementing the AppHandler.
///
/// `draw` is called when winit provides a `WindowEvent::RedrawRequested` message. A new redraw is
/// requested after every frame, so it is called continuously while the window is visible.
pub trait AppHandler {
    /// Called every frame, this is the intended place to put drawing code
    fn draw(
        &mut self,
        draw_args: AppDrawArgs,
    );

    /// Called once if creating the window or rendering fails. The app exits afterwards and
    /// `AppBuilder::run` returns the same error.
    fn fatal_error(
        &mut self,
        error: &AppError,
    );
}

/// Used to configure the app behavior and create the app
pub struct AppBuilder {
    backend: BackendKind,
    inner_size: Size,
    min_inner_size: Option<Size>,
    window_title: String,
    vulkan_options: VulkanOptions,
}

impl Default for AppBuilder {
    fn default() -> Self {
        AppBuilder::new()
    }
}

impl AppBuilder {
    /// Construct the app builder initialized with default options
    pub fn new() -> Self {
        AppBuilder {
            backend: BackendKind::default(),
            inner_size: LogicalSize::new(1200, 800).into(),
            min_inner_size: Some(LogicalSize::new(1000, 700).into()),
            window_title: "skiaview".to_string(),
            vulkan_options: VulkanOptions::default(),
        }
    }

    /// Selects how skia's output gets to the window
    pub fn backend(
        mut self,
        backend: BackendKind,
    ) -> Self {
        self.backend = backend;
        self
    }

    /// Specifies the inner size of the window. Both physical and logical coordinates are accepted.
    pub fn inner_size<S: Into<Size>>(
        mut self,
        inner_size: S,
    ) -> Self {
        self.inner_size = inner_size.into();
        self
    }

    /// The window can't be resized below this. `None` removes the limit.
    pub fn min_inner_size<S: Into<Size>>(
        mut self,
        min_inner_size: Option<S>,
    ) -> Self {
        self.min_inner_size = min_inner_size.map(Into::into);
        self
    }

    /// Specifies the title that the window will be created with
    pub fn window_title<T: Into<String>>(
        mut self,
        window_title: T,
    ) -> Self {
        self.window_title = window_title.into();
        self
    }

    /// Options only used by the vulkan backend
    pub fn vulkan_options(
        mut self,
        vulkan_options: VulkanOptions,
    ) -> Self {
        self.vulkan_options = vulkan_options;
        self
    }

    /// Start the app. `app_handler` must be an implementation of [AppHandler]. Returns once the
    /// window is closed, or with the error that was also passed to `AppHandler::fatal_error`.
    pub fn run<T: AppHandler>(
        self,
        app_handler: T,
    ) -> Result<(), AppError> {
        let mut window_builder = winit::window::WindowBuilder::new()
            .with_title(self.window_title)
            .with_inner_size(self.inner_size);
        if let Some(min_inner_size) = self.min_inner_size {
            window_builder = window_builder.with_min_inner_size(min_inner_size);
        }

        App::run(app_handler, self.backend, window_builder, &self.vulkan_options)
    }
}

/// Constructed by `AppBuilder` which immediately calls `run`.
pub struct App {}

impl App {
    /// Runs the app. This is called by `AppBuilder::run`. Errors are reported to the app handler
    /// before being returned.
    pub fn run<T: AppHandler>(
        mut app_handler: T,
        backend_kind: BackendKind,
        window_builder: winit::window::WindowBuilder,
        vulkan_options: &VulkanOptions,
    ) -> Result<(), AppError> {
        let event_loop = match winit::event_loop::EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(e) => return Err(Self::report(&mut app_handler, e.into())),
        };

        let mut backend =
            match create_backend(backend_kind, &event_loop, window_builder, vulkan_options) {
                Ok(backend) => backend,
                Err(e) => {
                    warn!("Passing create_backend() error to app {}", e);
                    return Err(Self::report(&mut app_handler, e));
                }
            };

        let mut app_control = AppControl::default();
        let mut frame_stats = FrameStats::new();
        let mut fatal_error: Option<AppError> = None;

        // To print fps once per second
        let mut print_fps_event = PeriodicEvent::default();

        let run_result = event_loop.run(|event, window_target| {
            if let Event::WindowEvent { event, .. } = event {
                match event {
                    WindowEvent::CloseRequested => {
                        debug!("Close requested");
                        app_control.enqueue_terminate_process();
                    }
                    WindowEvent::Resized(size) => {
                        if let Err(e) = backend.resize(size) {
                            warn!("Passing WindowBackend::resize() error to app {}", e);
                            fatal_error = Some(Self::report(&mut app_handler, e));
                            app_control.enqueue_terminate_process();
                        } else if !is_empty(size) {
                            backend.window().request_redraw();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        frame_stats.update();

                        if print_fps_event.try_take_event(
                            frame_stats.current_instant(),
                            std::time::Duration::from_secs(1),
                        ) {
                            debug!("fps: {}", frame_stats.frames_per_second_smoothed());
                        }

                        let result = backend.render(&mut |canvas| {
                            Self::draw_frame(
                                &mut app_handler,
                                &mut app_control,
                                &frame_stats,
                                canvas,
                            );
                        });

                        match result {
                            // A minimized window gets a redraw again once it is resized
                            Ok(_) => {
                                if !is_empty(backend.window().inner_size()) {
                                    backend.window().request_redraw();
                                }
                            }
                            Err(e) => {
                                warn!("Passing WindowBackend::render() error to app {}", e);
                                fatal_error = Some(Self::report(&mut app_handler, e));
                                app_control.enqueue_terminate_process();
                            }
                        }
                    }
                    _ => {}
                }
            }

            if app_control.should_terminate_process() {
                window_target.exit();
            }
        });

        // The backend holds GPU resources tied to the window, release them before returning
        std::mem::drop(backend);

        if let Some(e) = fatal_error {
            return Err(e);
        }

        run_result.map_err(|e| Self::report(&mut app_handler, e.into()))
    }

    fn draw_frame<T: AppHandler>(
        app_handler: &mut T,
        app_control: &mut AppControl,
        frame_stats: &FrameStats,
        canvas: &skia_safe::Canvas,
    ) {
        app_handler.draw(AppDrawArgs {
            app_control,
            frame_stats,
            canvas,
        });
    }

    fn report<T: AppHandler>(
        app_handler: &mut T,
        error: AppError,
    ) -> AppError {
        app_handler.fatal_error(&error);
        error
    }
}

fn is_empty(size: PhysicalSize<u32>) -> bool {
    size.width == 0 || size.height == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_errors_keep_their_source() {
        let error: AppError = RendererError::NoSuitableDevice.into();
        assert!(matches!(error, AppError::Renderer(RendererError::NoSuitableDevice)));
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(error.to_string(), RendererError::NoSuitableDevice.to_string());
    }

    #[test]
    fn gl_display_error_has_message() {
        let error = AppError::GlDisplay("no display".to_string());
        assert!(error.to_string().contains("no display"));
        assert!(std::error::Error::source(&error).is_none());
    }

    #[test]
    fn builder_defaults() {
        let builder = AppBuilder::new();
        assert_eq!(builder.backend, BackendKind::OpenGl);
        assert_eq!(builder.window_title, "skiaview");
        assert!(builder.min_inner_size.is_some());

        let builder = builder
            .backend(BackendKind::Vulkan)
            .window_title("demo")
            .min_inner_size(None::<Size>);
        assert_eq!(builder.backend, BackendKind::Vulkan);
        assert_eq!(builder.window_title, "demo");
        assert!(builder.min_inner_size.is_none());
    }

    struct QuitAfter {
        frames_left: u32,
        errors: u32,
    }

    impl AppHandler for QuitAfter {
        fn draw(
            &mut self,
            draw_args: AppDrawArgs,
        ) {
            draw_args.canvas.clear(skia_safe::Color::WHITE);
            self.frames_left -= 1;
            if self.frames_left == 0 {
                draw_args.app_control.enqueue_terminate_process();
            }
        }

        fn fatal_error(
            &mut self,
            _error: &AppError,
        ) {
            self.errors += 1;
        }
    }

    #[test]
    fn handler_can_terminate_from_draw() {
        let mut surface = skia_safe::surfaces::raster_n32_premul((16, 16)).unwrap();
        let mut handler = QuitAfter {
            frames_left: 2,
            errors: 0,
        };
        let mut app_control = AppControl::default();
        let frame_stats = FrameStats::new();

        App::draw_frame(&mut handler, &mut app_control, &frame_stats, surface.canvas());
        assert!(!app_control.should_terminate_process());

        App::draw_frame(&mut handler, &mut app_control, &frame_stats, surface.canvas());
        assert!(app_control.should_terminate_process());
        assert_eq!(handler.errors, 0);
    }

    #[test]
    fn errors_are_reported_to_the_handler() {
        let mut handler = QuitAfter {
            frames_left: 1,
            errors: 0,
        };
        let error = App::report(&mut handler, AppError::GlDisplay("lost".to_string()));
        assert!(matches!(error, AppError::GlDisplay(_)));
        assert_eq!(handler.errors, 1);
    }

    #[test]
    fn empty_sizes() {
        assert!(is_empty(PhysicalSize::new(0, 10)));
        assert!(is_empty(PhysicalSize::new(10, 0)));
        assert!(!is_empty(PhysicalSize::new(1, 1)));
    }
}
