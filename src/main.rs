//! The skiaview binary: reads the config, loads fonts and runs the demo with the configured
//! backend until the window is closed.

#[macro_use]
extern crate log;

use skiaview::app::{AppBuilder, LogicalSize};
use skiaview::{AppConfig, DemoApp, FontLibrary};

// Exit status when the configuration can't be used
const CONFIG_ERROR_EXIT_CODE: i32 = 2;
// Exit status when the window, backend or a frame fails
const RUN_ERROR_EXIT_CODE: i32 = 1;

fn main() {
    // Logging is configured by the config file, so problems with it can only go to stderr
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("skiaview: {}", e);
            std::process::exit(CONFIG_ERROR_EXIT_CODE);
        }
    };

    // RUST_LOG takes precedence over the configured level
    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    info!("Starting skiaview with the {} backend", config.backend);

    let mut fonts = FontLibrary::new();
    if !fonts.initialize_from_directory(&config.fonts_dir) {
        warn!(
            "Could not load fonts from {}, text uses skia's default typeface",
            config.fonts_dir.display()
        );
    }

    let window = &config.window;
    let app = DemoApp::new(config.scene.clone(), fonts);

    let result = AppBuilder::new()
        .backend(config.backend)
        .window_title(window.title.clone())
        .inner_size(LogicalSize::new(window.width, window.height))
        .min_inner_size(Some(LogicalSize::new(window.min_width, window.min_height)))
        .vulkan_options(config.vulkan.clone())
        .run(app);

    match result {
        Ok(()) => info!("Window closed, exiting"),
        Err(e) => {
            error!("skiaview stopped: {}", e);
            std::process::exit(RUN_ERROR_EXIT_CODE);
        }
    }
}
