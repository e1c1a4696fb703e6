use skiaview_app_winit::{AppDrawArgs, AppError, AppHandler};
use skiaview_renderer::{FontLibrary, Scene, SceneParams};

/// The app handler behind the `skiaview` binary. Owns the animation state and the fonts it draws
/// with.
pub struct DemoApp {
    scene: Scene,
    fonts: FontLibrary,
}

impl DemoApp {
    pub fn new(
        params: SceneParams,
        fonts: FontLibrary,
    ) -> Self {
        DemoApp {
            scene: Scene::new(params),
            fonts,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }
}

impl AppHandler for DemoApp {
    fn draw(
        &mut self,
        draw_args: AppDrawArgs,
    ) {
        self.scene.draw(draw_args.canvas, &self.fonts);
    }

    fn fatal_error(
        &mut self,
        error: &AppError,
    ) {
        error!("{}", error);
    }
}
