use serde::{Deserialize, Serialize};
use skia_safe::{Canvas, Color, Font, Paint, PaintStyle, Point};

use crate::FontLibrary;

/// Tuning for the demo animation. None of these have meaning beyond "animate visibly".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    /// The line's angle in radians is `frame_count / angle_divisor`
    pub angle_divisor: f64,
    /// The label's font size is `frame_count / font_size_divisor` (integer division)
    pub font_size_divisor: u64,
    /// Length of the line relative to the surface size, per axis
    pub line_radius_ratio: f64,
    /// Stroke width is `(width + height) / stroke_width_divisor`
    pub stroke_width_divisor: f32,
    /// Family looked up in the font library for the label
    pub font_family: String,
}

impl Default for SceneParams {
    fn default() -> Self {
        SceneParams {
            angle_divisor: 100.0,
            font_size_divisor: 3,
            line_radius_ratio: 0.4,
            stroke_width_divisor: 100.0,
            font_family: "Cantarell".to_string(),
        }
    }
}

/// Where everything in one frame goes, computed from the frame count and surface size only
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub center: Point,
    pub line_end: Point,
    pub angle: f64,
    pub stroke_width: f32,
    pub font_size: u64,
    pub label: String,
    pub baseline: f32,
}

impl SceneLayout {
    pub fn compute(
        params: &SceneParams,
        frame_count: u64,
        width: i32,
        height: i32,
    ) -> Self {
        let angle = frame_count as f64 / params.angle_divisor;

        // Integer halves, so odd sizes put the center on the pixel to the top-left
        let center_x = (width / 2) as f64;
        let center_y = (height / 2) as f64;

        let line_end = Point::new(
            (center_x + angle.cos() * width as f64 * params.line_radius_ratio) as f32,
            (center_y + angle.sin() * height as f64 * params.line_radius_ratio) as f32,
        );

        let font_size = frame_count / params.font_size_divisor.max(1);

        SceneLayout {
            center: Point::new(center_x as f32, center_y as f32),
            line_end,
            angle,
            stroke_width: (width + height) as f32 / params.stroke_width_divisor,
            font_size,
            label: font_size.to_string(),
            baseline: (height * 4 / 5) as f32,
        }
    }

    /// Left end of the label's baseline, centering a label of `text_width` pixels
    pub fn text_origin(
        &self,
        width: i32,
        text_width: f32,
    ) -> Point {
        let text_width = text_width as i32;
        Point::new(((width - text_width) / 2) as f32, self.baseline)
    }
}

/// The animated demo scene: a rotating line and a label counting up with a growing font size.
pub struct Scene {
    params: SceneParams,
    frame_count: u64,
}

impl Scene {
    pub fn new(params: SceneParams) -> Self {
        Scene {
            params,
            frame_count: 0,
        }
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    /// Number of frames drawn so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn layout(
        &self,
        width: i32,
        height: i32,
    ) -> SceneLayout {
        SceneLayout::compute(&self.params, self.frame_count, width, height)
    }

    /// Draws one frame covering the canvas' base layer and advances the animation
    pub fn draw(
        &mut self,
        canvas: &Canvas,
        fonts: &FontLibrary,
    ) {
        let size = canvas.base_layer_size();
        let layout = self.layout(size.width, size.height);

        canvas.clear(Color::BLUE);

        let mut paint = Paint::default();
        paint.set_color(Color::RED);
        paint.set_stroke_width(layout.stroke_width);
        paint.set_style(PaintStyle::Stroke);
        canvas.draw_line(layout.line_end, layout.center, &paint);

        let mut font = Font::default();
        if let Some(typeface) = fonts.match_family(&self.params.font_family) {
            font.set_typeface(typeface);
        }
        font.set_size(layout.font_size as f32);

        paint.set_color(Color::WHITE);
        paint.set_style(PaintStyle::Fill);

        let (text_width, _bounds) = font.measure_str(&layout.label, None);
        let origin = layout.text_origin(size.width, text_width);
        canvas.draw_str(&layout.label, origin, &font, &paint);

        self.frame_count = self.frame_count.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use skia_safe::surfaces;

    fn layout_at(frame_count: u64) -> SceneLayout {
        SceneLayout::compute(&SceneParams::default(), frame_count, 1000, 700)
    }

    #[test]
    fn label_is_frame_count_divided_by_three() {
        assert_eq!(layout_at(0).label, "0");
        assert_eq!(layout_at(2).label, "0");
        assert_eq!(layout_at(3).label, "1");
        assert_eq!(layout_at(5).label, "1");
        assert_eq!(layout_at(300).label, "100");
        assert_eq!(layout_at(301).font_size, 100);
    }

    #[test]
    fn angle_advances_one_radian_per_hundred_frames() {
        assert_relative_eq!(layout_at(0).angle, 0.0);
        assert_relative_eq!(layout_at(100).angle, 1.0);
        assert_relative_eq!(layout_at(250).angle - layout_at(150).angle, 1.0);
    }

    #[test]
    fn line_end_rotates_around_center() {
        let start = layout_at(0);
        assert_relative_eq!(start.center.x, 500.0);
        assert_relative_eq!(start.center.y, 350.0);
        assert_relative_eq!(start.line_end.x, 500.0 + 1000.0 * 0.4);
        assert_relative_eq!(start.line_end.y, 350.0);

        let one_radian = layout_at(100);
        assert_relative_eq!(
            one_radian.line_end.x,
            (500.0 + 1.0f64.cos() * 400.0) as f32,
            epsilon = 1e-3
        );
        assert_relative_eq!(
            one_radian.line_end.y,
            (350.0 + 1.0f64.sin() * 280.0) as f32,
            epsilon = 1e-3
        );
    }

    #[test]
    fn odd_sizes_use_integer_center() {
        let layout = SceneLayout::compute(&SceneParams::default(), 0, 101, 51);
        assert_relative_eq!(layout.center.x, 50.0);
        assert_relative_eq!(layout.center.y, 25.0);
        assert_relative_eq!(layout.baseline, 40.0);
    }

    #[test]
    fn stroke_width_scales_with_size() {
        assert_relative_eq!(layout_at(0).stroke_width, 17.0);
        let small = SceneLayout::compute(&SceneParams::default(), 0, 60, 40);
        assert_relative_eq!(small.stroke_width, 1.0);
    }

    #[test]
    fn label_is_centered_horizontally() {
        let layout = layout_at(30);
        assert_eq!(layout.text_origin(1000, 20.7), Point::new(490.0, 560.0));
    }

    #[test]
    fn params_are_configurable() {
        let params = SceneParams {
            angle_divisor: 10.0,
            font_size_divisor: 7,
            ..Default::default()
        };
        let layout = SceneLayout::compute(&params, 14, 100, 100);
        assert_eq!(layout.label, "2");
        assert_relative_eq!(layout.angle, 1.4);
    }

    #[test]
    fn zero_font_size_divisor_does_not_panic() {
        let params = SceneParams {
            font_size_divisor: 0,
            ..Default::default()
        };
        assert_eq!(SceneLayout::compute(&params, 9, 10, 10).font_size, 9);
    }

    #[test]
    fn draw_clears_to_blue_and_draws_red_line() {
        let mut surface = surfaces::raster_n32_premul((200, 100)).unwrap();
        let mut scene = Scene::new(SceneParams::default());
        let fonts = FontLibrary::new();

        scene.draw(surface.canvas(), &fonts);
        assert_eq!(scene.frame_count(), 1);

        let pixmap = surface.peek_pixels().unwrap();
        assert_eq!(pixmap.get_color((0, 0)), Color::BLUE);
        assert_eq!(pixmap.get_color((199, 0)), Color::BLUE);

        // Frame 0 draws the line from (180, 50) to the center (100, 50), 3 pixels wide
        assert_eq!(pixmap.get_color((140, 50)), Color::RED);
        assert_eq!(pixmap.get_color((90, 50)), Color::BLUE);
    }

    #[test]
    fn frame_count_advances_every_draw() {
        let mut surface = surfaces::raster_n32_premul((64, 64)).unwrap();
        let mut scene = Scene::new(SceneParams::default());
        let fonts = FontLibrary::new();

        for _ in 0..5 {
            scene.draw(surface.canvas(), &fonts);
        }
        assert_eq!(scene.frame_count(), 5);
        assert_eq!(scene.layout(64, 64).label, "1");
    }
}
