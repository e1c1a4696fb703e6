/// Size of a window or surface in device pixels
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub fn new(
        width: u32,
        height: u32,
    ) -> Self {
        PhysicalSize { width, height }
    }

    /// True if either dimension is zero, which is what a minimized window reports
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Skia takes signed dimensions. Values beyond `i32::MAX` are clamped.
    pub fn to_skia(&self) -> (i32, i32) {
        (
            self.width.min(i32::MAX as u32) as i32,
            self.height.min(i32::MAX as u32) as i32,
        )
    }
}

impl From<(u32, u32)> for PhysicalSize {
    fn from((width, height): (u32, u32)) -> Self {
        PhysicalSize::new(width, height)
    }
}

impl std::fmt::Display for PhysicalSize {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
