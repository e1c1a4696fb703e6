use serde::{Deserialize, Serialize};

/// The presentation strategies a window can use. Every backend draws the same scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Skia renders through a GL context into the window's framebuffer
    OpenGl,
    /// Skia rasterizes on the CPU and the pixels are copied into the window
    Software,
    /// Skia renders into the images of a vulkan swapchain owned by the window
    Vulkan,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [
        BackendKind::OpenGl,
        BackendKind::Software,
        BackendKind::Vulkan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::OpenGl => "opengl",
            BackendKind::Software => "software",
            BackendKind::Vulkan => "vulkan",
        }
    }
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::OpenGl
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a backend name isn't one of [`BackendKind::ALL`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBackendKindError(pub String);

impl std::error::Error for ParseBackendKindError {}

impl std::fmt::Display for ParseBackendKindError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        write!(
            f,
            "unknown backend '{}', expected one of opengl, software, vulkan",
            self.0
        )
    }
}

impl std::str::FromStr for BackendKind {
    type Err = ParseBackendKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "opengl" | "gl" => Ok(BackendKind::OpenGl),
            "software" | "raster" | "cpu" => Ok(BackendKind::Software),
            "vulkan" | "vk" => Ok(BackendKind::Vulkan),
            _ => Err(ParseBackendKindError(s.to_string())),
        }
    }
}
