//! Configuration for the skiaview binary
//!
//! Loaded from a TOML file, every key is optional:
//!
//! ```toml
//! backend = "opengl"          # opengl | software | vulkan
//! fonts_dir = "fonts"
//! log_level = "info"
//!
//! [window]
//! title = "skiaview"
//! width = 1200
//! height = 800
//! min_width = 1000
//! min_height = 700
//!
//! [scene]
//! angle_divisor = 100.0
//! font_size_divisor = 3
//! line_radius_ratio = 0.4
//! stroke_width_divisor = 100.0
//! font_family = "Cantarell"
//!
//! [vulkan]
//! validation = false
//! max_sample_count = 16
//! ```
//!
//! A few environment variables override the file, see [`AppConfig::load`].

use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use skiaview_renderer::{BackendKind, SceneParams, VulkanOptions};

/// Path of the config file. If unset, `skiaview.toml` is used when it exists.
pub const CONFIG_ENV: &str = "SKIAVIEW_CONFIG";
/// Overrides `backend`
pub const BACKEND_ENV: &str = "SKIAVIEW_BACKEND";
/// Overrides `fonts_dir`
pub const FONTS_DIR_ENV: &str = "SKIAVIEW_FONTS_DIR";

pub const DEFAULT_CONFIG_FILE: &str = "skiaview.toml";
/// Relative to the working directory, like the config file
pub const DEFAULT_FONTS_DIR: &str = "fonts";

/// Represents an error from reading or validating the configuration
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, error: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
    UnknownBackend(String),
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            ConfigError::Io { ref error, .. } => Some(error),
            ConfigError::Parse(ref e) => Some(e),
            ConfigError::Invalid(_) => None,
            ConfigError::UnknownBackend(_) => None,
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            ConfigError::Io {
                ref path,
                ref error,
            } => write!(fmt, "Could not read config file {}: {}", path.display(), error),
            ConfigError::Parse(ref e) => write!(fmt, "Could not parse config: {}", e),
            ConfigError::Invalid(ref message) => write!(fmt, "Invalid config: {}", message),
            ConfigError::UnknownBackend(ref name) => write!(
                fmt,
                "Unknown backend '{}', expected one of opengl, software, vulkan",
                name
            ),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(result: toml::de::Error) -> Self {
        ConfigError::Parse(result)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "skiaview".to_string(),
            width: 1200,
            height: 800,
            min_width: 1000,
            min_height: 700,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub fonts_dir: PathBuf,
    pub log_level: LevelFilter,
    pub window: WindowConfig,
    pub scene: SceneParams,
    pub vulkan: VulkanOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            backend: BackendKind::default(),
            fonts_dir: PathBuf::from(DEFAULT_FONTS_DIR),
            log_level: LevelFilter::Info,
            window: WindowConfig::default(),
            scene: SceneParams::default(),
            vulkan: VulkanOptions::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config the binary runs with: the file named by `SKIAVIEW_CONFIG` (or
    /// `skiaview.toml` if it exists, or defaults), then `SKIAVIEW_BACKEND` and
    /// `SKIAVIEW_FONTS_DIR` on top. The result is validated.
    pub fn load() -> Result<AppConfig, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with environment lookups going through `env`
    pub fn load_with<F: Fn(&str) -> Option<String>>(env: F) -> Result<AppConfig, ConfigError> {
        let mut config = match env(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    AppConfig::default()
                }
            }
        };

        config.apply_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses without validating
    pub fn from_toml_str(contents: &str) -> Result<AppConfig, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_overrides<F: Fn(&str) -> Option<String>>(
        &mut self,
        env: F,
    ) -> Result<(), ConfigError> {
        if let Some(backend) = env(BACKEND_ENV) {
            self.backend = backend
                .parse()
                .map_err(|_| ConfigError::UnknownBackend(backend.clone()))?;
        }

        if let Some(fonts_dir) = env(FONTS_DIR_ENV) {
            self.fonts_dir = PathBuf::from(fonts_dir);
        }

        Ok(())
    }

    /// Rejects values that would make the window unusable or the scene divide by zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = &self.window;
        if window.width == 0 || window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must be non-zero",
                window.width, window.height
            )));
        }
        if window.min_width == 0 || window.min_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "minimum window size {}x{} must be non-zero",
                window.min_width, window.min_height
            )));
        }

        let scene = &self.scene;
        if !scene.angle_divisor.is_finite() || scene.angle_divisor == 0.0 {
            return Err(ConfigError::Invalid(
                "scene.angle_divisor must be a non-zero number".to_string(),
            ));
        }
        if scene.font_size_divisor == 0 {
            return Err(ConfigError::Invalid(
                "scene.font_size_divisor must be non-zero".to_string(),
            ));
        }
        if !scene.stroke_width_divisor.is_finite() || scene.stroke_width_divisor <= 0.0 {
            return Err(ConfigError::Invalid(
                "scene.stroke_width_divisor must be positive".to_string(),
            ));
        }
        if !scene.line_radius_ratio.is_finite() {
            return Err(ConfigError::Invalid(
                "scene.line_radius_ratio must be a finite number".to_string(),
            ));
        }

        let max_sample_count = self.vulkan.max_sample_count;
        if !max_sample_count.is_power_of_two() || max_sample_count > 64 {
            return Err(ConfigError::Invalid(format!(
                "vulkan.max_sample_count {} must be a power of two from 1 to 64",
                max_sample_count
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.backend, BackendKind::OpenGl);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.window.min_width, 1000);
        assert_eq!(config.window.min_height, 700);
        assert_eq!(config.scene, SceneParams::default());
        assert!(!config.vulkan.validation);
        assert_eq!(config.vulkan.max_sample_count, 16);
        assert_eq!(config.fonts_dir, PathBuf::from("fonts"));
        assert!(config.fonts_dir.is_relative());
        assert!(config.validate().is_ok());
    }

    // Tests run from the package root, where the bundled fonts live
    #[test]
    fn bundled_fonts_cover_default_family() {
        let config = AppConfig::default();
        let mut fonts = skiaview_renderer::FontLibrary::new();
        assert!(fonts.initialize_from_directory(&config.fonts_dir));
        assert!(fonts.match_family(&config.scene.font_family).is_some());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn parses_partial_document() {
        let config = AppConfig::from_toml_str(
            r#"
            backend = "vulkan"
            fonts_dir = "/usr/share/fonts"
            log_level = "debug"

            [window]
            title = "demo"

            [scene]
            font_size_divisor = 5

            [vulkan]
            validation = true
            max_sample_count = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::Vulkan);
        assert_eq!(config.fonts_dir, PathBuf::from("/usr/share/fonts"));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.window.title, "demo");
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.scene.font_size_divisor, 5);
        assert_eq!(config.scene.angle_divisor, 100.0);
        assert!(config.vulkan.validation);
        assert_eq!(config.vulkan.max_sample_count, 4);
    }

    #[test]
    fn unknown_backend_in_file_is_a_parse_error() {
        let result = AppConfig::from_toml_str(r#"backend = "metal""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.scene.font_size_divisor = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.scene.angle_divisor = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.scene.stroke_width_divisor = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.window.height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        for bad in [0, 3, 12, 128] {
            let mut config = AppConfig::default();
            config.vulkan.max_sample_count = bad;
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "max_sample_count {} accepted",
                bad
            );
        }

        let mut config = AppConfig::default();
        config.vulkan.max_sample_count = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend = \"software\"\nfonts_dir = \"from-file\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = AppConfig::load_with(env_from(&[(CONFIG_ENV, path.as_str())])).unwrap();
        assert_eq!(config.backend, BackendKind::Software);
        assert_eq!(config.fonts_dir, PathBuf::from("from-file"));

        let config = AppConfig::load_with(env_from(&[
            (CONFIG_ENV, path.as_str()),
            (BACKEND_ENV, "VK"),
            (FONTS_DIR_ENV, "from-env"),
        ]))
        .unwrap();
        assert_eq!(config.backend, BackendKind::Vulkan);
        assert_eq!(config.fonts_dir, PathBuf::from("from-env"));
    }

    #[test]
    fn unknown_backend_in_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skiaview.toml");
        std::fs::write(&path, "").unwrap();

        let result = AppConfig::load_with(env_from(&[
            (CONFIG_ENV, path.to_str().unwrap()),
            (BACKEND_ENV, "directx"),
        ]));
        match result {
            Err(ConfigError::UnknownBackend(name)) => assert_eq!(name, "directx"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let result = AppConfig::load_with(env_from(&[(CONFIG_ENV, path.to_str().unwrap())]));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn invalid_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skiaview.toml");
        std::fs::write(&path, "[vulkan]\nmax_sample_count = 6\n").unwrap();
        let result = AppConfig::load_with(env_from(&[(CONFIG_ENV, path.to_str().unwrap())]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
