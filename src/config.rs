// =============================================================================
// CONFIGURATION - Load settings from config.toml
// =============================================================================
//
// Shared by both binaries. Every field has a default, so a missing file (or a
// missing section) behaves exactly like the built-in tutorial setup.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub vulkan: VulkanConfig,
    pub debug: DebugConfig,
    pub render: RenderConfig,
}

/// Window settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vulkan".to_string(),
            width: 800,
            height: 600,
            resizable: false,
        }
    }
}

/// Instance / device creation settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VulkanConfig {
    /// Only honoured in debug builds, see [`Config::validation_enabled`]
    pub validation_layers: bool,
    pub application_name: String,
    pub engine_name: String,
    /// Print every instance extension the loader offers
    pub log_extensions: bool,
}

impl Default for VulkanConfig {
    fn default() -> Self {
        Self {
            validation_layers: true,
            application_name: "Hello Triangle".to_string(),
            engine_name: "No Engine".to_string(),
            log_extensions: true,
        }
    }
}

/// Debug settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub log_to_file: bool,
    pub log_file: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_to_file: false,
            log_file: "raytracer.log".to_string(),
        }
    }
}

/// CPU path tracer settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub aspect_ratio: f64,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    /// PPM output path; stdout when unset
    pub output: Option<String>,
    /// Custom scene; the built-in scene is used when unset
    pub scene: Option<SceneConfig>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 1920,
            samples_per_pixel: 1024,
            max_depth: 10,
            output: None,
            scene: None,
        }
    }
}

impl RenderConfig {
    /// At least one scanline; only meaningful once [`validate`](Self::validate) passed.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            anyhow::bail!(
                "render.aspect_ratio must be a positive finite number, got {}",
                self.aspect_ratio
            );
        }
        if self.image_width == 0 {
            anyhow::bail!("render.image_width must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SceneConfig {
    pub spheres: Vec<SphereDesc>,
    pub cubes: Vec<CubeDesc>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SphereDesc {
    pub center: [f64; 3],
    pub radius: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CubeDesc {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

/// Where the configuration came from.
///
/// Config is read before the logger exists, so the outcome is kept and
/// reported with [`ConfigSource::log`] once logging is up.
#[derive(Debug)]
pub enum ConfigSource {
    File(PathBuf),
    Missing(PathBuf),
    /// The file exists but could not be used; defaults were taken instead
    Invalid(anyhow::Error),
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => log::info!("Loaded configuration from {:?}", path),
            ConfigSource::Missing(path) => {
                log::info!("Config file not found at {:?}, using defaults", path)
            }
            ConfigSource::Invalid(e) => log::warn!("{:#}. Using defaults.", e),
        }
    }
}

impl Config {
    /// Load `config.toml`, falling back to defaults if it is missing or broken
    pub fn load() -> (Self, ConfigSource) {
        Self::load_or_default("config.toml")
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, ConfigSource) {
        let path = path.as_ref();

        if !path.exists() {
            return (Config::default(), ConfigSource::Missing(path.to_path_buf()));
        }

        match Self::load_from_path(path) {
            Ok(config) => (config, ConfigSource::File(path.to_path_buf())),
            Err(e) => (Config::default(), ConfigSource::Invalid(e)),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.render.validate()?;
        Ok(config)
    }

    /// Validation layers are a development aid: release builds never load them.
    pub fn validation_enabled(&self) -> bool {
        cfg!(debug_assertions) && self.vulkan.validation_layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_file_gives_tutorial_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.window.title, "Vulkan");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert!(!config.window.resizable);
        assert_eq!(config.vulkan.application_name, "Hello Triangle");
        assert_eq!(config.vulkan.engine_name, "No Engine");
        assert_eq!(config.render.image_width, 1920);
        assert_eq!(config.render.samples_per_pixel, 1024);
        assert_eq!(config.render.max_depth, 10);
        assert!(config.render.scene.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml(
            r#"
            [window]
            title = "Bring-up"

            [vulkan]
            validation_layers = false
            "#,
        )
        .unwrap();

        assert_eq!(config.window.title, "Bring-up");
        assert_eq!(config.window.width, 800);
        assert!(!config.vulkan.validation_layers);
        assert!(!config.validation_enabled());
        assert!(config.vulkan.log_extensions);
    }

    #[test]
    fn image_height_follows_aspect_ratio() {
        let config = Config::default();
        assert_eq!(config.render.image_height(), 1080);

        let square = RenderConfig {
            aspect_ratio: 1.0,
            image_width: 64,
            ..Default::default()
        };
        assert_eq!(square.image_height(), 64);
    }

    #[test]
    fn parses_custom_scene() {
        let config = Config::from_toml(
            r#"
            [render]
            samples_per_pixel = 8
            output = "out.ppm"

            [[render.scene.spheres]]
            center = [0.0, 0.0, -1.0]
            radius = 0.5

            [[render.scene.cubes]]
            min = [-1.0, -1.0, -2.0]
            max = [1.0, 0.0, -1.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.render.samples_per_pixel, 8);
        assert_eq!(config.render.output.as_deref(), Some("out.ppm"));
        let scene = config.render.scene.unwrap();
        assert_eq!(scene.spheres.len(), 1);
        assert_relative_eq!(scene.spheres[0].radius, 0.5);
        assert_eq!(scene.cubes[0].max, [1.0, 0.0, -1.0]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::from_toml("[window]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn non_positive_aspect_ratio_is_rejected() {
        for bad in ["0.0", "-1.0", "nan", "inf"] {
            let toml = format!("[render]\naspect_ratio = {}", bad);
            assert!(Config::from_toml(&toml).is_err(), "accepted aspect_ratio = {}", bad);
        }
        assert!(Config::from_toml("[render]\nimage_width = 0").is_err());
    }

    #[test]
    fn very_wide_image_keeps_one_scanline() {
        let wide = RenderConfig {
            aspect_ratio: 100.0,
            image_width: 4,
            ..Default::default()
        };
        assert!(wide.validate().is_ok());
        assert_eq!(wide.image_height(), 1);
    }

    #[test]
    fn broken_file_falls_back_to_defaults_with_error() {
        let path = std::env::temp_dir().join(format!("raytracer-broken-{}.toml", std::process::id()));
        std::fs::write(&path, "[window]\nwidth = \"wide\"").unwrap();

        let (config, source) = Config::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.window.width, 800);
        match source {
            ConfigSource::Invalid(e) => assert!(format!("{:#}", e).contains("Failed to parse config file")),
            other => panic!("expected an invalid config, got {:?}", other),
        }
    }

    #[test]
    fn readable_file_is_reported_as_loaded() {
        let path = std::env::temp_dir().join(format!("raytracer-ok-{}.toml", std::process::id()));
        std::fs::write(&path, "[window]\nwidth = 1024").unwrap();

        let (config, source) = Config::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.window.width, 1024);
        assert!(matches!(source, ConfigSource::File(p) if p == path));
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let (config, source) = Config::load_or_default("definitely/not/here/config.toml");
        assert_eq!(config.window.width, 800);
        assert!(matches!(source, ConfigSource::Missing(_)));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = Config::load_from_path("definitely/not/here/config.toml").unwrap();
        assert_eq!(config.window.height, 600);
    }
}
