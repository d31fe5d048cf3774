use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const CONFIG_ENV: &str = "LEARN_DX_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "learn_dx.toml";

pub const CORNFLOWER_BLUE: [f32; 4] = [0.392_156_9, 0.584_313_75, 0.929_411_8, 1.0];

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
    pub assets: AssetConfig,
    pub compute: ComputeConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Learn DX".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Present with sync interval 1 and block until the next vertical blank.
    pub vsync: bool,
    pub debug_layer: bool,
    pub clear_color: [f32; 4],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            debug_layer: cfg!(debug_assertions),
            clear_color: CORNFLOWER_BLUE,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    pub texture: PathBuf,
    pub shaders: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture: PathBuf::from("data/checker.png"),
            shaders: PathBuf::from("shaders"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ComputeConfig {
    pub steps_per_frame: u32,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self { steps_per_frame: 10 }
    }
}

impl AppConfig {
    /// Loads the config named by `LEARN_DX_CONFIG`, else `learn_dx.toml` in
    /// the working directory, else the built-in defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }

        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.compute.steps_per_frame == 0 {
            return Err(Error::InvalidConfig(
                "compute.steps_per_frame must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::error::Error;

    use super::{AppConfig, CONFIG_ENV, CORNFLOWER_BLUE};

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "learn_dx_{}_{name}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.renderer.clear_color, CORNFLOWER_BLUE);
        assert_eq!(config.compute.steps_per_frame, 10);
        assert!(config.renderer.vsync);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [window]
            width = 1280

            [renderer]
            vsync = false
            clear_color = [0.0, 0.0, 0.0, 1.0]

            [assets]
            texture = "assets/checker.png"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 600);
        assert!(!config.renderer.vsync);
        assert_eq!(config.renderer.clear_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(config.assets.texture, PathBuf::from("assets/checker.png"));
        assert_eq!(config.assets.shaders, PathBuf::from("shaders"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = toml::from_str::<AppConfig>("[window]\nfullscreen = true\n");

        assert!(result.is_err());
    }

    #[test]
    fn zero_sized_window_is_invalid() {
        let mut config = AppConfig::default();
        config.window.height = 0;

        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn zero_compute_steps_is_invalid() {
        let mut config = AppConfig::default();
        config.compute.steps_per_frame = 0;

        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = PathBuf::from("definitely/not/here/learn_dx.toml");
        let err = AppConfig::from_file(&path).unwrap_err();

        match err {
            Error::ConfigIo { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_file_reads_values() {
        let path = write_config(
            "values",
            "[window]\ntitle = \"Particles\"\nheight = 720\n\n[compute]\nsteps_per_frame = 4\n",
        );

        let config = AppConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        assert_eq!(config.window.title, "Particles");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.compute.steps_per_frame, 4);
    }

    #[test]
    fn from_file_validates_after_parsing() {
        let path = write_config("zero_steps", "[compute]\nsteps_per_frame = 0\n");

        let result = AppConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn from_file_reports_parse_errors_with_path() {
        let path = write_config("broken", "[window\nwidth = 1\n");

        let result = AppConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();

        match result {
            Err(Error::ConfigParse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    // The only test that touches the process environment.
    #[test]
    fn load_follows_env_path() {
        let path = write_config("env", "[window]\ntitle = \"From env\"\n");

        std::env::set_var(CONFIG_ENV, &path);
        let loaded = AppConfig::load();
        std::env::set_var(CONFIG_ENV, path.with_extension("missing"));
        let missing = AppConfig::load();
        std::env::remove_var(CONFIG_ENV);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.unwrap().window.title, "From env");
        assert!(matches!(missing, Err(Error::ConfigIo { .. })));
    }
}
