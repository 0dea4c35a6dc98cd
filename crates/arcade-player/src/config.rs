//! Player configuration file

use std::path::{Path, PathBuf};

use arcade_audio::AudioConfig;
use arcade_core::{first_success, ArcadeError, Result, Strategy};
use arcade_games::DashConfig;
use arcade_runtime::{RuntimeConfig, StoreConfig};
use serde::{Deserialize, Serialize};

const FILE_NAME: &str = "arcade.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner size in logical units
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Arcade".into(),
            width: 480,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Everything the player reads from `arcade.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Game to open on launch instead of the menu
    pub start_game: Option<String>,
    pub window: WindowConfig,
    pub runtime: RuntimeConfig,
    pub audio: AudioConfig,
    pub store: StoreConfig,
    pub dash: DashConfig,
}

impl ArcadeConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = toml::from_str(&text)?;
        log::info!("config: loaded {}", path.display());
        Ok(config)
    }

    /// Find and load a config file.
    ///
    /// Tries `explicit` (the `--config` argument), then `./arcade.toml`, then
    /// the platform config directory. Falls back to built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Self {
        let strategies = [
            Strategy::new("--config", || match explicit {
                Some(path) => Self::load_from_file(path).inspect_err(|e| {
                    log::warn!("config: {} not usable ({e})", path.display());
                }),
                None => Err(ArcadeError::ConfigError("no --config given".into())),
            }),
            Strategy::new("working directory", || {
                Self::load_existing(PathBuf::from(FILE_NAME))
            }),
            Strategy::new("platform config dir", || {
                let dir = dirs::config_dir().ok_or_else(|| {
                    ArcadeError::ConfigError("no platform config directory".into())
                })?;
                Self::load_existing(dir.join("arcade").join(FILE_NAME))
            }),
        ];
        first_success(strategies).unwrap_or_else(|| {
            log::info!("config: using built-in defaults");
            Self::default()
        })
    }

    /// Load `path` if it exists; a present but broken file is reported.
    fn load_existing(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ArcadeError::ConfigError(format!(
                "{} does not exist",
                path.display()
            )));
        }
        Self::load_from_file(&path).inspect_err(|e| {
            log::warn!("config: ignoring {} ({e})", path.display());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("arcade-config-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ArcadeConfig = toml::from_str(
            r#"
start_game = "dash"

[window]
width = 800

[dash]
gap_size = 200.0
"#,
        )
        .unwrap();
        assert_eq!(config.start_game.as_deref(), Some("dash"));
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.dash.gap_size, 200.0);
        assert_eq!(config.runtime.max_pixel_ratio, 3.0);
        assert_eq!(config.store.namespace, "arcade");
    }

    #[test]
    fn explicit_path_wins() {
        let path = temp_file("explicit.toml", "[window]\ntitle = \"Custom\"\n");
        let config = ArcadeConfig::discover(Some(&path));
        assert_eq!(config.window.title, "Custom");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn broken_file_is_an_error() {
        let path = temp_file("broken.toml", "window = [");
        assert!(matches!(
            ArcadeConfig::load_from_file(&path),
            Err(ArcadeError::TomlParseError(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("arcade-config-does-not-exist.toml");
        assert!(matches!(
            ArcadeConfig::load_from_file(&path),
            Err(ArcadeError::IoError(_))
        ));
    }

    #[test]
    fn round_trips_through_toml() {
        let text = toml::to_string(&ArcadeConfig::default()).unwrap();
        let parsed: ArcadeConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.window.title, "Arcade");
        assert_eq!(parsed.audio.sample_rate, 44_100);
    }
}
