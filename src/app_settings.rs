use directories::ProjectDirs;
use ini::Ini;
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use captions_core::DEFAULT_SURFACE_HEIGHT;

const LOGGING_SECTION: &str = "Logging";
const CAPTIONS_SECTION: &str = "Captions";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub enable_file_log: bool,
    pub log_level: LevelFilter,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enable_file_log: false,
            log_level: LevelFilter::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionSettings {
    /// Caption area height used when `--height` is not given.
    pub surface_height: f64,
    /// JSON style options applied when `--style-options` is not given.
    pub style_options_file: Option<PathBuf>,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            surface_height: DEFAULT_SURFACE_HEIGHT,
            style_options_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSettings {
    pub log_settings: LogSettings,
    pub caption_settings: CaptionSettings,
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        let Some(proj_dirs) = ProjectDirs::from("com", "TtmlCaptions", "TtmlCaptions") else {
            log::error!("Could not determine the configuration directory.");
            return None;
        };
        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists()
            && let Err(e) = fs::create_dir_all(config_dir)
        {
            log::error!("Could not create configuration directory {config_dir:?}: {e}");
            return None;
        }
        Some(config_dir.join("ttml_captions.ini"))
    }

    /// Reads the settings file, creating it with defaults on first run.
    /// Any failure falls back to the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::warn!("No configuration path available, using default settings.");
            return Self::default();
        };

        if !path.exists() {
            log::info!("Configuration file {path:?} not found, creating it with defaults.");
            let default_settings = Self::default();
            if let Err(e) = default_settings.save() {
                log::error!("Could not write default configuration to {path:?}: {e}");
            }
            return default_settings;
        }

        match Ini::load_from_file(&path) {
            Ok(conf) => {
                log::info!("Loaded configuration from {path:?}.");
                Self::from_ini(&conf)
            }
            Err(e) => {
                log::error!("Failed to load configuration {path:?}: {e}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), ini::Error> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.to_ini().write_to_file(&path)?;
        log::info!("Configuration saved to {path:?}.");
        Ok(())
    }

    fn from_ini(conf: &Ini) -> Self {
        let defaults = Self::default();
        let logging = conf.section(Some(LOGGING_SECTION));
        let captions = conf.section(Some(CAPTIONS_SECTION));

        let log_settings = LogSettings {
            enable_file_log: logging
                .and_then(|s| s.get("EnableFileLog"))
                .and_then(|s| s.parse::<bool>().ok())
                .unwrap_or(defaults.log_settings.enable_file_log),
            log_level: logging
                .and_then(|s| s.get("LogLevel"))
                .and_then(|s| LevelFilter::from_str(s).ok())
                .unwrap_or(defaults.log_settings.log_level),
        };
        let caption_settings = CaptionSettings {
            surface_height: captions
                .and_then(|s| s.get("SurfaceHeight"))
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|height| *height > 0.0)
                .unwrap_or(defaults.caption_settings.surface_height),
            style_options_file: captions
                .and_then(|s| s.get("StyleOptionsFile"))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        };

        Self {
            log_settings,
            caption_settings,
        }
    }

    fn to_ini(&self) -> Ini {
        let mut conf = Ini::new();
        conf.with_section(Some(LOGGING_SECTION))
            .set(
                "EnableFileLog",
                self.log_settings.enable_file_log.to_string(),
            )
            .set("LogLevel", self.log_settings.log_level.to_string());
        conf.with_section(Some(CAPTIONS_SECTION))
            .set(
                "SurfaceHeight",
                self.caption_settings.surface_height.to_string(),
            )
            .set(
                "StyleOptionsFile",
                self.caption_settings
                    .style_options_file
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default(),
            );
        conf
    }
}
