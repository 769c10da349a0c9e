use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::session::OsTag;

/// Optional defaults read from a TOML file. Credentials are never read from it.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) interactive_mode: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) ica_root_url: Option<String>,
    #[serde(default)]
    pub(crate) illumina_platform_root_url: Option<String>,
    #[serde(default)]
    pub(crate) webdriver_url: Option<String>,
    #[serde(default)]
    pub(crate) workgroup_name: Option<String>,
    #[serde(default)]
    pub(crate) os: Option<OsTag>,
    #[serde(default)]
    pub(crate) element_timeout_secs: Option<u64>,
}

/// A config plus where it came from. Loading happens before logging is up,
/// so diagnostics are held until `report` is called.
#[derive(Debug, Default)]
pub(crate) struct LoadedConfig {
    pub(crate) config: Config,
    pub(crate) path: Option<PathBuf>,
    pub(crate) warnings: Vec<String>,
}

impl LoadedConfig {
    pub(crate) fn report(&self) {
        for warning in &self.warnings {
            warn!("{warning}");
        }
        if let Some(path) = &self.path {
            info!(path = %path.display(), "Loaded config");
        }
    }
}

impl Config {
    pub(crate) fn load() -> LoadedConfig {
        Self::load_from(&Self::get_config_paths())
    }

    fn load_from(paths: &[PathBuf]) -> LoadedConfig {
        let mut loaded = LoadedConfig::default();

        for path in paths {
            if path.exists()
                && let Ok(content) = fs::read_to_string(path)
            {
                match Self::parse(&content, path) {
                    Ok(config) => {
                        loaded.config = config;
                        loaded.path = Some(path.clone());
                        return loaded;
                    }
                    Err(warning) => loaded.warnings.push(warning),
                }
            }
        }

        loaded
    }

    fn parse(content: &str, path: &Path) -> Result<Self, String> {
        toml::from_str::<Config>(content)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/ica-keepalive/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("ica-keepalive").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("ica-keepalive").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.ica-keepalive.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ica-keepalive.toml"));
        }

        paths
    }
}
