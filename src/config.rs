use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{error::CoreError, hardware::Model};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ModelPreference {
    /// Follow the cartridge header's CGB flag.
    #[default]
    Auto,
    Dmg,
    Cgb,
}

impl ModelPreference {
    pub fn resolve(self, cart_supports_cgb: bool) -> Model {
        match self {
            Self::Auto if cart_supports_cgb => Model::Cgb,
            Self::Auto | Self::Dmg => Model::Dmg,
            Self::Cgb => Model::Cgb,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EmulatorConfig {
    pub model: ModelPreference,
    /// Start in the interactive debugger instead of free-running.
    pub dev_mode: bool,
    /// Copy bytes sent over the serial port to stdout.
    pub serial_echo: bool,
    /// Breakpoint command lines, e.g. `"timer.counter == 0"`.
    pub breakpoints: Vec<String>,
    pub max_steps: Option<u64>,
}

impl EmulatorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(text)?)
    }
}

pub fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("tickboy").join("config.toml");
        }
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("tickboy").join("config.toml");
    }

    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("tickboy")
            .join("config.toml");
    }

    PathBuf::from("tickboy.toml")
}

/// Load the config at `path`. A missing file gives the defaults; a file that
/// fails to parse is reported and also gives the defaults.
pub fn load_from_file(path: &Path) -> EmulatorConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return EmulatorConfig::default(),
    };

    match EmulatorConfig::from_toml_str(&text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(
                "Failed to parse config {}: {e}; using defaults",
                path.display()
            );
            EmulatorConfig::default()
        }
    }
}
