//! Bridge configuration
//!
//! Loaded from `esptool-bridge.toml` under the platform configuration
//! directory; a missing file is simply the default configuration.

use std::fs::read_to_string;

use directories::ProjectDirs;
use log::debug;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Command used to launch the flashing tool, e.g. `"esptool"` or
    /// `"python -m esptool"`. Defaults to `esptool` on the PATH.
    pub tool: Option<String>,
    /// Baud rate used when the execution context does not carry one.
    pub baud: Option<u32>,
}

impl Config {
    /// Load the config from the config file
    pub fn load() -> Result<Self> {
        let Some(dirs) = ProjectDirs::from("", "", "esptool-bridge") else {
            return Ok(Self::default());
        };
        let file = dirs.config_dir().join("esptool-bridge.toml");

        let Ok(data) = read_to_string(&file) else {
            return Ok(Self::default());
        };

        let config: Config = toml::from_str(&data)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to parse {}", file.display()))?;
        debug!("Config: {:#?}", config);

        Ok(config)
    }
}
