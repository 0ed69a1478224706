//! JSON config file adapter.
//!
//! Implements [`ConfigPort`] over a single JSON file.  A missing file means
//! "first run" and yields [`MonitorConfig::default()`]; a file that exists
//! but does not parse or validate is an error, never silently replaced.
//!
//! Saves go to a sibling temp file followed by a rename, so a power cut
//! leaves either the old or the new config, never a truncated one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::MonitorConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<MonitorConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("config: {} not found, using defaults", self.path.display());
                return Ok(MonitorConfig::default());
            }
            Err(e) => {
                warn!("config: reading {} failed: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };

        let cfg: MonitorConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("config: {} is not valid JSON: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        cfg.validate()?;
        info!("config: loaded {}", self.path.display());
        Ok(cfg)
    }

    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let json = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                warn!("config: writing {} failed: {}", self.path.display(), e);
                ConfigError::IoError
            })?;
        info!("config: saved {}", self.path.display());
        Ok(())
    }
}
