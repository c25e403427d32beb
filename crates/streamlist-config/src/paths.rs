use anyhow::Result;
use std::path::{Path, PathBuf};

/// Overrides the base directory for everything the app writes
pub const HOME_ENV: &str = "STREAMLIST_HOME";

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        if let Ok(home) = std::env::var(HOME_ENV) {
            return Ok(Self::with_base(PathBuf::from(home)));
        }

        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("streamlist");

        Ok(Self::with_base(base_dir))
    }

    /// Lay out all directories under one base (config files at the base level,
    /// data and logs in subdirectories)
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// One JSON file per persistent store key lives here
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("streamlist.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.store_dir())?;
        std::fs::create_dir_all(self.export_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // Fall back to a relative directory when the platform has no config dir
        Self::new().unwrap_or_else(|_| Self::with_base(PathBuf::from(".streamlist")))
    }
}
