//! Configuration for simfs
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::layout::Layout;

/// Main configuration for a simfs volume
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Image Configuration
    // -------------------------------------------------------------------------
    /// Path of the backing image file (created on first use)
    pub image_path: PathBuf,

    /// Image geometry (size, metadata block, table capacity)
    pub layout: Layout,

    // -------------------------------------------------------------------------
    // Operation Log Configuration
    // -------------------------------------------------------------------------
    /// Append-only operation log; `None` disables recording
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("disk.sim"),
            layout: Layout::default(),
            log_path: Some(PathBuf::from("fs.log")),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing image path
    pub fn image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.image_path = path.into();
        self
    }

    /// Set the image geometry
    pub fn layout(mut self, layout: Layout) -> Self {
        self.config.layout = layout;
        self
    }

    /// Set the operation log path
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_path = Some(path.into());
        self
    }

    /// Disable the operation log
    pub fn without_log(mut self) -> Self {
        self.config.log_path = None;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
