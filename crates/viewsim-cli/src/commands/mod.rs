pub mod config;
pub mod devices;
pub mod layout;
pub mod normalize;
pub mod replay;
pub mod state;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use viewsim_core::catalog::DeviceCategory;
use viewsim_core::config::ViewConfig;

#[derive(Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Mobile,
    Tablet,
}

impl From<CategoryArg> for DeviceCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Mobile => DeviceCategory::Mobile,
            CategoryArg::Tablet => DeviceCategory::Tablet,
        }
    }
}

/// Load a view config from TOML, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ViewConfig> {
    let Some(path) = path else {
        return Ok(ViewConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).context("Invalid view config")
}
