//! Search configuration.
//!
//! The cell grid, the target canvas, and the selection size are configuration,
//! not constants: tests run the whole engine on tiny grids, and users can
//! point the search at a different output resolution.
//!
//! ## Config File
//!
//! Pass a file with `--config path/to/config.toml`. Every key is optional;
//! user values are merged on top of the stock defaults:
//!
//! ```toml
//! [grid]
//! cell_width = 8        # Histogram cell width in pixels
//! cell_height = 8       # Histogram cell height in pixels
//! target_width = 256    # Output canvas width; also the smallest scale searched
//! target_height = 192   # Output canvas height
//!
//! [selection]
//! best = 8              # Number of lowest-rated candidates exported
//!
//! [processing]
//! max_processes = 4     # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from a `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Cell and target canvas geometry.
    pub grid: Grid,
    /// How many candidates to export.
    pub selection: SelectionConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SearchConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.grid;
        if g.cell_width == 0 || g.cell_height == 0 {
            return Err(ConfigError::Validation(
                "grid.cell_width and grid.cell_height must be non-zero".into(),
            ));
        }
        if g.target_width == 0 || g.target_height == 0 {
            return Err(ConfigError::Validation(
                "grid.target_width and grid.target_height must be non-zero".into(),
            ));
        }
        if g.cell_width > g.target_width || g.cell_height > g.target_height {
            return Err(ConfigError::Validation(
                "grid cells must fit inside the target canvas".into(),
            ));
        }
        if self.selection.best == 0 {
            return Err(ConfigError::Validation(
                "selection.best must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Cell size used for histogram scoring and the fixed output canvas.
///
/// The target width doubles as the smallest scale the search visits. All four
/// dimensions must be non-zero; rating and search reject other grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Grid {
    pub cell_width: u32,
    pub cell_height: u32,
    pub target_width: u32,
    pub target_height: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            cell_width: 8,
            cell_height: 8,
            target_width: 256,
            target_height: 192,
        }
    }
}

impl Grid {
    /// Number of whole cells along each axis of a `width × height` image.
    /// Remainder strips on the right and bottom are not counted.
    pub fn cell_counts(&self, width: u32, height: u32) -> (u32, u32) {
        (width / self.cell_width, height / self.cell_height)
    }

    pub fn target(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }
}

/// Export selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Number of lowest-rated candidates written as "best".
    pub best: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { best: 8 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel rating workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count.
///
/// - `max_cpu == false` → a single worker
/// - `max_processes == None` → all available cores
/// - `Some(n)` → `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig, max_cpu: bool) -> usize {
    if !max_cpu {
        return 1;
    }
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Stock defaults as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SearchConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file, merge it over the stock defaults, and validate.
///
/// `None` yields the validated stock defaults.
pub fn load_config(path: Option<&Path>) -> Result<SearchConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let overlay: toml::Value = toml::from_str(&content)?;
            merge_toml(base, overlay)
        }
        None => base,
    };
    let config: SearchConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// A fully-commented stock `config.toml`, printed by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# crop-search configuration
# ========================
# Every key is optional. Values shown are the defaults.

[grid]
# Histogram cell size. Each cell is scored independently: the two most
# frequent colors are free, everything else counts as lost detail.
cell_width = 8
cell_height = 8
# Output canvas. Candidates are resized to a width of at least
# target_width, then center-cropped to target_width x target_height.
target_width = 256
target_height = 192

[selection]
# How many of the lowest-rated candidates are exported as "best".
best = 8

[processing]
# Maximum parallel workers. Omit to use every core.
# max_processes = 4
"#
}
